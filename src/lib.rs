//! # Equilib: Validated Reports for Chemical Equilibrium Solvers
//!
//! A Gibbs-minimisation solver computes the composition of a multi-phase,
//! multi-species system subject to elemental abundance constraints. This crate
//! turns a snapshot of such a solver's state into a deterministic text report,
//! and while doing so rederives the quantities the solver caches and checks
//! that they agree:
//!
//! - phase mole totals are resummed from the species vector
//! - every chemical potential is rebuilt from its standard-state, activity,
//!   mole-fraction, reference-offset and electrochemical terms
//!
//! A disagreement is returned as [`ReportError::InternalInconsistency`].
//! Reporting leaves the state's energy unit convention as it was found.
//!
//! ## Example
//!
//! ```
//! use equilib::{Convergence, ReportConfig, SolutionReporter, SolveCounters};
//! use equilib::sink::BufferSink;
//! use equilib::state::{
//!     EquilibriumState, EnergyUnits, PhaseRecord, Reaction, SpeciesRecord, UnitsState,
//! };
//!
//! let mut state = EquilibriumState::new(1000.0, 1.0, EnergyUnits::KjPerMol, UnitsState::Dimensional);
//! let rt = state.rt();
//! let gas = state.add_phase(PhaseRecord::new("gas").with_total_moles(1.5));
//!
//! // mu = mu0 + RT ln(x), stored in kJ/gmol
//! for (name, n, mu0) in [("H2", 1.0, -10.0), ("H", 0.5, 80.0)] {
//!     let mu = mu0 + rt * (n / 1.5_f64).ln();
//!     state.add_species(
//!         SpeciesRecord::new(name, gas)
//!             .with_amount(n)
//!             .with_standard_potential(mu0)
//!             .with_chemical_potential(mu),
//!     );
//! }
//! state.add_reaction(Reaction::new(1, vec![0.5], 0.0));
//! state.set_partition(1, 2);
//!
//! let reporter = SolutionReporter::new(ReportConfig::default());
//! let mut sink = BufferSink::new();
//! reporter
//!     .report(&mut state, &SolveCounters::new(), Convergence::Converged, &mut sink)
//!     .unwrap();
//!
//! assert_eq!(state.units_state(), UnitsState::Dimensional);
//! assert!(sink.contains("Chemical Potentials of the Species"));
//! ```
//!
//! ## Modules
//!
//! - [`state`]: the solver-state contract the reporter reads
//! - [`units`]: scoped switch to dimensionless units
//! - [`sort`]: display ordering of species
//! - [`derived`]: totals recomputed from the species vector
//! - [`verify`]: chemical potential reconstruction
//! - [`report`]: the report itself
//! - [`counters`]: solver iteration and timing counters
//! - [`sink`]: where report lines go
//! - [`config`]: report options

pub mod config;
pub mod counters;
pub mod derived;
pub mod error;
pub mod format;
pub mod report;
pub mod sink;
pub mod sort;
pub mod state;
pub mod units;
pub mod verify;

pub use config::ReportConfig;
pub use counters::SolveCounters;
pub use error::{Inconsistency, ReportError, ReportResult};
pub use report::{Convergence, ReportStatus, ReportSummary, SolutionReporter};
pub use state::EquilibriumState;

/// Universal gas constant (J/kmol/K).
pub const GAS_CONSTANT: f64 = 8314.462618;

/// Faraday constant (C/kmol).
pub const FARADAY: f64 = 9.648533212e7;

/// Gas constant for ideal-gas molar volumes (cm^3 atm/gmol/K).
pub const GAS_CONSTANT_CM3_ATM: f64 = 82.057366;
