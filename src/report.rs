//! Equilibrium state report.
//!
//! [`SolutionReporter::report`] writes a fixed sequence of tables describing a
//! solver state and cross-checks it on the way:
//!
//! 1. banner and convergence status
//! 2. temperature, pressure and recomputed volume
//! 3. species by decreasing moles, inert material, species below the mole floor
//! 4. formation reactions against the component basis
//! 5. phases with their elemental abundances and Gibbs energy
//! 6. total Gibbs energy and the elemental abundance constraints
//! 7. chemical potentials broken down term by term, each one verified
//! 8. per-call solver counters
//!
//! Phase totals are recomputed and compared with the phase cache before any
//! table is printed. Chemical potentials are verified row by row. Either
//! failure writes a diagnostic line, stops the report and returns
//! [`ReportError::InternalInconsistency`]. The state's unit convention is
//! restored on every path.
//!
//! # Example
//!
//! ```
//! use equilib::report::{Convergence, SolutionReporter};
//! use equilib::config::ReportConfig;
//! use equilib::counters::SolveCounters;
//! use equilib::sink::BufferSink;
//! use equilib::state::{EquilibriumState, EnergyUnits, PhaseRecord, SpeciesRecord, UnitsState};
//!
//! let mut state = EquilibriumState::new(298.15, 1.0, EnergyUnits::Dimensionless, UnitsState::Dimensionless);
//! let liq = state.add_phase(PhaseRecord::new("liquid").with_total_moles(1.0));
//! state.add_species(SpeciesRecord::new("H2O", liq).with_amount(1.0).with_chemical_potential(0.0));
//! state.set_partition(1, 1);
//!
//! let reporter = SolutionReporter::new(ReportConfig::default());
//! let mut sink = BufferSink::new();
//! let summary = reporter
//!     .report(&mut state, &SolveCounters::new(), Convergence::Converged, &mut sink)
//!     .unwrap();
//! assert_eq!(summary.total_moles, 1.0);
//! assert!(sink.contains("H2O"));
//! ```

use nalgebra::DVector;

use crate::config::ReportConfig;
use crate::counters::{report_call_counters, report_counters, SolveCounters};
use crate::derived::{mole_fraction, DerivedQuantities};
use crate::error::{Inconsistency, ReportError, ReportResult};
use crate::format::{fixed, general, left, right, rule, sci, sci_lower};
use crate::sink::ReportSink;
use crate::sort::mole_order;
use crate::state::{EquilibriumState, UnknownKind};
use crate::units::UnitsLease;
use crate::verify::PotentialBreakdown;

/// Convergence outcome reported by the solver that calls the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// Convergence criterion was not met
    NotConverged,
    /// Equilibrium found but not every elemental abundance is satisfied
    RangeSpaceError,
    Converged,
}

impl Convergence {
    /// Maps a solver return code: negative fails, `1` is a range-space error,
    /// anything else converged.
    pub fn from_code(code: i32) -> Self {
        match code {
            c if c < 0 => Convergence::NotConverged,
            1 => Convergence::RangeSpaceError,
            _ => Convergence::Converged,
        }
    }
}

/// Outcome of producing a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Success,
}

/// Headline numbers of a completed report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub status: ReportStatus,
    /// Convergence flag the report was produced with
    pub convergence: Convergence,
    /// Recomputed total moles, inert included
    pub total_moles: f64,
    /// Recomputed total volume (cm^3)
    pub total_volume: f64,
    /// Total dimensionless Gibbs energy
    pub total_gibbs: f64,
    /// Elemental abundances summed over phases
    pub element_totals: DVector<f64>,
}

/// Renders validated reports of an equilibrium state.
#[derive(Debug, Clone, Default)]
pub struct SolutionReporter {
    config: ReportConfig,
}

impl SolutionReporter {
    pub fn new(config: ReportConfig) -> Self {
        SolutionReporter { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Writes the lifetime counters table.
    pub fn report_counters<S: ReportSink + ?Sized>(&self, counters: &SolveCounters, sink: &mut S) {
        report_counters(self.config.timing, counters, sink);
    }

    /// Writes the full report of `state` to `sink`.
    ///
    /// The state is borrowed mutably only to switch it to dimensionless
    /// units while reporting; it is returned in the convention it came in.
    pub fn report<S: ReportSink + ?Sized>(
        &self,
        state: &mut EquilibriumState,
        counters: &SolveCounters,
        convergence: Convergence,
        sink: &mut S,
    ) -> ReportResult<ReportSummary> {
        state.validate()?;
        tracing::debug!(
            n_species = state.n_species(),
            n_components = state.n_components,
            n_reduced = state.n_reduced,
            n_phases = state.phases.len(),
            ?convergence,
            "writing equilibrium report"
        );

        let amounts: Vec<f64> = state.species.iter().map(|sp| sp.amount).collect();
        let order = mole_order(&amounts, state.n_components, state.n_reduced);

        let lease = UnitsLease::acquire(state);
        let st: &EquilibriumState = &lease;

        self.banner(convergence, sink);

        let derived = DerivedQuantities::compute(st).map_err(|inc| defect(sink, inc))?;
        for (j, summed, target) in derived.element_residuals(st) {
            tracing::warn!(
                element = %st.elements[j].name,
                summed,
                target,
                "phase elemental abundances do not sum to target"
            );
        }

        sink.line(&format!("\t\tTemperature = {} Kelvin", general(st.temperature, 15, 2)));
        sink.line(&format!("\t\tPressure    = {} Atmos", general(st.pressure, 15, 5)));
        sink.line(&format!("\t\tVolume      = {} cm**3", general(derived.total_volume, 15, 5)));

        self.species_table(st, &order, &derived, sink);
        reaction_table(st, sink);
        phase_table(st, &derived, sink);
        gibbs_and_elements(st, &derived, sink);
        chemical_potential_table(st, &order, &derived, sink).map_err(|inc| defect(sink, inc))?;

        if self.config.include_counters {
            sink.blank();
            report_call_counters(self.config.timing, counters, sink);
        }
        sink.line(&rule('-', self.config.rule_width));
        sink.line(&rule('-', self.config.rule_width));

        tracing::debug!(total_gibbs = derived.total_gibbs, "equilibrium report complete");
        Ok(ReportSummary {
            status: ReportStatus::Success,
            convergence,
            total_moles: derived.total_moles,
            total_volume: derived.total_volume,
            total_gibbs: derived.total_gibbs,
            element_totals: derived.element_totals,
        })
    }

    fn banner<S: ReportSink + ?Sized>(&self, convergence: Convergence, sink: &mut S) {
        let width = self.config.rule_width;
        for _ in 0..3 {
            sink.blank();
        }
        sink.line(&rule('-', width));
        sink.line(&rule('-', width));
        sink.line("\t\t EQUILIBRIUM STATE REPORT");
        sink.line(&rule('-', width));
        sink.line(&rule('-', width));
        match convergence {
            Convergence::NotConverged => sink.line(" ERROR: CONVERGENCE CRITERION NOT SATISFIED."),
            Convergence::RangeSpaceError => sink.line(
                " RANGE SPACE ERROR: Equilibrium Found but not all Element Abundances are Satisfied",
            ),
            Convergence::Converged => {}
        }
    }

    fn species_table<S: ReportSink + ?Sized>(
        &self,
        st: &EquilibriumState,
        order: &[usize],
        derived: &DerivedQuantities,
        sink: &mut S,
    ) {
        let width = self.config.rule_width;
        sink.blank();
        sink.blank();
        sink.line(&rule('-', width));
        sink.line(" Species                 Equilibrium moles    Mole Fraction    ChemPot/RT    SpecUnkType");
        sink.line(&rule('-', width));

        for &k in &order[..st.n_reduced] {
            let sp = &st.species[k];
            let row = match sp.kind {
                UnknownKind::MoleNumber => format!(
                    " {}{}{}     {}    {}   {}",
                    left(&sp.name, 12),
                    " ".repeat(13),
                    sci(sp.amount, 14, 7),
                    sci(mole_fraction(st, &derived.phase_moles, k), 14, 7),
                    sci(sp.chemical_potential, 12, 4),
                    sp.kind.label()
                ),
                UnknownKind::InterfacialVoltage => format!(
                    " {}{}{}     {}    {}   Voltage = {}",
                    left(&sp.name, 12),
                    " ".repeat(13),
                    right("NA", 14),
                    right("NA", 14),
                    sci(sp.chemical_potential, 12, 4),
                    sci(sp.amount, 14, 7)
                ),
            };
            sink.line(&row);
        }

        for (iph, phase) in st.phases.iter().enumerate() {
            if phase.inert_moles > 0.0 {
                let label = if iph == 0 {
                    " Inert Gas Species        ".to_string()
                } else {
                    format!(" Inert Species in phase {} ", right(&phase.name, 16))
                };
                sink.line(&format!(
                    "{}{}     {}    {}",
                    label,
                    sci(phase.inert_moles, 14, 7),
                    sci(phase.inert_moles / derived.phase_moles[iph], 14, 7),
                    sci(0.0, 12, 4)
                ));
            }
        }

        if st.n_reduced != st.n_species() {
            sink.blank();
            sink.line(&format!(" SPECIES WITH LESS THAN {} MOLES:", sci(st.mole_floor, 0, 1)));
            sink.blank();
            for k in st.n_reduced..st.n_species() {
                let sp = &st.species[k];
                sink.line(&format!(
                    " {}             {}     {}    {}   {}",
                    left(&sp.name, 12),
                    sci(sp.amount, 14, 7),
                    sci(mole_fraction(st, &derived.phase_moles, k), 14, 7),
                    sci(st.reaction_delta_g(k).unwrap_or(0.0), 12, 4),
                    sp.kind.label()
                ));
            }
        }
        sink.line(&rule('-', width));
        sink.blank();
    }
}

/// Writes the diagnostic for a detected inconsistency and converts it.
fn defect<S: ReportSink + ?Sized>(sink: &mut S, inconsistency: Inconsistency) -> ReportError {
    tracing::error!(%inconsistency, "equilibrium report aborted");
    sink.blank();
    sink.line(&format!("\t\tINTERNAL INCONSISTENCY: {}", inconsistency));
    ReportError::InternalInconsistency(inconsistency)
}

fn reaction_table<S: ReportSink + ?Sized>(st: &EquilibriumState, sink: &mut S) {
    let nc = st.n_components;
    let width = nc * 10 + 45;
    let components = &st.species[..nc];

    sink.blank();
    sink.line(&rule('-', width));
    let ids: String = (0..nc).map(|j| format!("        {:>3}", j)).collect();
    sink.line(&format!("               |ComponentID|{} |           |", ids));
    let names: String = components.iter().map(|sp| format!(" {}", right(&sp.name, 10))).collect();
    sink.line(&format!("               | Components|{} |           |", names));
    let moles: String = components.iter().map(|sp| format!(" {}", general(sp.amount, 10, 3))).collect();
    sink.line(&format!(" NonComponent  |   Moles   |{} | DG/RT Rxn |", moles));
    sink.line(&rule('-', width));

    for rxn in &st.reactions {
        let sp = &st.species[rxn.species];
        let coefficients: String =
            rxn.stoichiometry.iter().map(|&c| format!("     {}", fixed(c, 6, 2))).collect();
        sink.line(&format!(
            " {:>3} {}|{} |{} |{} |",
            rxn.species,
            left(&sp.name, 10),
            general(sp.amount, 10, 3),
            coefficients,
            general(rxn.delta_g, 10, 3)
        ));
    }
    sink.line(&rule('-', width));
    sink.blank();
}

fn phase_table<S: ReportSink + ?Sized>(st: &EquilibriumState, derived: &DerivedQuantities, sink: &mut S) {
    let width = st.elements.len() * 10 + 58;

    sink.blank();
    sink.blank();
    sink.line(&rule('-', width));
    let ids: String = (0..st.elements.len()).map(|j| format!("        {:>3}", j)).collect();
    sink.line(&format!("                  | ElementID |{} |                     |", ids));
    let names: String = st.elements.iter().map(|el| format!(" {}", right(&el.name, 10))).collect();
    sink.line(&format!("                  | Element   |{} |                     |", names));
    let targets: String = st.elements.iter().map(|el| format!(" {}", general(el.target, 10, 3))).collect();
    sink.line(&format!("    PhaseName     | MolTarget |{} |     Gibbs Total     |", targets));
    sink.line(&rule('-', width));

    for (iph, phase) in st.phases.iter().enumerate() {
        let abundances: String =
            derived.phase_elements[iph].iter().map(|&ga| format!(" {}", general(ga, 10, 3))).collect();
        sink.line(&format!(
            " {:>3} {} |{} |{} | {} |",
            iph,
            left(&phase.name, 12),
            sci_lower(derived.phase_moles[iph], 10, 3),
            abundances,
            sci(derived.phase_gibbs[iph], 18, 11)
        ));
    }
    sink.line(&rule('-', width));
    let totals: String =
        derived.element_totals.iter().map(|&ga| format!(" {}", general(ga, 10, 3))).collect();
    sink.line(&format!(
        "    TOTAL         |{} |{} | {} |",
        sci_lower(derived.total_moles, 10, 3),
        totals,
        sci(derived.total_gibbs, 18, 11)
    ));
    sink.line(&rule('-', width));
    sink.blank();
}

fn gibbs_and_elements<S: ReportSink + ?Sized>(
    st: &EquilibriumState,
    derived: &DerivedQuantities,
    sink: &mut S,
) {
    sink.blank();
    sink.line(&format!(
        "\tTotal Dimensionless Gibbs Free Energy = G/RT = {}",
        sci(derived.total_gibbs, 15, 7)
    ));
    if st.phases.iter().any(|p| p.inert_moles > 0.0) {
        sink.line("\t\t(Inert species have standard free energy of zero)");
    }

    sink.blank();
    sink.line("Elemental Abundances:              Actual                    Target         Type      ElActive");
    for el in &st.elements {
        sink.line(&format!(
            "{}{}{}  {}   {:>3}     {:>3}",
            " ".repeat(26),
            left(&el.name, 2),
            sci(el.actual, 20, 12),
            sci(el.target, 20, 12),
            el.element_type.code(),
            u8::from(el.active)
        ));
    }
    sink.blank();
}

fn chemical_potential_table<S: ReportSink + ?Sized>(
    st: &EquilibriumState,
    order: &[usize],
    derived: &DerivedQuantities,
    sink: &mut S,
) -> Result<(), Inconsistency> {
    sink.blank();
    sink.line(&rule('-', 93));
    sink.line("Chemical Potentials of the Species: (dimensionless)");
    sink.line(&format!("\t\t(RT = {} {})", general(st.rt(), 0, 6), st.energy_units.label()));
    sink.line(
        "    Name         TMoles     StandStateChemPot      ln(AC)       ln(X_i)      \
         |   F z_i phi   |    ChemPot    | (-lnMnaught)",
    );
    sink.line(&rule('-', 115));

    for &k in order {
        let sp = &st.species[k];
        let bd = PotentialBreakdown::of(st, &derived.phase_moles, k);
        let mut row = format!(
            " {} {} {}  {}  {}  |{} | ",
            left(&sp.name, 12),
            sci(sp.amount, 14, 7),
            sci(bd.standard_potential, 14, 7),
            sci(bd.ln_activity_coefficient, 14, 7),
            sci(bd.ln_mole_fraction, 14, 7),
            sci(bd.electrochemical, 14, 7)
        );
        if !bd.is_consistent() {
            sink.line(&row);
        }
        let bd = bd.check(&sp.name)?;
        row.push_str(&format!(" {} |", sci(bd.stored, 12, 4)));
        if bd.reference_offset != 0.0 {
            row.push_str(&format!(" ({})", sci(-bd.reference_offset, 14, 7)));
        }
        sink.line(&row);
    }
    sink.line(&rule('-', 115));
    Ok(())
}
