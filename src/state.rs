//! Solver-state contract consumed by the reporter.
//!
//! An [`EquilibriumState`] is the snapshot a Gibbs-minimisation solver exposes
//! at the end of (or part-way through) a solve. The reporter only reads it,
//! with one exception: the Gibbs-energy unit convention, which it switches to
//! dimensionless for the duration of a report and then restores (see
//! [`crate::units`]).
//!
//! # Species Partition
//!
//! The species vector is ordered in three contiguous blocks:
//!
//! ```text
//! 0 .. n_components            component (basis) species
//! n_components .. n_reduced    dependent species formed by reactions
//! n_reduced .. n_species       species below the numerical mole floor
//! ```
//!
//! # Example
//!
//! ```
//! use equilib::state::{EquilibriumState, EnergyUnits, PhaseRecord, SpeciesRecord, UnitsState};
//!
//! let mut state = EquilibriumState::new(298.15, 1.0, EnergyUnits::Dimensionless, UnitsState::Dimensionless);
//! let gas = state.add_phase(PhaseRecord::new("gas").with_total_moles(1.0));
//! state.add_species(SpeciesRecord::new("N2", gas).with_amount(1.0));
//! state.set_partition(1, 1);
//!
//! assert!(state.validate().is_ok());
//! ```

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Inconsistency, ReportError, ReportResult};
use crate::{FARADAY, GAS_CONSTANT};

/// Representation of Gibbs-energy quantities held in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitsState {
    /// Energies carried in the state's [`EnergyUnits`]
    Dimensional,
    /// Energies divided by RT
    Dimensionless,
}

/// Energy units used when the state is dimensional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnits {
    /// kcal/gmol
    KcalPerMol,
    /// Already divided by RT
    Dimensionless,
    /// kJ/gmol
    KjPerMol,
    /// Energies expressed as temperatures (G/R)
    Kelvin,
    /// J/kmol
    JoulePerKmol,
}

impl EnergyUnits {
    /// Value of RT in these units at the given temperature.
    pub fn rt(self, temperature: f64) -> f64 {
        match self {
            EnergyUnits::KcalPerMol => temperature * GAS_CONSTANT / 4.184e6,
            EnergyUnits::Dimensionless => 1.0,
            EnergyUnits::KjPerMol => temperature * GAS_CONSTANT * 1.0e-6,
            EnergyUnits::Kelvin => temperature,
            EnergyUnits::JoulePerKmol => temperature * GAS_CONSTANT,
        }
    }

    /// Label printed next to RT in the chemical potential table.
    pub fn label(self) -> &'static str {
        match self {
            EnergyUnits::KcalPerMol => "kcal/gmol",
            EnergyUnits::Dimensionless => "dimensionless",
            EnergyUnits::KjPerMol => "kJ/gmol",
            EnergyUnits::Kelvin => "Kelvin",
            EnergyUnits::JoulePerKmol => "J/kmol",
        }
    }
}

/// What the solved "amount" of a species means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownKind {
    /// Amount is a mole number
    MoleNumber,
    /// Amount is the electric potential of a charged interface
    InterfacialVoltage,
}

impl UnknownKind {
    /// Integer code used by solvers that exchange the tag as a raw integer.
    pub fn code(self) -> i32 {
        match self {
            UnknownKind::MoleNumber => 0,
            UnknownKind::InterfacialVoltage => -5,
        }
    }

    /// Short label used in the species tables.
    pub fn label(self) -> &'static str {
        match self {
            UnknownKind::MoleNumber => "MolNum",
            UnknownKind::InterfacialVoltage => "Voltage",
        }
    }
}

impl TryFrom<i32> for UnknownKind {
    type Error = Inconsistency;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(UnknownKind::MoleNumber),
            -5 => Ok(UnknownKind::InterfacialVoltage),
            _ => Err(Inconsistency::UnknownSpeciesType { code }),
        }
    }
}

/// Classification of an elemental constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    /// Ordinary element with non-negative abundance
    AbsolutePositive,
    /// Electron count
    ElectronCharge,
    /// Charge neutrality of a phase
    ChargeNeutrality,
    /// Site ratio constraint of a lattice phase
    LatticeRatio,
    /// Abundance frozen by kinetics
    KineticFrozen,
    /// Surface site constraint
    SurfaceConstraint,
    /// Anything else
    OtherConstraint,
}

impl ElementType {
    /// Integer code printed in the elemental abundance table.
    pub fn code(self) -> i32 {
        match self {
            ElementType::AbsolutePositive => 0,
            ElementType::ElectronCharge => 1,
            ElementType::ChargeNeutrality => 2,
            ElementType::LatticeRatio => 3,
            ElementType::KineticFrozen => 4,
            ElementType::SurfaceConstraint => 5,
            ElementType::OtherConstraint => 6,
        }
    }
}

/// Volumetric model of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseModel {
    /// Partial molar volume is RT/P for every species
    IdealGas,
    /// Partial molar volumes are taken from the species records
    Condensed,
}

/// Per-species attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    /// Mole number, or electric potential for a voltage unknown
    pub amount: f64,
    /// Standard-state chemical potential
    pub standard_potential: f64,
    pub activity_coefficient: f64,
    /// Current chemical potential
    pub chemical_potential: f64,
    pub kind: UnknownKind,
    pub charge: f64,
    /// Index of the owning phase
    pub phase: usize,
    /// Reference-state log offset (ln M0)
    pub reference_offset: f64,
    /// Partial molar volume for condensed phases (cm^3/gmol)
    pub partial_molar_volume: f64,
    /// Element counts, one per elemental constraint; empty means all zero
    pub formula: Vec<f64>,
}

impl SpeciesRecord {
    /// Creates an ideal mole-number species with zero amount and potential.
    pub fn new(name: impl Into<String>, phase: usize) -> Self {
        SpeciesRecord {
            name: name.into(),
            amount: 0.0,
            standard_potential: 0.0,
            activity_coefficient: 1.0,
            chemical_potential: 0.0,
            kind: UnknownKind::MoleNumber,
            charge: 0.0,
            phase,
            reference_offset: 0.0,
            partial_molar_volume: 0.0,
            formula: Vec::new(),
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_standard_potential(mut self, mu0: f64) -> Self {
        self.standard_potential = mu0;
        self
    }

    pub fn with_chemical_potential(mut self, mu: f64) -> Self {
        self.chemical_potential = mu;
        self
    }

    pub fn with_activity_coefficient(mut self, gamma: f64) -> Self {
        self.activity_coefficient = gamma;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_reference_offset(mut self, ln_m0: f64) -> Self {
        self.reference_offset = ln_m0;
        self
    }

    pub fn with_partial_molar_volume(mut self, volume: f64) -> Self {
        self.partial_molar_volume = volume;
        self
    }

    pub fn with_formula(mut self, formula: Vec<f64>) -> Self {
        self.formula = formula;
        self
    }

    /// Marks the species as an interfacial-voltage unknown.
    pub fn as_voltage(mut self) -> Self {
        self.kind = UnknownKind::InterfacialVoltage;
        self
    }

    pub fn is_voltage(&self) -> bool {
        self.kind == UnknownKind::InterfacialVoltage
    }

    /// Element count for constraint `j`.
    pub fn element_count(&self, j: usize) -> f64 {
        self.formula.get(j).copied().unwrap_or(0.0)
    }
}

/// Per-phase attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub name: String,
    /// Total moles as cached by the phase object, inert moles included
    pub total_moles: f64,
    /// Moles of non-reacting filler in the phase
    pub inert_moles: f64,
    /// Electric potential of the phase (V)
    pub electric_potential: f64,
    pub model: PhaseModel,
}

impl PhaseRecord {
    /// Creates an empty, uncharged condensed phase.
    pub fn new(name: impl Into<String>) -> Self {
        PhaseRecord {
            name: name.into(),
            total_moles: 0.0,
            inert_moles: 0.0,
            electric_potential: 0.0,
            model: PhaseModel::Condensed,
        }
    }

    pub fn with_total_moles(mut self, moles: f64) -> Self {
        self.total_moles = moles;
        self
    }

    pub fn with_inert_moles(mut self, moles: f64) -> Self {
        self.inert_moles = moles;
        self
    }

    pub fn with_electric_potential(mut self, phi: f64) -> Self {
        self.electric_potential = phi;
        self
    }

    pub fn with_model(mut self, model: PhaseModel) -> Self {
        self.model = model;
        self
    }
}

/// An elemental abundance constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConstraint {
    pub name: String,
    /// Target abundance (gmol)
    pub target: f64,
    /// Abundance achieved by the solver
    pub actual: f64,
    pub element_type: ElementType,
    pub active: bool,
}

impl ElementConstraint {
    /// Creates an active, ordinary element constraint.
    pub fn new(name: impl Into<String>, target: f64) -> Self {
        ElementConstraint {
            name: name.into(),
            target,
            actual: target,
            element_type: ElementType::AbsolutePositive,
            active: true,
        }
    }

    pub fn with_actual(mut self, actual: f64) -> Self {
        self.actual = actual;
        self
    }

    pub fn with_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Formation reaction of a non-component species from the component basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Index of the species formed
    pub species: usize,
    /// Coefficients against each component species
    pub stoichiometry: Vec<f64>,
    /// Reaction Gibbs energy
    pub delta_g: f64,
}

impl Reaction {
    pub fn new(species: usize, stoichiometry: Vec<f64>, delta_g: f64) -> Self {
        Reaction { species, stoichiometry, delta_g }
    }
}

/// Snapshot of an equilibrium solver's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumState {
    /// Temperature (K)
    pub temperature: f64,
    /// Pressure (atm)
    pub pressure: f64,
    /// Total volume as cached by the solver (cm^3)
    pub volume: f64,
    pub energy_units: EnergyUnits,
    units_state: UnitsState,
    pub n_components: usize,
    pub n_reduced: usize,
    /// Mole amount below which species are reported as absent
    pub mole_floor: f64,
    pub species: Vec<SpeciesRecord>,
    pub phases: Vec<PhaseRecord>,
    pub elements: Vec<ElementConstraint>,
    pub reactions: Vec<Reaction>,
}

impl EquilibriumState {
    /// Creates an empty state at the given conditions and unit convention.
    pub fn new(
        temperature: f64,
        pressure: f64,
        energy_units: EnergyUnits,
        units_state: UnitsState,
    ) -> Self {
        EquilibriumState {
            temperature,
            pressure,
            volume: 0.0,
            energy_units,
            units_state,
            n_components: 0,
            n_reduced: 0,
            mole_floor: 1.0e-32,
            species: Vec::new(),
            phases: Vec::new(),
            elements: Vec::new(),
            reactions: Vec::new(),
        }
    }

    /// Adds a phase and returns its index.
    pub fn add_phase(&mut self, phase: PhaseRecord) -> usize {
        self.phases.push(phase);
        self.phases.len() - 1
    }

    /// Adds a species and returns its index.
    pub fn add_species(&mut self, species: SpeciesRecord) -> usize {
        self.species.push(species);
        self.species.len() - 1
    }

    /// Adds an elemental constraint and returns its index.
    pub fn add_element(&mut self, element: ElementConstraint) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn add_reaction(&mut self, reaction: Reaction) {
        self.reactions.push(reaction);
    }

    /// Sets the component / reduced species boundaries.
    pub fn set_partition(&mut self, n_components: usize, n_reduced: usize) {
        self.n_components = n_components;
        self.n_reduced = n_reduced;
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn units_state(&self) -> UnitsState {
        self.units_state
    }

    /// Faraday constant in the current unit convention, at the current temperature.
    pub fn faraday(&self) -> f64 {
        let dimensionless = FARADAY / (GAS_CONSTANT * self.temperature);
        match self.units_state {
            UnitsState::Dimensionless => dimensionless,
            UnitsState::Dimensional => dimensionless * self.rt(),
        }
    }

    /// Value of RT in the state's dimensional energy units.
    pub fn rt(&self) -> f64 {
        self.energy_units.rt(self.temperature)
    }

    /// Reaction Gibbs energy of the reaction forming species `k`, if any.
    pub fn reaction_delta_g(&self, k: usize) -> Option<f64> {
        self.reactions.iter().find(|r| r.species == k).map(|r| r.delta_g)
    }

    /// Formula matrix with one row per species and one column per element.
    pub fn formula_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.species.len(), self.elements.len(), |k, j| {
            self.species[k].element_count(j)
        })
    }

    /// Divides every energy quantity by RT in place.
    ///
    /// Does nothing if the state is already dimensionless.
    pub fn nondimensionalize(&mut self) {
        if self.units_state == UnitsState::Dimensionless {
            return;
        }
        let rt = self.rt();
        tracing::debug!(rt, units = self.energy_units.label(), "nondimensionalizing state");
        self.scale_energies(|g| g / rt);
        self.units_state = UnitsState::Dimensionless;
    }

    /// Multiplies every energy quantity by RT in place.
    ///
    /// Does nothing if the state is already dimensional.
    pub fn redimensionalize(&mut self) {
        if self.units_state == UnitsState::Dimensional {
            return;
        }
        let rt = self.rt();
        tracing::debug!(rt, units = self.energy_units.label(), "redimensionalizing state");
        self.scale_energies(|g| g * rt);
        self.units_state = UnitsState::Dimensional;
    }

    fn scale_energies(&mut self, scale: impl Fn(f64) -> f64) {
        for sp in &mut self.species {
            sp.standard_potential = scale(sp.standard_potential);
            sp.chemical_potential = scale(sp.chemical_potential);
        }
        for rxn in &mut self.reactions {
            rxn.delta_g = scale(rxn.delta_g);
        }
    }

    /// Checks the structural invariants the reporter relies on.
    pub fn validate(&self) -> ReportResult<()> {
        let n_species = self.species.len();
        if self.n_components > self.n_reduced || self.n_reduced > n_species {
            return Err(ReportError::InvalidState(format!(
                "species partition must satisfy n_components <= n_reduced <= n_species, got {} <= {} <= {}",
                self.n_components, self.n_reduced, n_species
            )));
        }
        if !(self.temperature > 0.0) {
            return Err(ReportError::InvalidState(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        if !(self.pressure > 0.0) {
            return Err(ReportError::InvalidState(format!(
                "pressure must be positive, got {}",
                self.pressure
            )));
        }
        let n_elements = self.elements.len();
        for sp in &self.species {
            if sp.phase >= self.phases.len() {
                return Err(ReportError::InvalidState(format!(
                    "species '{}' refers to phase {} but only {} phases exist",
                    sp.name,
                    sp.phase,
                    self.phases.len()
                )));
            }
            if !sp.formula.is_empty() && sp.formula.len() != n_elements {
                return Err(ReportError::InvalidState(format!(
                    "species '{}' has {} formula entries for {} elements",
                    sp.name,
                    sp.formula.len(),
                    n_elements
                )));
            }
        }
        for rxn in &self.reactions {
            if rxn.species >= n_species {
                return Err(ReportError::InvalidState(format!(
                    "reaction refers to species {} but only {} species exist",
                    rxn.species, n_species
                )));
            }
            if rxn.stoichiometry.len() != self.n_components {
                return Err(ReportError::InvalidState(format!(
                    "reaction for '{}' has {} coefficients for {} components",
                    self.species[rxn.species].name,
                    rxn.stoichiometry.len(),
                    self.n_components
                )));
            }
        }
        Ok(())
    }
}
