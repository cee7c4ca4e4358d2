//! Quantities rederived from the species vector.
//!
//! Nothing here reads a cached total from the solver as its source. Phase
//! moles, volumes, elemental abundances and Gibbs energies are all summed
//! afresh from species amounts, which is what lets the report compare them
//! against what the solver cached.

use nalgebra::{DMatrix, DVector};

use crate::error::Inconsistency;
use crate::state::{EquilibriumState, PhaseModel};
use crate::GAS_CONSTANT_CM3_ATM;

/// Relative tolerance of [`doubles_equal`].
pub const DOUBLE_EQUAL_TOLERANCE: f64 = 1.0e-10;

/// Loose floating-point equality: `|a - b| / (|a| + |b| + 1) <= 1e-10`.
pub fn doubles_equal(a: f64, b: f64) -> bool {
    let denom = a.abs() + b.abs() + 1.0;
    (a - b).abs() / denom <= DOUBLE_EQUAL_TOLERANCE
}

/// Total moles of each phase: inert moles plus every mole-number species.
pub fn phase_moles(state: &EquilibriumState) -> Vec<f64> {
    let mut totals: Vec<f64> = state.phases.iter().map(|p| p.inert_moles).collect();
    for sp in state.species.iter().filter(|sp| !sp.is_voltage()) {
        totals[sp.phase] += sp.amount;
    }
    totals
}

/// Compares recomputed phase moles against the totals cached on each phase.
pub fn check_phase_moles(state: &EquilibriumState, recomputed: &[f64]) -> Result<(), Inconsistency> {
    for (phase, &moles) in state.phases.iter().zip(recomputed) {
        if phase.total_moles != moles && !doubles_equal(phase.total_moles, moles) {
            return Err(Inconsistency::PhaseMoles {
                phase: phase.name.clone(),
                cached: phase.total_moles,
                recomputed: moles,
            });
        }
    }
    Ok(())
}

/// Mole fraction of species `k` within its phase.
///
/// Zero when the phase is empty.
pub fn mole_fraction(state: &EquilibriumState, phase_moles: &[f64], k: usize) -> f64 {
    let sp = &state.species[k];
    let total = phase_moles[sp.phase];
    if total > 0.0 {
        sp.amount / total
    } else {
        0.0
    }
}

/// Volume of each phase (cm^3) at the state's temperature and pressure.
///
/// Ideal-gas species use RT/P as partial molar volume; condensed species use
/// their stored value. Voltage unknowns occupy no volume.
pub fn phase_volumes(state: &EquilibriumState) -> Vec<f64> {
    let ideal_molar_volume = GAS_CONSTANT_CM3_ATM * state.temperature / state.pressure;
    let mut volumes = vec![0.0; state.phases.len()];
    for sp in state.species.iter().filter(|sp| !sp.is_voltage()) {
        let vol_pm = match state.phases[sp.phase].model {
            PhaseModel::IdealGas => ideal_molar_volume,
            PhaseModel::Condensed => sp.partial_molar_volume,
        };
        volumes[sp.phase] += sp.amount * vol_pm;
    }
    volumes
}

/// Elemental abundances contributed by one phase.
pub fn phase_element_abundances(
    state: &EquilibriumState,
    formula: &DMatrix<f64>,
    phase: usize,
) -> DVector<f64> {
    let moles = DVector::from_iterator(
        state.species.len(),
        state.species.iter().map(|sp| {
            if sp.phase == phase && !sp.is_voltage() {
                sp.amount
            } else {
                0.0
            }
        }),
    );
    formula.tr_mul(&moles)
}

/// Dimensionless Gibbs energy of one phase.
///
/// Sums amount times chemical potential over the reduced species of the
/// phase. Inert moles carry a standard free energy of zero and add nothing.
pub fn phase_gibbs(state: &EquilibriumState, phase: usize) -> f64 {
    state.species[..state.n_reduced]
        .iter()
        .filter(|sp| sp.phase == phase && !sp.is_voltage())
        .fold(0.0, |acc, sp| acc + sp.amount * sp.chemical_potential)
}

/// Dimensionless Gibbs energy of the whole system.
pub fn total_gibbs(state: &EquilibriumState) -> f64 {
    state.species[..state.n_reduced]
        .iter()
        .filter(|sp| !sp.is_voltage())
        .fold(0.0, |acc, sp| acc + sp.amount * sp.chemical_potential)
}

/// Everything the report derives from the species vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedQuantities {
    /// Recomputed total moles per phase
    pub phase_moles: Vec<f64>,
    pub total_moles: f64,
    pub phase_volumes: Vec<f64>,
    pub total_volume: f64,
    /// Elemental abundances per phase
    pub phase_elements: Vec<DVector<f64>>,
    /// Elemental abundances summed over phases
    pub element_totals: DVector<f64>,
    pub phase_gibbs: Vec<f64>,
    pub total_gibbs: f64,
}

impl DerivedQuantities {
    /// Recomputes all derived quantities and checks phase moles against the cache.
    pub fn compute(state: &EquilibriumState) -> Result<Self, Inconsistency> {
        let phase_moles = phase_moles(state);
        check_phase_moles(state, &phase_moles)?;
        let total_moles = phase_moles.iter().sum();

        let phase_volumes = phase_volumes(state);
        let total_volume = phase_volumes.iter().sum();

        let formula = state.formula_matrix();
        let phase_elements: Vec<DVector<f64>> = (0..state.phases.len())
            .map(|iph| phase_element_abundances(state, &formula, iph))
            .collect();
        let element_totals = phase_elements
            .iter()
            .fold(DVector::zeros(state.elements.len()), |acc, ga| acc + ga);

        let phase_gibbs: Vec<f64> = (0..state.phases.len()).map(|iph| phase_gibbs(state, iph)).collect();
        let total_gibbs = total_gibbs(state);

        Ok(DerivedQuantities {
            phase_moles,
            total_moles,
            phase_volumes,
            total_volume,
            phase_elements,
            element_totals,
            phase_gibbs,
            total_gibbs,
        })
    }

    /// Active constraints whose summed abundance misses the target, as
    /// `(element index, summed, target)`.
    pub fn element_residuals(&self, state: &EquilibriumState) -> Vec<(usize, f64, f64)> {
        state
            .elements
            .iter()
            .enumerate()
            .filter(|(j, el)| el.active && !doubles_equal(self.element_totals[*j], el.target))
            .map(|(j, el)| (j, self.element_totals[j], el.target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ElementConstraint, EnergyUnits, PhaseRecord, SpeciesRecord, UnitsState};

    /// Gas (CO, O2, CO2) + graphite, with inert N2 in the gas.
    fn carbon_state() -> EquilibriumState {
        let mut state =
            EquilibriumState::new(1500.0, 2.0, EnergyUnits::Dimensionless, UnitsState::Dimensionless);
        let gas = state.add_phase(
            PhaseRecord::new("gas").with_model(PhaseModel::IdealGas).with_total_moles(3.5).with_inert_moles(1.0),
        );
        let solid = state.add_phase(PhaseRecord::new("graphite").with_total_moles(0.5));
        state.add_element(ElementConstraint::new("C", 2.0));
        state.add_element(ElementConstraint::new("O", 2.0));

        state.add_species(
            SpeciesRecord::new("CO", gas).with_amount(1.0).with_chemical_potential(-20.0).with_formula(vec![1.0, 1.0]),
        );
        state.add_species(
            SpeciesRecord::new("C(gr)", solid)
                .with_amount(0.5)
                .with_chemical_potential(-1.0)
                .with_partial_molar_volume(5.3)
                .with_formula(vec![1.0, 0.0]),
        );
        state.add_species(
            SpeciesRecord::new("CO2", gas).with_amount(0.5).with_chemical_potential(-40.0).with_formula(vec![1.0, 2.0]),
        );
        state.add_species(
            SpeciesRecord::new("O2", gas).with_amount(1.0e-40).with_chemical_potential(-5.0).with_formula(vec![0.0, 2.0]),
        );
        state.set_partition(2, 3);
        state
    }

    #[test]
    fn test_doubles_equal() {
        assert!(doubles_equal(1.0, 1.0 + 1e-12));
        assert!(!doubles_equal(1.0, 1.0 + 1e-8));
        assert!(doubles_equal(0.0, 1e-11));
    }

    #[test]
    fn test_phase_moles_include_inert() {
        let state = carbon_state();
        let moles = phase_moles(&state);
        assert!((moles[0] - 2.5).abs() < 1e-12);
        assert_eq!(moles[1], 0.5);
    }

    #[test]
    fn test_phase_moles_mismatch_detected() {
        let mut state = carbon_state();
        assert!(DerivedQuantities::compute(&state).is_err()); // cached 3.5, actual 2.5

        state.phases[0].total_moles = 2.5;
        let derived = DerivedQuantities::compute(&state).unwrap();
        assert!((derived.total_moles - 3.0).abs() < 1e-12);

        state.phases[1].total_moles = 0.6;
        match DerivedQuantities::compute(&state) {
            Err(Inconsistency::PhaseMoles { phase, cached, recomputed }) => {
                assert_eq!(phase, "graphite");
                assert_eq!(cached, 0.6);
                assert_eq!(recomputed, 0.5);
            }
            other => panic!("expected phase moles inconsistency, got {:?}", other),
        }
    }

    #[test]
    fn test_volumes() {
        let mut state = carbon_state();
        state.phases[0].total_moles = 2.5;
        let volumes = phase_volumes(&state);
        // inert moles are not part of the species vector
        let gas_moles = 1.5 + 1.0e-40;
        let expected_gas = gas_moles * GAS_CONSTANT_CM3_ATM * 1500.0 / 2.0;
        assert!((volumes[0] - expected_gas).abs() < 1e-9 * expected_gas);
        assert!((volumes[1] - 0.5 * 5.3).abs() < 1e-12);
    }

    #[test]
    fn test_element_abundances_per_phase() {
        let mut state = carbon_state();
        state.phases[0].total_moles = 2.5;
        let derived = DerivedQuantities::compute(&state).unwrap();

        assert!((derived.phase_elements[0][0] - 1.5).abs() < 1e-12);
        assert!((derived.phase_elements[0][1] - 2.0).abs() < 1e-12);
        assert_eq!(derived.phase_elements[1][0], 0.5);
        assert_eq!(derived.phase_elements[1][1], 0.0);
        assert!((derived.element_totals[0] - 2.0).abs() < 1e-12);
        assert!(derived.element_residuals(&state).is_empty());

        state.elements[1].target = 3.0;
        let residuals = derived.element_residuals(&state);
        assert_eq!(residuals.len(), 1);
        assert_eq!(residuals[0].0, 1);

        state.elements[1] = state.elements[1].clone().inactive();
        assert!(derived.element_residuals(&state).is_empty());
    }

    #[test]
    fn test_gibbs_excludes_below_floor_and_inert() {
        let mut state = carbon_state();
        state.phases[0].total_moles = 2.5;
        assert_eq!(phase_gibbs(&state, 0), 1.0 * -20.0 + 0.5 * -40.0);
        assert_eq!(phase_gibbs(&state, 1), -0.5);
        assert_eq!(total_gibbs(&state), -40.5);

        // more inert material changes nothing
        state.phases[0].inert_moles = 50.0;
        assert_eq!(phase_gibbs(&state, 0), -40.0);
        assert_eq!(total_gibbs(&state), -40.5);
    }

    #[test]
    fn test_voltage_species_carry_no_moles_or_energy() {
        let mut state = carbon_state();
        state.phases[0].total_moles = 2.5;
        state.add_species(SpeciesRecord::new("phi", 1).as_voltage().with_amount(0.7).with_chemical_potential(3.0));
        state.set_partition(2, 4);

        assert_eq!(phase_moles(&state)[1], 0.5);
        assert_eq!(phase_gibbs(&state, 1), -0.5);
        assert!((phase_volumes(&state)[1] - 0.5 * 5.3).abs() < 1e-12);
    }

    #[test]
    fn test_phase_without_species_has_positive_zero_gibbs() {
        let mut state = carbon_state();
        let empty = state.add_phase(PhaseRecord::new("filler").with_inert_moles(2.0));
        let g = phase_gibbs(&state, empty);
        assert_eq!(g, 0.0);
        assert!(g.is_sign_positive());

        state.set_partition(0, 0);
        assert!(total_gibbs(&state).is_sign_positive());
    }

    #[test]
    fn test_mole_fraction() {
        let mut state = carbon_state();
        state.phases[0].total_moles = 2.5;
        let moles = phase_moles(&state);
        assert!((mole_fraction(&state, &moles, 0) - 0.4).abs() < 1e-12);
        assert_eq!(mole_fraction(&state, &moles, 1), 1.0);

        state.species[1].amount = 0.0;
        let moles = phase_moles(&state);
        assert_eq!(mole_fraction(&state, &moles, 1), 0.0);
    }
}
