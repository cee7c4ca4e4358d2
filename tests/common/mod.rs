//! Shared fixtures for integration tests

#![allow(dead_code)]

use equilib::state::{
    ElementConstraint, EnergyUnits, EquilibriumState, PhaseModel, PhaseRecord, Reaction, SpeciesRecord,
    UnitsState,
};

/// Chemical potential of an ideal species: mu0 + ln(n / N).
pub fn ideal_mu(mu0: f64, moles: f64, phase_moles: f64) -> f64 {
    mu0 + (moles.ln() - phase_moles.ln())
}

/// Two phases: A holds components X (1.0) and Y (0.5), dependent Z (0.3) and
/// a trace species W below the mole floor; B holds 0.2 mol of inert filler.
///
/// `z_mu` overrides the chemical potential of Z; `None` makes it consistent.
pub fn two_phase_fixture(z_mu: Option<f64>) -> EquilibriumState {
    let mut st = EquilibriumState::new(500.0, 1.0, EnergyUnits::Dimensionless, UnitsState::Dimensionless);
    let total_a = 1.0 + 0.5 + 0.3 + 1.0e-40;
    let a = st.add_phase(PhaseRecord::new("A").with_total_moles(total_a));
    let _b = st.add_phase(PhaseRecord::new("B").with_total_moles(0.2).with_inert_moles(0.2));

    st.add_element(ElementConstraint::new("E1", 1.3));
    st.add_element(ElementConstraint::new("E2", 0.8));

    st.add_species(
        SpeciesRecord::new("X", a)
            .with_amount(1.0)
            .with_standard_potential(-1.0)
            .with_chemical_potential(ideal_mu(-1.0, 1.0, total_a))
            .with_formula(vec![1.0, 0.0]),
    );
    st.add_species(
        SpeciesRecord::new("Y", a)
            .with_amount(0.5)
            .with_standard_potential(-0.5)
            .with_chemical_potential(ideal_mu(-0.5, 0.5, total_a))
            .with_formula(vec![0.0, 1.0]),
    );
    st.add_species(
        SpeciesRecord::new("Z", a)
            .with_amount(0.3)
            .with_standard_potential(-1.5)
            .with_chemical_potential(z_mu.unwrap_or_else(|| ideal_mu(-1.5, 0.3, total_a)))
            .with_formula(vec![1.0, 1.0]),
    );
    st.add_species(
        SpeciesRecord::new("W", a)
            .with_amount(1.0e-40)
            .with_standard_potential(3.0)
            .with_chemical_potential(ideal_mu(3.0, 1.0e-40, total_a))
            .with_formula(vec![2.0, 0.0]),
    );
    st.add_reaction(Reaction::new(2, vec![1.0, 1.0], -0.05));
    st.add_reaction(Reaction::new(3, vec![2.0, 0.0], 5.0));
    st.set_partition(2, 3);
    st
}

/// Electrode with an interfacial voltage unknown and a charged ion.
pub fn electrode_fixture() -> EquilibriumState {
    let mut st = EquilibriumState::new(298.15, 1.0, EnergyUnits::Dimensionless, UnitsState::Dimensionless);
    let phi = 0.25;
    let metal = st.add_phase(PhaseRecord::new("metal").with_total_moles(1.0).with_electric_potential(phi));
    let gas = st.add_phase(PhaseRecord::new("gas").with_model(PhaseModel::IdealGas).with_total_moles(2.0));
    let faraday = st.faraday();

    st.add_species(
        SpeciesRecord::new("Ag+", metal)
            .with_amount(1.0)
            .with_charge(1.0)
            .with_standard_potential(-4.0)
            .with_chemical_potential(-4.0 + phi * faraday),
    );
    st.add_species(
        SpeciesRecord::new("N2", gas)
            .with_amount(2.0)
            .with_standard_potential(-20.0)
            .with_chemical_potential(-20.0),
    );
    st.add_species(
        SpeciesRecord::new("e-", metal)
            .as_voltage()
            .with_amount(-0.4)
            .with_charge(-1.0)
            .with_standard_potential(1.0)
            .with_chemical_potential(1.0 - phi * faraday),
    );
    st.add_reaction(Reaction::new(2, vec![1.0, 0.0], 0.0));
    st.set_partition(2, 3);
    st
}
