//! Property tests for ordering and unit restoration

mod common;

use approx::relative_eq;
use common::two_phase_fixture;
use equilib::sink::BufferSink;
use equilib::sort::mole_order;
use equilib::state::{EnergyUnits, UnitsState};
use equilib::{Convergence, ReportConfig, SolutionReporter, SolveCounters};
use proptest::prelude::*;

fn amounts_and_partition() -> impl Strategy<Value = (Vec<f64>, usize, usize)> {
    prop::collection::vec(-1.0e3..1.0e3f64, 0..24).prop_flat_map(|amounts| {
        let n = amounts.len();
        (0..=n).prop_flat_map(move |nr| {
            let amounts = amounts.clone();
            (0..=nr).prop_map(move |nc| (amounts.clone(), nc, nr))
        })
    })
}

fn energy_units() -> impl Strategy<Value = EnergyUnits> {
    prop_oneof![
        Just(EnergyUnits::KcalPerMol),
        Just(EnergyUnits::Dimensionless),
        Just(EnergyUnits::KjPerMol),
        Just(EnergyUnits::Kelvin),
        Just(EnergyUnits::JoulePerKmol),
    ]
}

proptest! {
    #[test]
    fn prop_mole_order_is_a_valid_display_order((amounts, nc, nr) in amounts_and_partition()) {
        let order = mole_order(&amounts, nc, nr);
        let n = amounts.len();

        let mut seen = order.clone();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());

        prop_assert_eq!(&order[..nc], &(0..nc).collect::<Vec<_>>()[..]);
        prop_assert_eq!(&order[nr..], &(nr..n).collect::<Vec<_>>()[..]);
        for w in order[nc..nr].windows(2) {
            prop_assert!(amounts[w[0]] >= amounts[w[1]]);
        }
    }

    #[test]
    fn prop_units_convention_survives_any_report(
        units in energy_units(),
        dimensional in any::<bool>(),
        z_mu in prop::option::of(-10.0..10.0f64),
        temperature in 250.0..3000.0f64,
    ) {
        let mut state = two_phase_fixture(z_mu);
        state.temperature = temperature;
        state.energy_units = units;
        if dimensional {
            state.redimensionalize();
        }
        let before = state.clone();

        let reporter = SolutionReporter::new(ReportConfig::default());
        let mut sink = BufferSink::new();
        let _ = reporter.report(&mut state, &SolveCounters::new(), Convergence::Converged, &mut sink);

        let expected = if dimensional { UnitsState::Dimensional } else { UnitsState::Dimensionless };
        prop_assert_eq!(state.units_state(), expected);
        for (after, orig) in state.species.iter().zip(&before.species) {
            prop_assert!(relative_eq!(
                after.chemical_potential,
                orig.chemical_potential,
                epsilon = 1e-12,
                max_relative = 1e-12
            ));
            prop_assert!(relative_eq!(
                after.standard_potential,
                orig.standard_potential,
                epsilon = 1e-12,
                max_relative = 1e-12
            ));
        }
        prop_assert!(relative_eq!(state.faraday(), before.faraday(), max_relative = 1e-12));
    }
}
