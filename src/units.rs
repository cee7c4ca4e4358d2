//! Scoped switch of the solver state into dimensionless units.
//!
//! Reporting works on G/RT quantities. [`UnitsLease::acquire`] records the
//! convention the state is in, converts it to dimensionless form if needed,
//! and hands back a guard that dereferences to the state. Dropping the guard
//! converts the state back, so every exit path (including `?` on an
//! inconsistency) leaves the convention exactly as it was found.
//!
//! A dimensional state goes through `g / rt` and back through `g * rt`, so a
//! stored energy may come back differing from the original in its last bit.
//! A dimensionless state is never touched.
//!
//! # Example
//!
//! ```
//! use equilib::state::{EquilibriumState, EnergyUnits, UnitsState};
//! use equilib::units::UnitsLease;
//!
//! let mut state = EquilibriumState::new(500.0, 1.0, EnergyUnits::KjPerMol, UnitsState::Dimensional);
//! {
//!     let lease = UnitsLease::acquire(&mut state);
//!     assert_eq!(lease.units_state(), UnitsState::Dimensionless);
//! }
//! assert_eq!(state.units_state(), UnitsState::Dimensional);
//! ```

use std::ops::{Deref, DerefMut};

use crate::state::{EquilibriumState, UnitsState};

/// Guard holding a state in dimensionless units.
pub struct UnitsLease<'a> {
    state: &'a mut EquilibriumState,
    original: UnitsState,
}

impl<'a> UnitsLease<'a> {
    /// Records the current convention and switches the state to G/RT.
    pub fn acquire(state: &'a mut EquilibriumState) -> Self {
        let original = state.units_state();
        if original == UnitsState::Dimensional {
            state.nondimensionalize();
        }
        UnitsLease { state, original }
    }

    /// Convention the state was in when the lease was taken.
    pub fn original(&self) -> UnitsState {
        self.original
    }
}

impl Deref for UnitsLease<'_> {
    type Target = EquilibriumState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for UnitsLease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for UnitsLease<'_> {
    fn drop(&mut self) {
        if self.state.units_state() != self.original {
            match self.original {
                UnitsState::Dimensional => self.state.redimensionalize(),
                UnitsState::Dimensionless => self.state.nondimensionalize(),
            }
        }
    }
}
