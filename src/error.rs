//! Error types for report generation.
//!
//! Two families of failure exist. A malformed state (wrong array lengths,
//! dangling phase ids) is rejected before anything is written. An
//! [`Inconsistency`] is detected while the report is being produced and means
//! the solver's cached quantities disagree with what can be rederived from its
//! species vector. Both are returned to the caller; the reporter never aborts
//! the process.

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while producing a report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    /// Solver state disagrees with quantities rederived from it
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(#[from] Inconsistency),
    /// Solver state is structurally malformed
    #[error("invalid solver state: {0}")]
    InvalidState(String),
    /// Report configuration could not be loaded
    #[error("invalid report configuration: {0}")]
    Config(String),
}

impl ReportError {
    /// Returns true for defects detected while cross-checking the state.
    pub fn is_internal_inconsistency(&self) -> bool {
        matches!(self, ReportError::InternalInconsistency(_))
    }
}

/// A detected divergence between cached solver state and its derivable relationships.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Inconsistency {
    /// Recomputed phase moles do not match the phase's cached total
    #[error("phase '{phase}': cached total moles {cached:e} != recomputed {recomputed:e}")]
    PhaseMoles { phase: String, cached: f64, recomputed: f64 },
    /// Reconstructed chemical potential does not reproduce the stored value
    #[error("species '{species}': stored mu/RT {stored:e} != reconstructed {reconstructed:e}")]
    ChemicalPotential { species: String, stored: f64, reconstructed: f64 },
    /// Species unknown-kind code outside the known set
    #[error("unrecognised species unknown type code {code}")]
    UnknownSpeciesType { code: i32 },
}

impl Inconsistency {
    /// Absolute numeric discrepancy, where one exists.
    pub fn discrepancy(&self) -> Option<f64> {
        match self {
            Inconsistency::PhaseMoles { cached, recomputed, .. } => Some((cached - recomputed).abs()),
            Inconsistency::ChemicalPotential { stored, reconstructed, .. } => {
                Some((stored - reconstructed).abs())
            }
            Inconsistency::UnknownSpeciesType { .. } => None,
        }
    }
}
