//! Stage output paired with the conditions that degraded it.

use scout_shared::StageWarning;

/// What a stage produced, plus any non-fatal failures it absorbed.
///
/// A degraded stage still carries a usable (possibly empty) output.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome<T> {
    pub output: T,
    pub warnings: Vec<StageWarning>,
}

impl<T> StageOutcome<T> {
    /// Output produced without incident.
    pub fn clean(output: T) -> Self {
        Self {
            output,
            warnings: Vec::new(),
        }
    }

    /// Output substituted after a reported failure.
    pub fn degraded(output: T, warning: StageWarning) -> Self {
        Self {
            output,
            warnings: vec![warning],
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
