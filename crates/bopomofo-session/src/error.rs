//! The Key Handler's error taxonomy: every failure surfaces through
//! `error_cb` or a return value, never as a panic out of `handle`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyHandlerError {
    #[error("the reading buffer rejected that key")]
    InvalidReading,
    #[error("that action requires an existing composition")]
    EmptyComposition,
    #[error("the cursor is already at the boundary")]
    BoundaryHit,
    #[error("no candidates are available at this position")]
    NoCandidates,
}
