//! Error types for engine operations
//!
//! None of these ever reach the user: pointer handlers log them and treat the
//! tick as a no-op. They exist so the resolution helpers can use `?`.

use crate::host::ElementId;
use thiserror::Error;

/// Errors that can occur while resolving engine state against the host
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Hit test found no relevant element
    #[error("no target under the pointer")]
    MissingTarget,

    /// Operation addressed an element that is no longer attached
    #[error("element {0:?} is no longer attached")]
    StaleReference(ElementId),

    /// Translation is not a whole multiple of the slot size
    #[error("translation {translation}px is not a multiple of {element_size}px")]
    GeometryInconsistency { translation: f32, element_size: f32 },
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
