//! Errors reported by scanner construction, advancing and seeking.
//!
//! Malformed input is never an error: unterminated literals and unbalanced
//! brackets are reported through the cursor state instead.

use std::fmt;

/// Error raised synchronously by a scanner operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// A preset name that is not in the built-in registry.
    #[error("unknown language preset `{name}`")]
    InvalidLanguage { name: String },

    /// A cursor state that does not belong to the buffer it was resumed on.
    #[error("cursor state (position {position}, end {end}) does not fit a source of {len} bytes")]
    InvalidStateInput { position: u32, end: u32, len: u32 },

    /// `advance()` called on a scanner that was stopped.
    #[error("cannot advance a stopped scanner (position {position})")]
    LockedAdvance { position: u32 },

    /// A jump that cannot be performed.
    #[error("cannot jump from {from} to {to}: {reason}")]
    InvalidJump {
        from: u32,
        to: u32,
        reason: JumpRejection,
    },

    /// An end bound beyond the buffer or inside a multi-byte character.
    #[error("end offset {end} is out of range for a source of {len} bytes")]
    OutOfRangeEnd { end: u32, len: u32 },
}

/// Why a jump was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpRejection {
    /// Backward jump while a profile is attached; the lexical context at
    /// the target can only be recovered by replaying from the start.
    Backward,
    /// Target lies past the scanner's end bound.
    PastEnd,
    /// Target falls inside a multi-byte UTF-8 character.
    NotCharBoundary,
}

impl fmt::Display for JumpRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpRejection::Backward => {
                f.write_str("backward jumps are not allowed with a language profile")
            }
            JumpRejection::PastEnd => f.write_str("target is past the end bound"),
            JumpRejection::NotCharBoundary => {
                f.write_str("target is not on a character boundary")
            }
        }
    }
}
