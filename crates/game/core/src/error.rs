//! Common error infrastructure for battle-core.
//!
//! In-battle queries never fail: out-of-range values are clamped and missing
//! content resolves to `None`. Errors exist only for transactional operations
//! (equipment trades, content assembly), and each domain error lives next to
//! the operation it guards.
//!
//! An operation that returns `Err` has not mutated anything.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retry with another choice: item not held, slot locked by a state.
    Recoverable,

    /// The request itself is malformed: weapon offered for an armor slot,
    /// unknown slot index.
    Validation,

    /// Live state contradicts itself.
    Internal,

    /// Content tables are unusable, e.g. a definition at the reserved id 0.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Whether the error points at broken state or content rather than input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every battle-core error enum.
pub trait GameError: std::error::Error {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant; defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
