//! Stat identifiers and buff bookkeeping.
//!
//! Stats come in three tiers, each combined by a different rule:
//!
//! ```text
//! [ Param  ] round(clamp(max(0, base + plus) × rate × buff, min, max))
//! [ XParam ] sum of additive rate traits
//! [ SParam ] product of multiplicative rate traits
//! ```
//!
//! Only `param_plus`, buff levels and buff timers are stored on the battler;
//! every other value is derived from the battler's trait sources on demand.

pub mod buff;
pub mod params;

pub use buff::BuffTable;
pub use params::{ParamId, SParamId, XParamId};
