//! Rendering contract.
//!
//! A snapshot maps to exactly one of: nothing, the success banner, or the
//! error banner. Nothing is rendered before the first poll resolves.

pub mod banner;
pub mod indicator;

pub use banner::{Banner, ConnectionHint};
pub use indicator::StatusIndicator;
