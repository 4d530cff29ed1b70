//! Shared value types for the production forecast
//!
//! - `facility`: well fluid type and facility node kinds
//! - `rates`: oil / gas / condensate rate triples and rollup levels

mod facility;
mod rates;

pub use facility::*;
pub use rates::*;
