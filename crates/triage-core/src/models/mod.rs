//! Domain models for the triage engine.

mod analysis;
mod medication;
mod outcome;
mod risk;

pub use analysis::*;
pub use medication::*;
pub use outcome::*;
pub use risk::*;
