//! Medication safety checks.
//!
//! Handles:
//! - Pairwise drug-drug interactions over a directed table
//! - Drug and drug-class contraindications against patient conditions
//! - Reference information lookups

mod contraindications;
mod drug_info;
mod interactions;

pub use contraindications::*;
pub use drug_info::*;
pub use interactions::*;
