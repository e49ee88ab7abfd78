#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Banker's algorithm safety check
//!
//! Decides whether a loaded [`SystemState`](banker_state::SystemState) admits
//! an ordering in which every process can obtain its remaining need, run to
//! completion and release what it holds.

mod checker;
mod order;
mod report;

pub use checker::{analyze, analyze_with, is_safe};
pub use order::{LowestIndexFirst, ScanOrder};
pub use report::SafetyReport;
