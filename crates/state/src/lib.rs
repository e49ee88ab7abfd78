#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! System state store for the banker evaluator
//!
//! Loads a process/resource description, derives the need matrix and the
//! available vector, and exposes the per-process lookups the safety checker
//! runs on.

mod parser;
mod render;
mod store;
mod validate;

pub use store::{Capacity, LoadOptions, SystemState};
pub use validate::{Table, Violation};
