//! Service layer for Patungan
//!
//! Business logic that sits on top of the models: the split algorithms.

pub mod split;

pub use split::SplitEngine;
