//! CLI command implementations.

mod build;
mod check;
mod stats;

pub use build::{build, derive};
pub use check::check;
pub use stats::stats;
