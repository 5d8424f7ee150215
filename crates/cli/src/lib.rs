//! Ekmelos metadata CLI library.

pub mod cli;
pub mod commands;
