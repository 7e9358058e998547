//! Configuration loading, component bootstrap and the command flows behind
//! the `lexrag` binary.

pub mod bootstrap;
pub mod config;
pub mod flows;
