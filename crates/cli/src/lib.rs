//! Chainpulse CLI — argument surface and the sampler loop.

pub mod args;
pub mod monitor;

pub use args::Args;
pub use monitor::Monitor;
