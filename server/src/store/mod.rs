//! Persistence for the canonical state.

mod backend;
mod file;
mod gateway;

pub use backend::*;
pub use file::*;
pub use gateway::*;
