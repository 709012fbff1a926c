//! Shared animation engine components: phase clock, particle fields, quality caps,
//! event behavior tables, and the host-facing instance contract.

pub mod behavior;
pub mod instance;
pub mod particle;
pub mod phase;
pub mod quality;
