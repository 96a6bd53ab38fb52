//! Subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod capacity;
pub mod decode;
pub mod encode;
pub mod watermark;
