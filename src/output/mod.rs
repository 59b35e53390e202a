//! Materializing outcomes on disk, and the check/recharacterize mode switch.

mod mode;
mod writer;

pub use mode::RunMode;
pub use writer::{ResultWriter, WriteSummary};

#[cfg(test)]
mod tests;
