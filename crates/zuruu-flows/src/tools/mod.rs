//! Calculators that run locally and never reach a provider.

pub mod adherence;
pub mod units;
