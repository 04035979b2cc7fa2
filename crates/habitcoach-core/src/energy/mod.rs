//! Circadian energy estimation from sleep logs.

mod curve;

pub use curve::{CircadianAnalyzer, CircadianProfile, EnergyWindow, SleepAverages, TYPICAL_ENERGY};
