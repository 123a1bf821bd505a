mod race;
pub use race::RaceSpec;
