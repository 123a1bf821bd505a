mod domain;
pub use domain::{Rank, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod spec;
pub use spec::RaceSpec;

mod strategy;
pub use strategy::RankSetKind;
