mod rankset;
pub use rankset::RankSetKind;
