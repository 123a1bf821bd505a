/// Preference weight of a task.
///
/// Higher values win. Several tasks may share the same rank.
pub type Rank = i64;

/// Timeout value in milliseconds.
pub type TimeoutMs = u64;
