//! Helper utilities for common operations.

/// Returns the current Unix timestamp in seconds.
///
/// Returns 0 if the system clock reads earlier than the Unix epoch.
pub fn current_timestamp() -> i64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or(0)
}
