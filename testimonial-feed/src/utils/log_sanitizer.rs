//! Log sanitization utilities
//!
//! Testimonial bodies are user-submitted; response bodies are clipped before
//! they reach debug/error logs.

/// Default number of characters kept in log output.
pub const DEFAULT_LOG_LIMIT: usize = 256;

/// Clip `s` to at most `limit` characters, noting the original length.
pub fn truncate_for_log_with(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}... [truncated, total {} bytes]", &s[..cut], s.len()),
    }
}

/// [`truncate_for_log_with`] using [`DEFAULT_LOG_LIMIT`].
pub fn truncate_for_log(s: &str) -> String {
    truncate_for_log_with(s, DEFAULT_LOG_LIMIT)
}
