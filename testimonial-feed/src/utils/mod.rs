//! Utility modules.

/// Timestamp deserialization for testimonial payloads.
pub mod datetime;

/// Keeps response bodies short in logs.
pub mod log_sanitizer;
