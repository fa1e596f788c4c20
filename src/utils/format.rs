//! Display helpers

/// Format a countdown as `M:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
