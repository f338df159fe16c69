//! Label formatting.

/// Formats whole seconds as `MM:SS`.
///
/// Both components are zero-padded to two digits. There is no hour component:
/// minutes simply grow past two digits for long countdowns.
///
/// ```rust
/// use countdown_widget::format::format_time;
///
/// assert_eq!(format_time(0), "00:00");
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3661), "61:01");
/// ```
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
