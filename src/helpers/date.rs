//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Process from longest to shortest patterns within each category
    let replacements = [
        // Year (process first as they're uppercase)
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month (uppercase M)
        ("MMMM", "%B"), // Full month name
        ("MMM", "%b"),  // Abbreviated month name
        ("MM", "%m"),   // Two-digit month
        // Day of month (uppercase D) - process before lowercase
        ("DDDD", "%j"), // Day of year
        ("DD", "%d"),   // Two-digit day
        // Hour 24h (uppercase H)
        ("HH", "%H"),
        // Hour 12h (lowercase h)
        ("hh", "%I"),
        // Minute (lowercase m after we've processed MM)
        ("mm", "%M"),
        // Second (lowercase s)
        ("ss", "%S"),
        // Day of week (lowercase d) - process last to avoid conflicts
        ("dddd", "%A"), // Full weekday name
        ("ddd", "%a"),  // Abbreviated weekday name
        // Timezone
        ("ZZ", "%z"),
        // Milliseconds
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn sample_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:00+09:00").unwrap()
    }

    #[test]
    fn test_format_date() {
        let date = sample_date();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "YYYY/MM/DD"), "2024/01/15");
        assert_eq!(format_date(&date, "MMM DD, YYYY"), "Jan 15, 2024");
    }

    #[test]
    fn test_format_keeps_offset_local_time() {
        // The wall-clock time the author wrote, not UTC
        assert_eq!(format_date(&sample_date(), "HH:mm"), "10:30");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }
}
