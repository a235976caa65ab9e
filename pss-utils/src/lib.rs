//! Shared utility functions for PSS crates.

/// Placeholder shown wherever a value is unavailable.
pub const PLACEHOLDER: &str = "—";

/// Timestamp utility functions
pub mod dates {
    use chrono::{DateTime, Utc};

    /// Parse an RFC 3339 timestamp (e.g. "2024-09-01T12:00:00Z" or
    /// "2024-09-01T05:00:00.000-07:00") into UTC.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
    }

}

/// Display formatting for metric cards
pub mod format {
    use crate::PLACEHOLDER;

    /// Format a count with thousands separators, e.g. 2847 -> "2,847".
    pub fn format_count(value: u64) -> String {
        let digits = value.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

    /// Round a percentage to a whole number and prefix its sign.
    ///
    /// Zero is shown as "+0%". `None` becomes the placeholder.
    pub fn format_signed_percent(pct: Option<f64>) -> String {
        match pct {
            Some(p) if p.is_finite() => {
                let rounded = p.round() as i64;
                if rounded >= 0 {
                    format!("+{}%", rounded)
                } else {
                    format!("{}%", rounded)
                }
            }
            _ => PLACEHOLDER.to_string(),
        }
    }

    /// Format a percentage with one decimal, e.g. "24.3%".
    pub fn format_percent(pct: Option<f64>) -> String {
        match pct {
            Some(p) if p.is_finite() => format!("{:.1}%", p),
            _ => PLACEHOLDER.to_string(),
        }
    }

    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 9.0 / 5.0 + 32.0
    }

    /// Format a Celsius temperature as Fahrenheit with one decimal, e.g. "58.2".
    pub fn format_fahrenheit(celsius: Option<f64>) -> String {
        match celsius {
            Some(c) if c.is_finite() => format!("{:.1}", celsius_to_fahrenheit(c)),
            _ => PLACEHOLDER.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_count() {
            assert_eq!(format_count(0), "0");
            assert_eq!(format_count(999), "999");
            assert_eq!(format_count(2847), "2,847");
            assert_eq!(format_count(1234567), "1,234,567");
        }

        #[test]
        fn test_format_signed_percent() {
            assert_eq!(format_signed_percent(Some(33.333)), "+33%");
            assert_eq!(format_signed_percent(Some(-12.6)), "-13%");
            assert_eq!(format_signed_percent(Some(-0.4)), "+0%");
            assert_eq!(format_signed_percent(None), "—");
            assert_eq!(format_signed_percent(Some(f64::NAN)), "—");
        }

        #[test]
        fn test_format_fahrenheit() {
            assert_eq!(format_fahrenheit(Some(14.55)), "58.2");
            assert_eq!(format_fahrenheit(Some(0.0)), "32.0");
            assert_eq!(format_fahrenheit(None), "—");
        }

        #[test]
        fn test_format_percent() {
            assert_eq!(format_percent(Some(24.2857)), "24.3%");
            assert_eq!(format_percent(None), "—");
        }
    }
}
