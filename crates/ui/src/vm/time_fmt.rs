use chrono::{DateTime, Utc};

#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Compact seconds with one decimal, e.g. `4.5s`.
#[must_use]
pub fn format_seconds(value: f64) -> String {
    format!("{value:.1}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn formats_date_and_seconds() {
        assert_eq!(format_date(fixed_now()), "2023-11-14");
        assert_eq!(format_seconds(4.26), "4.3s");
        assert_eq!(format_seconds(3.0), "3.0s");
    }
}
