//! Magnitude-suffixed number formatting for the display layer.
//!
//! Values under 1000 print as integers (or with two decimals in high
//! precision); beyond that the suffix steps k, M, B, T every factor of
//! a thousand.

/// Decimal detail for values under 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Round to a whole number.
    Low,
    /// Keep two decimals, unless the value is already whole.
    High,
}

/// Round to two decimals without forcing trailing zeros.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a quantity for display: `950`, `1.25k`, `3.1M`, `2B`, `1.5T`.
pub fn format_number(value: f64, precision: Precision) -> String {
    let magnitude = value.abs();
    if magnitude < 1e3 {
        if precision == Precision::Low || value == value.round() {
            format!("{}", value.round() as i64)
        } else {
            format!("{}", round2(value))
        }
    } else if magnitude < 1e6 {
        format!("{}k", round2(value / 1e3))
    } else if magnitude < 1e9 {
        format!("{}M", round2(value / 1e6))
    } else if magnitude < 1e12 {
        format!("{}B", round2(value / 1e9))
    } else {
        format!("{}T", round2(value / 1e12))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_round_to_integers() {
        assert_eq!(format_number(0.0, Precision::Low), "0");
        assert_eq!(format_number(999.4, Precision::Low), "999");
        assert_eq!(format_number(10.6, Precision::Low), "11");
    }

    #[test]
    fn high_precision_keeps_two_decimals() {
        assert_eq!(format_number(12.345, Precision::High), "12.35");
        // Whole values stay integral even in high precision.
        assert_eq!(format_number(12.0, Precision::High), "12");
    }

    #[test]
    fn suffix_steps() {
        assert_eq!(format_number(1_000.0, Precision::Low), "1k");
        assert_eq!(format_number(1_250.0, Precision::Low), "1.25k");
        assert_eq!(format_number(3_100_000.0, Precision::Low), "3.1M");
        assert_eq!(format_number(2e9, Precision::Low), "2B");
        assert_eq!(format_number(1.5e12, Precision::Low), "1.5T");
        // Beyond the last suffix, the T scale keeps growing.
        assert_eq!(format_number(4.2e15, Precision::Low), "4200T");
    }

    #[test]
    fn negative_food_still_formats() {
        assert_eq!(format_number(-50.0, Precision::Low), "-50");
        assert_eq!(format_number(-99.9, Precision::Low), "-100");
    }
}
