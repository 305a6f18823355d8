//! Three-level fill status derived from a fullness ratio.

use serde::Serialize;

/// Fullness at which a bin becomes `Medium`.
pub const MEDIUM_THRESHOLD: f64 = 0.40;
/// Fullness at which a bin becomes `High`.
pub const HIGH_THRESHOLD: f64 = 0.70;

/// Clamp any real into [0, 1]. NaN maps to 0.
pub fn clamp_fullness(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Display-only transform: ratio → percentage.
pub fn as_percent(fullness: f64) -> f64 {
    clamp_fullness(fullness) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinStatus {
    Low,
    Medium,
    High,
}

impl BinStatus {
    pub fn classify(fullness: f64) -> Self {
        let f = clamp_fullness(fullness);
        if f < MEDIUM_THRESHOLD {
            BinStatus::Low
        } else if f < HIGH_THRESHOLD {
            BinStatus::Medium
        } else {
            BinStatus::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinStatus::Low => "low",
            BinStatus::Medium => "medium",
            BinStatus::High => "high",
        }
    }

    /// Helper: convert CLI input (any case) → enum
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "low" | "l" => Some(BinStatus::Low),
            "medium" | "m" => Some(BinStatus::Medium),
            "high" | "h" => Some(BinStatus::High),
            _ => None,
        }
    }

    /// Marker colour name used by list rows and map pins.
    pub fn color_name(&self) -> &'static str {
        match self {
            BinStatus::Low => "green",
            BinStatus::Medium => "yellow",
            BinStatus::High => "red",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BinStatus::Low => "#28a745",
            BinStatus::Medium => "#ffc107",
            BinStatus::High => "#dc3545",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_on_the_upper_side() {
        assert_eq!(BinStatus::classify(0.399999), BinStatus::Low);
        assert_eq!(BinStatus::classify(0.40), BinStatus::Medium);
        assert_eq!(BinStatus::classify(0.699999), BinStatus::Medium);
        assert_eq!(BinStatus::classify(0.70), BinStatus::High);
    }

    #[test]
    fn out_of_range_values_are_clamped_before_classification() {
        assert_eq!(BinStatus::classify(-3.0), BinStatus::Low);
        assert_eq!(BinStatus::classify(7.5), BinStatus::High);
        assert_eq!(BinStatus::classify(f64::NAN), BinStatus::Low);
        assert_eq!(clamp_fullness(1.2), 1.0);
        assert_eq!(clamp_fullness(-0.1), 0.0);
        assert_eq!(clamp_fullness(0.33), 0.33);
    }

    #[test]
    fn classification_never_increases_as_fullness_decreases() {
        let mut previous = BinStatus::classify(1.0);
        let mut f = 1.0;
        while f >= 0.0 {
            let current = BinStatus::classify(f);
            assert!(current <= previous, "status rose at fullness {f}");
            previous = current;
            f -= 0.001;
        }
    }

    #[test]
    fn percent_is_display_only() {
        assert_eq!(as_percent(0.5), 50.0);
        assert_eq!(as_percent(2.0), 100.0);
        assert_eq!(BinStatus::from_code("HIGH"), Some(BinStatus::High));
        assert_eq!(BinStatus::from_code("full"), None);
    }
}
