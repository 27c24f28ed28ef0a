use std::fmt;

use super::moments::MomentSet;

/// |skewness| below this is "not skewed".
pub const SKEW_THRESHOLD: f64 = 0.5;
/// Excess kurtosis within ±this is "mesokurtic".
pub const KURTOSIS_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkewLabel {
    NotSkewed,
    RightSkewed,
    LeftSkewed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KurtosisLabel {
    Mesokurtic,
    Leptokurtic,
    Platykurtic,
}

impl SkewLabel {
    /// `|s| < 0.5` is not skewed, then `s > 0` is right-skewed, anything
    /// else is left-skewed.
    ///
    /// Every comparison with NaN is false, so NaN lands on `LeftSkewed`.
    pub fn classify(skewness: f64) -> Self {
        if skewness.abs() < SKEW_THRESHOLD {
            SkewLabel::NotSkewed
        } else if skewness > 0.0 {
            SkewLabel::RightSkewed
        } else {
            SkewLabel::LeftSkewed
        }
    }
}

impl KurtosisLabel {
    /// `-0.5 <= k <= 0.5` is mesokurtic, then `k > 0.5` is leptokurtic,
    /// anything else is platykurtic.
    ///
    /// NaN fails both tests and lands on `Platykurtic`.
    pub fn classify(excess_kurtosis: f64) -> Self {
        if (-KURTOSIS_THRESHOLD..=KURTOSIS_THRESHOLD).contains(&excess_kurtosis) {
            KurtosisLabel::Mesokurtic
        } else if excess_kurtosis > KURTOSIS_THRESHOLD {
            KurtosisLabel::Leptokurtic
        } else {
            KurtosisLabel::Platykurtic
        }
    }
}

impl fmt::Display for SkewLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkewLabel::NotSkewed => "not skewed",
            SkewLabel::RightSkewed => "right-skewed",
            SkewLabel::LeftSkewed => "left-skewed",
        })
    }
}

impl fmt::Display for KurtosisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KurtosisLabel::Mesokurtic => "mesokurtic",
            KurtosisLabel::Leptokurtic => "leptokurtic",
            KurtosisLabel::Platykurtic => "platykurtic",
        })
    }
}

/// Distribution shape derived from skewness and excess kurtosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeLabel {
    pub skew: SkewLabel,
    pub kurtosis: KurtosisLabel,
}

impl ShapeLabel {
    pub fn classify(skewness: f64, excess_kurtosis: f64) -> Self {
        ShapeLabel {
            skew: SkewLabel::classify(skewness),
            kurtosis: KurtosisLabel::classify(excess_kurtosis),
        }
    }

    pub fn of(moments: &MomentSet) -> Self {
        Self::classify(moments.skewness, moments.excess_kurtosis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skew_thresholds() {
        assert_eq!(SkewLabel::classify(0.0), SkewLabel::NotSkewed);
        assert_eq!(SkewLabel::classify(0.499), SkewLabel::NotSkewed);
        assert_eq!(SkewLabel::classify(-0.499), SkewLabel::NotSkewed);
        assert_eq!(SkewLabel::classify(0.5), SkewLabel::RightSkewed);
        assert_eq!(SkewLabel::classify(-0.5), SkewLabel::LeftSkewed);
        assert_eq!(SkewLabel::classify(3.0), SkewLabel::RightSkewed);
        assert_eq!(SkewLabel::classify(-3.0), SkewLabel::LeftSkewed);
    }

    #[test]
    fn kurtosis_thresholds() {
        assert_eq!(KurtosisLabel::classify(0.0), KurtosisLabel::Mesokurtic);
        assert_eq!(KurtosisLabel::classify(0.5), KurtosisLabel::Mesokurtic);
        assert_eq!(KurtosisLabel::classify(-0.5), KurtosisLabel::Mesokurtic);
        assert_eq!(KurtosisLabel::classify(0.5001), KurtosisLabel::Leptokurtic);
        assert_eq!(KurtosisLabel::classify(-0.5001), KurtosisLabel::Platykurtic);
    }

    #[test]
    fn infinities() {
        assert_eq!(SkewLabel::classify(f64::INFINITY), SkewLabel::RightSkewed);
        assert_eq!(SkewLabel::classify(f64::NEG_INFINITY), SkewLabel::LeftSkewed);
        assert_eq!(
            KurtosisLabel::classify(f64::INFINITY),
            KurtosisLabel::Leptokurtic
        );
    }

    #[test]
    fn nan_falls_through_the_comparison_chain() {
        let shape = ShapeLabel::classify(f64::NAN, f64::NAN);
        assert_eq!(shape.skew, SkewLabel::LeftSkewed);
        assert_eq!(shape.kurtosis, KurtosisLabel::Platykurtic);
    }

    #[test]
    fn total_over_a_grid() {
        let mut s = -2.0;
        while s <= 2.0 {
            let label = SkewLabel::classify(s);
            let expected = if s.abs() < 0.5 {
                SkewLabel::NotSkewed
            } else if s >= 0.5 {
                SkewLabel::RightSkewed
            } else {
                SkewLabel::LeftSkewed
            };
            assert_eq!(label, expected, "s = {s}");
            s += 0.125;
        }
    }

    #[test]
    fn labels_render_as_words() {
        let shape = ShapeLabel::classify(0.1, -1.0);
        assert_eq!(
            format!("{} and {}", shape.skew, shape.kurtosis),
            "not skewed and platykurtic"
        );
    }
}
