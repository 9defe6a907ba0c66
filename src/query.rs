use std::fmt;

/// A contiguous viewport-width interval, rendered as a media-query
/// `min-width`/`max-width` predicate pair in pixels.
///
/// The lower bound is inclusive and the upper bound exclusive, so adjacent
/// bands tile the width domain with no gap even at fractional widths. A
/// missing bound means the interval reaches the domain boundary on that
/// side: no `min` reaches down to zero, no `max` is unbounded above. The
/// rendered `max-width` predicate uses the conventional inclusive
/// one-below-the-threshold form.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct WidthQuery {
    min: Option<f64>,
    max: Option<f64>,
}

impl WidthQuery {
    pub(crate) const fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Inclusive lower bound in pixels, if any.
    pub fn min_width(&self) -> Option<f64> {
        self.min
    }

    /// Exclusive upper bound in pixels, if any.
    pub fn max_width(&self) -> Option<f64> {
        self.max
    }

    /// Evaluates the predicate against a concrete viewport width.
    pub fn matches(&self, width: f64) -> bool {
        self.min.is_none_or(|min| width >= min) && self.max.is_none_or(|max| width < max)
    }
}

impl fmt::Display for WidthQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                write!(f, "(min-width: {min}px) and (max-width: {}px)", max - 1.0)
            }
            (Some(min), None) => write!(f, "(min-width: {min}px)"),
            (None, Some(max)) => write!(f, "(max-width: {}px)", max - 1.0),
            (None, None) => write!(f, "(min-width: 0px)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WidthQuery;

    #[test]
    fn bounded_both_sides() {
        let query = WidthQuery::new(Some(600.0), Some(960.0));
        assert_eq!(query.to_string(), "(min-width: 600px) and (max-width: 959px)");

        assert!(!query.matches(599.0));
        assert!(query.matches(600.0));
        assert!(query.matches(959.0));
        assert!(!query.matches(960.0));
    }

    #[test]
    fn unbounded_below() {
        let query = WidthQuery::new(None, Some(600.0));
        assert_eq!(query.to_string(), "(max-width: 599px)");

        assert!(query.matches(0.0));
        assert!(query.matches(599.0));
        assert!(!query.matches(600.0));
    }

    #[test]
    fn unbounded_above() {
        let query = WidthQuery::new(Some(1920.0), None);
        assert_eq!(query.to_string(), "(min-width: 1920px)");

        assert!(!query.matches(1919.0));
        assert!(query.matches(1920.0));
        assert!(query.matches(100_000.0));
    }

    #[test]
    fn unbounded_both_sides_matches_everything() {
        let query = WidthQuery::new(None, None);
        assert_eq!(query.to_string(), "(min-width: 0px)");

        assert!(query.matches(0.0));
        assert!(query.matches(5_000.0));
    }

    #[test]
    fn upper_bound_is_exclusive_at_fractional_widths() {
        let query = WidthQuery::new(None, Some(600.0));
        assert!(query.matches(599.5));
        assert!(!query.matches(600.0));

        let next = WidthQuery::new(Some(600.0), Some(960.0));
        assert!(!next.matches(599.5));
        assert!(next.matches(959.5));
    }
}
