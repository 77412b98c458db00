//! Percent return columns.

/// Row-over-row percent change.
///
/// The first row is `Some(0.0)`: a fixed anchor that keeps cumulative sums
/// well-defined. It is `None` only when the first value itself is missing.
/// Later rows are `None` when either value is missing or the previous value
/// is zero.
pub fn pct_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, current)| {
            if i == 0 {
                return current.map(|_| 0.0);
            }
            match (values[i - 1], *current) {
                (Some(prev), Some(cur)) if prev != 0.0 => finite((cur / prev - 1.0) * 100.0),
                _ => None,
            }
        })
        .collect()
}

/// Open-to-close percent change for one bar.
///
/// `None` when either price is missing or `open` is zero, so no infinity
/// ever reaches downstream sums.
pub fn intraday_pct(open: Option<f64>, close: Option<f64>) -> Option<f64> {
    match (open, close) {
        (Some(o), Some(c)) if o != 0.0 => finite((c - o) / o * 100.0),
        _ => None,
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn first_row_is_zero_anchor() {
        assert_eq!(pct_change(&[Some(10.0)]), vec![Some(0.0)]);
        assert_eq!(pct_change(&[Some(0.0), Some(10.0)])[0], Some(0.0));
    }

    #[test]
    fn missing_first_value_has_no_anchor() {
        assert_eq!(pct_change(&[None, Some(10.0)]), vec![None, None]);
    }

    #[test]
    fn close_to_close_percent() {
        let r = pct_change(&[Some(10.0), Some(11.0), Some(9.9)]);
        assert_approx(r[1].unwrap(), 10.0, DEFAULT_EPSILON);
        assert_approx(r[2].unwrap(), -10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn missing_or_zero_previous_is_undefined() {
        let r = pct_change(&[Some(0.0), Some(5.0), None, Some(5.0)]);
        assert_eq!(r[1], None);
        assert_eq!(r[2], None);
        assert_eq!(r[3], None);
    }

    #[test]
    fn intraday() {
        assert_approx(intraday_pct(Some(10.0), Some(11.0)).unwrap(), 10.0, DEFAULT_EPSILON);
        assert_eq!(intraday_pct(Some(0.0), Some(11.0)), None);
        assert_eq!(intraday_pct(None, Some(11.0)), None);
        assert_eq!(intraday_pct(Some(10.0), None), None);
    }

    #[test]
    fn empty_input() {
        assert!(pct_change(&[]).is_empty());
    }
}
