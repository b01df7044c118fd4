//! Closed numeric intervals used as parametric domains.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A closed interval `[a, b]` on the real line.
///
/// The interval is directed: `delta` is `b - a` and may be negative, but
/// parametric domains are always built with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Start value.
    pub a: f64,
    /// End value.
    pub b: f64,
}

impl Interval {
    /// Create an interval from its two ends.
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// The unit interval `[0, 1]`.
    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// The full turn `[0, 2π]`.
    pub const fn twopi() -> Self {
        Self::new(0.0, 2.0 * PI)
    }

    /// Signed extent `b - a`.
    pub fn delta(&self) -> f64 {
        self.b - self.a
    }

    /// Absolute extent.
    pub fn length(&self) -> f64 {
        self.delta().abs()
    }

    /// Midpoint of the interval.
    pub fn mid(&self) -> f64 {
        self.eval(0.5)
    }

    /// Lower bound regardless of direction.
    pub fn min(&self) -> f64 {
        self.a.min(self.b)
    }

    /// Upper bound regardless of direction.
    pub fn max(&self) -> f64 {
        self.a.max(self.b)
    }

    /// Whether `value` lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// `value` itself when inside, otherwise `value` rounded to 7 decimal
    /// places if that lands inside; `None` when neither does.
    pub fn admit(&self, value: f64) -> Option<f64> {
        if self.contains(value) {
            return Some(value);
        }
        let rounded = (value * 1e7).round() / 1e7;
        self.contains(rounded).then_some(rounded)
    }

    /// Map a normalized value `t` in `[0, 1]` into the interval.
    pub fn eval(&self, t: f64) -> f64 {
        self.a + self.delta() * t
    }

    /// Map a value in the interval back to a normalized `[0, 1]` value.
    ///
    /// A zero-length interval maps everything to `0`.
    pub fn deval(&self, value: f64) -> f64 {
        let d = self.delta();
        if d == 0.0 {
            0.0
        } else {
            (value - self.a) / d
        }
    }

    /// Remap `value` from this interval into `target`.
    pub fn remap(&self, value: f64, target: &Interval) -> f64 {
        target.eval(self.deval(value))
    }

    /// Clamp `value` into the interval.
    pub fn limit_val(&self, value: f64) -> f64 {
        value.clamp(self.min(), self.max())
    }

    /// Evenly spaced values from `a` towards `b`.
    ///
    /// Returns `divs` values, or `divs + 1` when `include_last` is set so
    /// that `b` itself is the final entry.
    pub fn divide(&self, divs: usize, include_last: bool) -> Vec<f64> {
        if divs == 0 {
            return if include_last { vec![self.a] } else { Vec::new() };
        }
        let step = self.delta() / divs as f64;
        let mut out: Vec<f64> = (0..divs).map(|n| self.a + step * n as f64).collect();
        if include_last {
            out.push(self.b);
        }
        out
    }

    /// Split into `divs` contiguous, equally sized sub-intervals.
    pub fn subintervals(&self, divs: usize) -> Vec<Interval> {
        let ends = self.divide(divs, true);
        ends.windows(2).map(|w| Interval::new(w[0], w[1])).collect()
    }

    /// The sub-interval between normalized values `t0` and `t1`.
    pub fn subinterval(&self, t0: f64, t1: f64) -> Interval {
        Interval::new(self.eval(t0), self.eval(t1))
    }

    /// Smallest interval covering every value in `values`.
    pub fn encompass(values: &[f64]) -> Option<Interval> {
        let mut it = values.iter().copied();
        let first = it.next()?;
        let (lo, hi) = it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Interval::new(lo, hi))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_admit_rounds_near_bounds() {
        let iv = Interval::new(0.0, 2.0);
        assert_eq!(iv.admit(1.5), Some(1.5));
        assert_eq!(iv.admit(2.0 + 1e-12), Some(2.0));
        assert_eq!(iv.admit(-1e-9), Some(0.0));
        assert_eq!(iv.admit(2.001), None);
    }

    #[test]
    fn test_divide_counts() {
        let ival = Interval::new(0.0, 10.0);
        assert_eq!(ival.divide(5, false).len(), 5);
        let with_last = ival.divide(5, true);
        assert_eq!(with_last.len(), 6);
        assert_eq!(with_last[5], 10.0);
        assert_relative_eq!(with_last[2], 4.0);
    }

    #[test]
    fn test_eval_deval_remap() {
        let ival = Interval::new(2.0, 6.0);
        assert_relative_eq!(ival.eval(0.25), 3.0);
        assert_relative_eq!(ival.deval(5.0), 0.75);
        assert_relative_eq!(ival.remap(4.0, &Interval::new(0.0, 100.0)), 50.0);
        assert!(ival.contains(6.0));
        assert!(!ival.contains(6.0001));
        assert_eq!(ival.limit_val(-1.0), 2.0);
    }

    #[test]
    fn test_subintervals_tile_the_domain() {
        let parts = Interval::twopi().subintervals(4);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].a, 0.0);
        assert_eq!(parts[3].b, 2.0 * PI);
        assert_relative_eq!(parts[1].a, parts[0].b);
    }

    #[test]
    fn test_encompass() {
        let ival = Interval::encompass(&[3.0, -1.0, 7.5]).unwrap();
        assert_eq!(ival, Interval::new(-1.0, 7.5));
        assert!(Interval::encompass(&[]).is_none());
    }
}
