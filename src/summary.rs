//! Running count/sum/min/max/average over a stream of numbers.
//!
//! Integer sums wrap on overflow. An empty summary reports the identity
//! bounds (`i32::MAX` as min, `i32::MIN` as max, and so on) and an average of
//! zero. `combine` folds another summary in as if its values had been
//! accepted here, so counts and sums add.

use core::fmt::{self, Display, Formatter};

use crate::error::{CollectionError, Result};

macro_rules! integer_summary {
    ($(#[$doc:meta])* $name:ident, $t:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            count: u64,
            sum: i64,
            min: $t,
            max: $t,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub const fn new() -> Self {
                $name {
                    count: 0,
                    sum: 0,
                    min: <$t>::MAX,
                    max: <$t>::MIN,
                }
            }

            /// Rebuilds a summary from recorded figures. A non-empty summary
            /// needs `min <= max`; an empty one ignores the bounds given.
            pub fn with_values(count: u64, min: $t, max: $t, sum: i64) -> Result<Self> {
                if count == 0 {
                    return Ok(Self::new());
                }
                if min > max {
                    return Err(CollectionError::illegal_argument("min > max"));
                }
                Ok($name { count, sum, min, max })
            }

            pub fn accept(&mut self, value: $t) {
                self.count += 1;
                self.sum = self.sum.wrapping_add(i64::from(value));
                self.min = self.min.min(value);
                self.max = self.max.max(value);
            }

            pub fn combine(&mut self, other: &Self) {
                self.count += other.count;
                self.sum = self.sum.wrapping_add(other.sum);
                self.min = self.min.min(other.min);
                self.max = self.max.max(other.max);
            }

            pub fn count(&self) -> u64 {
                self.count
            }

            pub fn sum(&self) -> i64 {
                self.sum
            }

            pub fn min(&self) -> $t {
                self.min
            }

            pub fn max(&self) -> $t {
                self.max
            }

            pub fn average(&self) -> f64 {
                if self.count == 0 {
                    0.0
                } else {
                    self.sum as f64 / self.count as f64
                }
            }
        }

        impl Extend<$t> for $name {
            fn extend<I: IntoIterator<Item = $t>>(&mut self, iter: I) {
                iter.into_iter().for_each(|v| self.accept(v));
            }
        }

        impl FromIterator<$t> for $name {
            fn from_iter<I: IntoIterator<Item = $t>>(iter: I) -> Self {
                let mut s = Self::new();
                s.extend(iter);
                s
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}{{count={}, sum={}, min={}, average={:.6}, max={}}}",
                    stringify!($name),
                    self.count,
                    self.sum,
                    self.min,
                    self.average(),
                    self.max
                )
            }
        }
    };
}

integer_summary!(
    /// Statistics over `i32` values with an `i64` sum.
    IntSummaryStatistics,
    i32
);

integer_summary!(
    /// Statistics over `i64` values.
    LongSummaryStatistics,
    i64
);

impl LongSummaryStatistics {
    pub fn accept_int(&mut self, value: i32) {
        self.accept(i64::from(value));
    }
}

/// Statistics over `f64` values.
///
/// The sum is compensated (Kahan) so long runs of small values do not drift.
/// Infinities and NaN propagate through the plain sum instead of the
/// compensated one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleSummaryStatistics {
    count: u64,
    sum: f64,
    compensation: f64,
    simple_sum: f64,
    min: f64,
    max: f64,
}

impl Default for DoubleSummaryStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleSummaryStatistics {
    pub const fn new() -> Self {
        DoubleSummaryStatistics {
            count: 0,
            sum: 0.0,
            compensation: 0.0,
            simple_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Rebuilds a summary from recorded figures. A non-empty summary needs
    /// `min <= max` and no NaN bound unless every bound is NaN.
    pub fn with_values(count: u64, min: f64, max: f64, sum: f64) -> Result<Self> {
        if count == 0 {
            return Ok(Self::new());
        }
        if min > max {
            return Err(CollectionError::illegal_argument("min > max"));
        }
        let nans = [min, max, sum].iter().filter(|v| v.is_nan()).count();
        if nans != 0 && nans != 3 {
            return Err(CollectionError::illegal_argument("some, not all, of min, max, sum are NaN"));
        }
        Ok(DoubleSummaryStatistics {
            count,
            sum,
            compensation: 0.0,
            simple_sum: sum,
            min,
            max,
        })
    }

    fn add_compensated(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    pub fn accept(&mut self, value: f64) {
        self.count += 1;
        self.simple_sum += value;
        self.add_compensated(value);
        self.min = nan_min(self.min, value);
        self.max = nan_max(self.max, value);
    }

    pub fn combine(&mut self, other: &Self) {
        self.count += other.count;
        self.simple_sum += other.simple_sum;
        self.add_compensated(other.sum);
        self.add_compensated(-other.compensation);
        self.min = nan_min(self.min, other.min);
        self.max = nan_max(self.max, other.max);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        let sum = self.sum - self.compensation;
        if sum.is_nan() && self.simple_sum.is_infinite() {
            self.simple_sum
        } else {
            sum
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum() / self.count as f64
        }
    }
}

/// `f64::min` skips NaN; a summary that has seen NaN keeps it.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

impl Extend<f64> for DoubleSummaryStatistics {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| self.accept(v));
    }
}

impl FromIterator<f64> for DoubleSummaryStatistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut s = Self::new();
        s.extend(iter);
        s
    }
}

impl Display for DoubleSummaryStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DoubleSummaryStatistics{{count={}, sum={:.6}, min={:.6}, average={:.6}, max={:.6}}}",
            self.count,
            self.sum(),
            self.min,
            self.average(),
            self.max
        )
    }
}
