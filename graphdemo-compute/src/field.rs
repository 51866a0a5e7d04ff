//! The graph function evaluated for every column.
//!
//! With `a = width / 2`, `c = height / 2` and column `x`, the column is swept
//! by `i` from `-sqrt(a² - x²)` up to (excluding) `sqrt(a² - x²)` in steps of
//! 3.0. Each step yields one mirrored pixel pair:
//!
//! ```text
//! r = sqrt(x² + i²) / a
//! q = (r - 1) * sin(24 r)
//! y = i / 3 + q * c
//! left  = (a - x, trunc(y + c))
//! right = (a + x, trunc(y + c))
//! ```

use graphdemo_core::GridConfig;

/// Distance between consecutive samples along a column.
pub const SAMPLE_STEP: f64 = 3.0;

/// Two pixels plotted together for one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SamplePair {
    pub left: (i64, i64),
    pub right: (i64, i64),
}

/// Pure evaluator of the graph function for one grid size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphField {
    /// Half width (`a`).
    a: i64,
    /// Half height (`c`).
    c: i64,
}

impl GraphField {
    pub fn new(grid: &GridConfig) -> Self {
        Self {
            a: i64::from(grid.width / 2),
            c: i64::from(grid.height / 2),
        }
    }

    /// Number of columns the function is defined on.
    pub fn columns(&self) -> u32 {
        self.a as u32
    }

    /// Lazily evaluate every sample pair of column `x`.
    ///
    /// Columns beyond `width / 2` yield nothing.
    pub fn sample(&self, x: u32) -> ColumnSamples {
        let x = i64::from(x);
        let s = x * x;
        let b = self.a * self.a;
        let p = if s <= b { ((b - s) as f64).sqrt() } else { 0.0 };

        ColumnSamples {
            x,
            s,
            a: self.a,
            c: self.c,
            i: -p,
            p,
        }
    }

    /// Number of pairs `sample(x)` yields, without evaluating them.
    pub fn sample_count(&self, x: u32) -> usize {
        self.sample(x).len()
    }
}

/// Iterator over the sample pairs of one column.
#[derive(Clone, Debug)]
pub struct ColumnSamples {
    x: i64,
    s: i64,
    a: i64,
    c: i64,
    i: f64,
    p: f64,
}

impl Iterator for ColumnSamples {
    type Item = SamplePair;

    fn next(&mut self) -> Option<SamplePair> {
        if self.i >= self.p {
            return None;
        }

        let i = self.i;
        self.i += SAMPLE_STEP;

        let a = self.a as f64;
        let c = self.c as f64;
        let r = ((self.s as f64) + i * i).sqrt() / a;
        let q = (r - 1.0) * (24.0 * r).sin();
        let y = i / 3.0 + q * c;
        // `as` truncates toward zero.
        let py = (y + c) as i64;

        Some(SamplePair {
            left: (self.a - self.x, py),
            right: (self.a + self.x, py),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ColumnSamples {
    fn len(&self) -> usize {
        if self.i >= self.p {
            0
        } else {
            ((self.p - self.i) / SAMPLE_STEP).ceil() as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(width: u32, height: u32) -> GraphField {
        GraphField::new(&GridConfig::new(width, height))
    }

    #[test]
    fn sampling_is_deterministic() {
        let f = field(100, 100);
        for x in [0, 1, 17, 49] {
            let first: Vec<_> = f.sample(x).collect();
            let second: Vec<_> = f.sample(x).collect();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn pairs_are_mirrored_around_half_width() {
        let f = field(100, 100);
        for x in 0..50 {
            for pair in f.sample(x) {
                assert_eq!(pair.left.0, 50 - i64::from(x));
                assert_eq!(pair.right.0, 50 + i64::from(x));
                assert_eq!(pair.left.1, pair.right.1);
            }
        }
    }

    #[test]
    fn first_sample_of_center_column() {
        // x = 0: p = 50, i = -50, r = 1, q = 0, y = -50/3
        let pair = field(100, 100).sample(0).next().unwrap();
        let expected_y = (-50.0f64 / 3.0 + 50.0) as i64;
        assert_eq!(pair.left, (50, expected_y));
        assert_eq!(expected_y, 33);
    }

    #[test]
    fn sample_count_matches_iteration() {
        let f = field(200, 120);
        for x in 0..100 {
            assert_eq!(f.sample_count(x), f.sample(x).count(), "column {x}");
        }
    }

    #[test]
    fn center_column_has_most_samples() {
        let f = field(100, 100);
        // i runs over [-50, 50) in steps of 3
        assert_eq!(f.sample_count(0), 34);
        assert!(f.sample_count(49) < f.sample_count(0));
    }

    #[test]
    fn column_beyond_half_width_is_empty() {
        let f = field(100, 100);
        assert_eq!(f.sample(50).count(), 0);
        assert_eq!(f.sample(1000).count(), 0);
    }

    proptest! {
        #[test]
        fn columns_are_mirrored_and_repeatable(
            half_width in 1u32..2_000,
            half_height in 1u32..2_000,
            column in 0u32..2_000,
        ) {
            let f = field(half_width * 2, half_height * 2);
            let x = column % half_width;
            let first: Vec<_> = f.sample(x).collect();

            prop_assert_eq!(&first, &f.sample(x).collect::<Vec<_>>());
            prop_assert!(!first.is_empty());
            for pair in &first {
                prop_assert_eq!(pair.left.0 + pair.right.0, 2 * i64::from(half_width));
                prop_assert_eq!(pair.left.1, pair.right.1);
            }
        }
    }

    #[test]
    fn default_grid_stays_in_bounds() {
        // Sparse check over the full-size grid.
        let grid = GridConfig::default();
        let f = GraphField::new(&grid);
        for x in (0..f.columns()).step_by(97) {
            for pair in f.sample(x) {
                assert!(pair.left.1 >= 0 && pair.left.1 < i64::from(grid.height));
                assert!(pair.right.0 < i64::from(grid.width));
            }
        }
    }
}
