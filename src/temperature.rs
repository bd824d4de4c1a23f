//! Functions to compute temperatures from raw thermal
//! grids, and to normalize grids for display.
//!
//! Raw thermal values are Kelvin scaled by 10. All
//! functions here are pure; they back both the batch
//! export and interactive re-rendering on range changes.
use itertools::{Itertools, MinMaxResult};
use ndarray::{Array2, ArrayBase, Data, Ix2};
use serde_derive::*;
use tracing::debug;

/// Raw thermal values per Kelvin.
pub const KELVIN_SCALE: f64 = 10.;
const CELSIUS_OFFSET: f64 = 273.15;

pub fn fahrenheit(kelvin: f64) -> f64 {
    (kelvin - CELSIUS_OFFSET) * 9. / 5. + 32.
}

/// Kelvin grid from raw thermal values.
pub fn to_physical<S>(raw: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = u16>,
{
    raw.mapv(|v| v as f64 / KELVIN_SCALE)
}

pub fn kelvin_to_fahrenheit<S>(kelvin: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    kelvin.mapv(fahrenheit)
}

/// Fahrenheit grid from raw thermal values.
pub fn raw_to_fahrenheit<S>(raw: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = u16>,
{
    kelvin_to_fahrenheit(&to_physical(raw))
}

/// Value range mapped onto `[0, 1]` by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    /// The grid's own min and max, `None` if it is empty.
    pub fn of<S, A>(grid: &ArrayBase<S, Ix2>) -> Option<Self>
    where
        S: Data<Elem = A>,
        A: Copy + Into<f64>,
    {
        match grid.iter().map(|&v| -> f64 { v.into() }).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some(Range::new(v, v)),
            MinMaxResult::MinMax(min, max) => Some(Range::new(min, max)),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    #[inline]
    fn scale(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

/// Map `grid` linearly so that `range` spans `[0, 1]`.
///
/// The range defaults to the grid's own. Values outside
/// the range are not clamped. A degenerate range yields an
/// all-zero grid.
pub fn normalize<S, A>(grid: &ArrayBase<S, Ix2>, range: Option<Range>) -> Array2<f64>
where
    S: Data<Elem = A>,
    A: Copy + Into<f64>,
{
    let range = match range.or_else(|| Range::of(grid)) {
        Some(range) => range,
        None => return Array2::zeros(grid.raw_dim()),
    };
    if range.is_degenerate() {
        debug!(value = range.min, "degenerate display range");
        return Array2::zeros(grid.raw_dim());
    }
    grid.mapv(|v| range.scale(v.into()))
}

#[cfg(test)]
mod tests {
    use ndarray::{arr2, Array2};

    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn raw_values_are_decikelvin() {
        let raw = arr2(&[[2730u16, 2740], [2750, 2760]]);
        assert_eq!(to_physical(&raw), arr2(&[[273.0, 274.0], [275.0, 276.0]]));
    }

    #[test]
    fn kelvin_to_fahrenheit_known_points() {
        let f = kelvin_to_fahrenheit(&arr2(&[[273.15, 373.15], [0., 255.37222222222223]]));
        assert_close(f[(0, 0)], 32.);
        assert_close(f[(0, 1)], 212.);
        assert_close(f[(1, 0)], -459.67);
        assert_close(f[(1, 1)], 0.);
    }

    #[test]
    fn raw_value_near_freezing() {
        let f = raw_to_fahrenheit(&arr2(&[[2731u16, 2732]]));
        assert_close(f[(0, 0)], 31.91);
        assert_close(f[(0, 1)], 32.09);
    }

    #[test]
    fn normalize_defaults_to_own_range() {
        let grid = arr2(&[[0u16, 5], [10, 20]]);
        assert_eq!(Range::of(&grid), Some(Range::new(0., 20.)));
        assert_eq!(
            normalize(&grid, None),
            arr2(&[[0., 0.25], [0.5, 1.]])
        );
    }

    #[test]
    fn normalize_does_not_clamp() {
        let grid = arr2(&[[-10., 10.], [20., 30.]]);
        assert_eq!(
            normalize(&grid, Some(Range::new(0., 20.))),
            arr2(&[[-0.5, 0.5], [1., 1.5]])
        );
    }

    #[test]
    fn degenerate_range_normalizes_to_zero() {
        let flat = arr2(&[[7u8, 7, 7], [7, 7, 7]]);
        let range = Range::of(&flat).unwrap();
        assert!(range.is_degenerate());
        let out = normalize(&flat, None);
        assert_eq!(out, Array2::<f64>::zeros((2, 3)));

        let grid = arr2(&[[1., 2.], [3., 4.]]);
        let out = normalize(&grid, Some(Range::new(2.5, 2.5)));
        assert!(out.iter().all(|v| *v == 0.));
        assert_eq!(out.dim(), (2, 2));
    }

    #[test]
    fn single_pixel_and_empty_grids() {
        let one = arr2(&[[42u16]]);
        assert_eq!(Range::of(&one), Some(Range::new(42., 42.)));
        assert_eq!(normalize(&one, None), arr2(&[[0.]]));

        let empty = Array2::<u16>::zeros((0, 3));
        assert_eq!(Range::of(&empty), None);
        assert_eq!(normalize(&empty, None).dim(), (0, 3));
    }
}
