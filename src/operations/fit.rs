use tracing::trace;

use crate::error::{OperationError, Result};
use crate::geometry::Shape;
use crate::operations::planar::{clearance, scale};

/// Tuning for [`FitLegendScale`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Smallest acceptable gap between legend and face edge.
    pub min_clearance: f64,
    /// Largest acceptable gap between legend and face edge.
    pub max_clearance: f64,
    pub initial_scale: f64,
    pub initial_step: f64,
    pub max_iterations: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            min_clearance: 1.0,
            max_clearance: 2.0,
            initial_scale: 1.0,
            initial_step: 0.4,
            max_iterations: 100,
        }
    }
}

/// Outcome of a scale search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub scale: f64,
    /// Clearance at `scale`.
    pub clearance: f64,
    pub iterations: usize,
}

/// Searches for a uniform legend scale that leaves a clearance inside the
/// configured band.
///
/// The scale moves in fixed steps and the step halves each time the
/// direction reverses.
pub struct FitLegendScale<'a> {
    face: &'a Shape,
    legend: &'a [Shape],
    params: FitParams,
}

impl<'a> FitLegendScale<'a> {
    /// Creates a new `FitLegendScale` operation.
    #[must_use]
    pub fn new(face: &'a Shape, legend: &'a [Shape]) -> Self {
        Self {
            face,
            legend,
            params: FitParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: FitParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the search.
    ///
    /// An empty legend fits at the initial scale.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for an empty or inverted band
    /// and `OperationError::NotConverging` once the iteration cap is passed.
    pub fn execute(&self) -> Result<FitResult> {
        let FitParams {
            min_clearance,
            max_clearance,
            initial_scale,
            initial_step,
            max_iterations,
        } = self.params;
        if min_clearance > max_clearance || initial_scale <= 0.0 || initial_step <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "bad fit parameters: band [{min_clearance}, {max_clearance}], \
                 scale {initial_scale}, step {initial_step}"
            ))
            .into());
        }

        let mut factor = initial_scale;
        let mut gap = self.clearance_at(factor);
        if self.legend.is_empty() {
            return Ok(FitResult {
                scale: factor,
                clearance: gap,
                iterations: 0,
            });
        }

        let mut step = initial_step;
        let mut shrinking = gap < min_clearance;
        let mut iterations = 0;

        while gap < min_clearance || gap > max_clearance {
            iterations += 1;
            if iterations > max_iterations {
                return Err(OperationError::NotConverging { iterations }.into());
            }

            if gap < min_clearance {
                if !shrinking {
                    step /= 2.0;
                    shrinking = true;
                }
                while factor - step <= 0.0 {
                    step /= 2.0;
                }
                factor -= step;
            } else {
                if shrinking {
                    step /= 2.0;
                    shrinking = false;
                }
                factor += step;
            }

            gap = self.clearance_at(factor);
            trace!(iterations, factor, step, gap, "legend fit step");
        }

        Ok(FitResult {
            scale: factor,
            clearance: gap,
            iterations,
        })
    }

    fn clearance_at(&self, factor: f64) -> f64 {
        clearance(self.face, &scale(self.legend, factor))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::DiceError;
    use crate::math::Point2;

    fn square(half: f64) -> Shape {
        Shape::from_points(&[
            Point2::new(-half, half),
            Point2::new(half, half),
            Point2::new(half, -half),
            Point2::new(-half, -half),
        ])
    }

    fn assert_in_band(result: &FitResult) {
        assert!(result.iterations < 100);
        assert!((1.0..=2.0).contains(&result.clearance), "{result:?}");
    }

    #[test]
    fn six_in_ten_already_fits() {
        let result = FitLegendScale::new(&square(5.0), &[square(3.0)])
            .execute()
            .unwrap();
        assert_in_band(&result);
    }

    #[test]
    fn small_legend_grows() {
        let result = FitLegendScale::new(&square(5.0), &[square(1.0)])
            .execute()
            .unwrap();
        assert_in_band(&result);
        assert!(result.scale > 2.9);
    }

    #[test]
    fn oversized_legend_shrinks() {
        let result = FitLegendScale::new(&square(5.0), &[square(20.0)])
            .execute()
            .unwrap();
        assert_in_band(&result);
        assert!(result.scale > 0.0 && result.scale < 0.21);
    }

    #[test]
    fn empty_legend_keeps_initial_scale() {
        let result = FitLegendScale::new(&square(5.0), &[]).execute().unwrap();
        assert!(result.scale > 0.999 && result.scale < 1.001);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn impossible_band_does_not_converge() {
        let params = FitParams {
            min_clearance: 1.55,
            max_clearance: 1.550_000_1,
            max_iterations: 5,
            ..FitParams::default()
        };
        let err = FitLegendScale::new(&square(5.0), &[square(1.0)])
            .with_params(params)
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            DiceError::Operation(OperationError::NotConverging { .. })
        ));
    }
}
