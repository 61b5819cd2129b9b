use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::legend::Legend;
use crate::math::Vector2;
use crate::operations::planar::Placement;

/// A numeric die parameter with its range and snapping step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dial {
    /// Stable key used in [`DieParams`].
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Dial {
    /// Snaps `value` to the step grid, then clamps it into range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let snapped = if self.step > 0.0 {
            (value / self.step).round() * self.step
        } else {
            value
        };
        snapped.max(self.min).min(self.max)
    }

    /// Whether `value` is the default, up to snapping noise.
    #[must_use]
    pub fn is_default(&self, value: f64) -> bool {
        (value - self.default).abs() <= self.step.max(1.0) * 1e-9
    }
}

/// Depth of the engraved legend, shared by every die.
pub const ENGRAVING_DEPTH: Dial = Dial {
    id: "engraving_depth",
    name: "Engraving Depth",
    description: "How deep the legends are cut into the faces",
    default: 0.8,
    min: 0.1,
    max: 1.5,
    step: 0.01,
};

/// String-keyed dial values for one die.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DieParams(BTreeMap<String, f64>);

impl DieParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<String>, value: f64) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: impl Into<String>, value: f64) {
        self.0.insert(id.into(), value);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// The value for `dial`, clamped, or its default when missing or not finite.
    #[must_use]
    pub fn value(&self, dial: &Dial) -> f64 {
        self.get(dial.id)
            .filter(|v| v.is_finite())
            .map_or(dial.default, |v| dial.clamp(v))
    }

    #[must_use]
    pub fn engraving_depth(&self) -> f64 {
        self.value(&ENGRAVING_DEPTH)
    }

    /// Canonical form used to detect changes.
    ///
    /// Keeps only the listed dials, clamped, and drops values equal to their
    /// default. The engraving depth is always present.
    #[must_use]
    pub fn simplify(&self, dials: &[Dial]) -> Self {
        let mut out = BTreeMap::new();
        for dial in dials {
            if let Some(raw) = self.get(dial.id).filter(|v| v.is_finite()) {
                let value = dial.clamp(raw);
                if !dial.is_default(value) {
                    out.insert(dial.id.to_string(), value);
                }
            }
        }
        out.insert(ENGRAVING_DEPTH.id.to_string(), self.engraving_depth());
        Self(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Optional per-face overrides. `None` inherits from the face and die.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceParams {
    pub legend: Option<Legend>,
    /// Multiplies the die-wide auto-fit scale.
    pub scale: Option<f64>,
    /// Radians.
    pub rotation: Option<f64>,
    pub offset: Option<Vector2>,
    /// Added to the die's engraving depth.
    pub extra_depth: Option<f64>,
}

impl FaceParams {
    /// Canonical form: fields equal to what the face would use anyway are
    /// dropped and the rotation is brought into `[0, 2π)`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn simplify(&self, default_legend: Legend) -> Self {
        Self {
            legend: self.legend.filter(|&l| l != default_legend),
            scale: self.scale.filter(|&s| s.is_finite() && s != 1.0),
            rotation: self
                .rotation
                .filter(|r| r.is_finite())
                .map(|r| r.rem_euclid(TAU))
                .filter(|&r| r != 0.0 && r < TAU),
            offset: self.offset.filter(|o| o.norm_squared() != 0.0),
            extra_depth: self.extra_depth.filter(|&d| d.is_finite() && d != 0.0),
        }
    }

    #[must_use]
    pub fn legend_or(&self, default_legend: Legend) -> Legend {
        self.legend.unwrap_or(default_legend)
    }

    /// Legend placement for a die whose legends auto-fit at `fit_scale`.
    #[must_use]
    pub fn placement(&self, fit_scale: f64) -> Placement {
        Placement {
            scale: fit_scale * self.scale.unwrap_or(1.0),
            rotation: self.rotation.unwrap_or(0.0),
            offset: self.offset.unwrap_or_else(Vector2::zeros),
        }
    }

    #[must_use]
    pub fn depth(&self, die_depth: f64) -> f64 {
        die_depth + self.extra_depth.unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SIZE: Dial = Dial {
        id: "size",
        name: "Size",
        description: "",
        default: 18.0,
        min: 6.0,
        max: 60.0,
        step: 0.5,
    };

    #[test]
    fn dial_snaps_then_clamps() {
        assert_relative_eq!(SIZE.clamp(17.8), 18.0);
        assert_relative_eq!(SIZE.clamp(17.7), 17.5);
        assert_relative_eq!(SIZE.clamp(2.0), 6.0);
        assert_relative_eq!(SIZE.clamp(99.0), 60.0);
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let params = DieParams::new().with("size", f64::NAN);
        assert_relative_eq!(params.value(&SIZE), 18.0);
        assert_relative_eq!(params.engraving_depth(), 0.8);
    }

    #[test]
    fn simplify_drops_defaults_and_unknown_keys() {
        let params = DieParams::new()
            .with("size", 18.1)
            .with("other", 3.0)
            .with("engraving_depth", 5.0);
        let simple = params.simplify(&[SIZE]);
        assert_eq!(simple.get("size"), None);
        assert_eq!(simple.get("other"), None);
        assert_relative_eq!(simple.get("engraving_depth").unwrap(), 1.5);

        let bigger = DieParams::new().with("size", 20.2).simplify(&[SIZE]);
        assert_relative_eq!(bigger.get("size").unwrap(), 20.0);
        assert_relative_eq!(bigger.get("engraving_depth").unwrap(), 0.8);
        assert_ne!(simple, bigger);
    }

    #[test]
    fn face_params_simplify() {
        let params = FaceParams {
            legend: Some(Legend::SIX),
            scale: Some(1.0),
            rotation: Some(-std::f64::consts::FRAC_PI_2),
            offset: Some(Vector2::zeros()),
            extra_depth: Some(0.0),
        };
        let simple = params.simplify(Legend::SIX);
        assert_eq!(simple.legend, None);
        assert_eq!(simple.scale, None);
        assert_eq!(simple.offset, None);
        assert_eq!(simple.extra_depth, None);
        assert_relative_eq!(simple.rotation.unwrap(), 1.5 * std::f64::consts::PI);

        let full_turn = FaceParams {
            rotation: Some(TAU),
            ..FaceParams::default()
        };
        assert_eq!(full_turn.simplify(Legend::ONE), FaceParams::default());
        assert_eq!(
            FaceParams {
                legend: Some(Legend::NINE_MARKED),
                ..FaceParams::default()
            }
            .simplify(Legend::NINE)
            .legend,
            Some(Legend::NINE_MARKED)
        );
    }

    #[test]
    fn placement_multiplies_fit_scale() {
        let params = FaceParams {
            scale: Some(0.5),
            ..FaceParams::default()
        };
        let placement = params.placement(0.8);
        assert_relative_eq!(placement.scale, 0.4);
        assert_relative_eq!(params.depth(0.8), 0.8);
    }
}
