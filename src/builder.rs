//! Incremental die building and export.
//!
//! The builder keeps the last simplified parameters of the die and of every
//! face and only regenerates what changed between calls.

use tracing::{debug, warn};

use crate::dice::{DieModel, DieParams, DieShape, Face, FaceParams};
use crate::error::Result;
use crate::geometry::Shape;
use crate::legend::{Legend, LegendSet};
use crate::operations::engrave::{Engrave, EngravedPart, Part};
use crate::operations::fit::{FitLegendScale, FitParams};
use crate::tessellation::{
    find_bad_edges, remove_duplicate_triangles, weld, TessellationParams, TriangleMesh,
};

/// Builder tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuilderConfig {
    /// Tessellation for interactive builds.
    pub preview: TessellationParams,
    /// Tessellation for [`Builder::export`].
    pub export: TessellationParams,
    pub fit: FitParams,
    /// Vertices closer than this are merged on export.
    pub weld_tolerance: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            preview: TessellationParams::default(),
            export: TessellationParams::export(),
            fit: FitParams::default(),
            weld_tolerance: 1e-4,
        }
    }
}

/// How a face ended up after engraving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceStatus {
    /// The legend was cut into the face.
    Engraved,
    /// The face has no legend.
    Blank,
    /// The legend did not fit or failed to engrave; the face was left blank.
    Degraded,
}

/// Geometry of one face, placed on the die.
#[derive(Debug, Clone)]
pub struct BuiltFace {
    pub status: FaceStatus,
    pub legend: Legend,
    /// The simplified parameters this face was built from.
    pub params: FaceParams,
    pub parts: Vec<EngravedPart>,
}

impl BuiltFace {
    #[must_use]
    pub fn part(&self, part: Part) -> Option<&TriangleMesh> {
        self.parts.iter().find(|p| p.part == part).map(|p| &p.mesh)
    }
}

/// What a call to [`Builder::build`] regenerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub die_rebuilt: bool,
    pub rebuilt_faces: Vec<usize>,
}

/// Builds and caches the engraved faces of one die.
///
/// Not meant to be shared between threads; move heavy rebuilds to a worker
/// by moving the whole builder.
pub struct Builder<M: DieModel> {
    model: M,
    config: BuilderConfig,
    die_params: Option<DieParams>,
    shape: Option<DieShape>,
    legend_key: Option<(String, u64)>,
    legend_scale: f64,
    /// Set when the die is regenerated, cleared by the next build report.
    die_rebuilt: bool,
    faces: Vec<Option<BuiltFace>>,
}

impl<M: DieModel> Builder<M> {
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            config: BuilderConfig::default(),
            die_params: None,
            shape: None,
            legend_key: None,
            legend_scale: 1.0,
            die_rebuilt: false,
            faces: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The die as of the last build.
    #[must_use]
    pub fn shape(&self) -> Option<&DieShape> {
        self.shape.as_ref()
    }

    #[must_use]
    pub fn face_to_face(&self) -> f64 {
        self.shape.as_ref().map_or(0.0, |s| s.face_to_face)
    }

    /// Die-wide legend scale found by auto-fit.
    #[must_use]
    pub fn legend_scale(&self) -> f64 {
        self.legend_scale
    }

    #[must_use]
    pub fn face(&self, index: usize) -> Option<&BuiltFace> {
        self.faces.get(index).and_then(Option::as_ref)
    }

    /// Every built face, in face order.
    pub fn faces(&self) -> impl Iterator<Item = &BuiltFace> {
        self.faces.iter().flatten()
    }

    /// Brings the die up to date with `die` and `faces`.
    ///
    /// Faces beyond the end of `faces` use default parameters.
    ///
    /// # Errors
    ///
    /// Propagates construction errors of the die model and auto-fit
    /// non-convergence. A face whose legend cannot be engraved does not
    /// fail the build; it is reported as [`FaceStatus::Degraded`].
    pub fn build(
        &mut self,
        die: &DieParams,
        faces: &[FaceParams],
        legends: &dyn LegendSet,
    ) -> Result<BuildReport> {
        self.refresh(die, legends)?;
        let die_rebuilt = std::mem::take(&mut self.die_rebuilt);
        let Some(shape) = self.shape.as_ref() else {
            return Ok(BuildReport::default());
        };
        let depth = die.simplify(self.model.dials()).engraving_depth();

        self.faces.resize(shape.faces.len(), None);

        let mut rebuilt_faces = Vec::new();
        for (index, face) in shape.faces.iter().enumerate() {
            let params = faces
                .get(index)
                .map(|p| p.simplify(face.default_legend))
                .unwrap_or_default();
            let fresh = self.faces[index]
                .as_ref()
                .is_some_and(|built| built.params == params);
            if fresh {
                continue;
            }
            self.faces[index] = Some(engrave_face(
                index,
                face,
                params,
                legends,
                self.legend_scale,
                depth,
                self.config.preview.divisions,
            )?);
            rebuilt_faces.push(index);
        }

        debug!(
            die = self.model.id(),
            die_rebuilt,
            rebuilt = rebuilt_faces.len(),
            "build finished"
        );
        Ok(BuildReport {
            die_rebuilt,
            rebuilt_faces,
        })
    }

    /// Rebuilds every face at export quality and merges the printable parts
    /// into one welded mesh without duplicate triangles.
    ///
    /// The cached preview faces are left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Builder::build`].
    pub fn export(
        &mut self,
        die: &DieParams,
        faces: &[FaceParams],
        legends: &dyn LegendSet,
    ) -> Result<TriangleMesh> {
        self.refresh(die, legends)?;
        let Some(shape) = self.shape.as_ref() else {
            return Ok(TriangleMesh::default());
        };
        let depth = die.simplify(self.model.dials()).engraving_depth();

        let mut merged = TriangleMesh::default();
        for (index, face) in shape.faces.iter().enumerate() {
            let params = faces
                .get(index)
                .map(|p| p.simplify(face.default_legend))
                .unwrap_or_default();
            let built = engrave_face(
                index,
                face,
                params,
                legends,
                self.legend_scale,
                depth,
                self.config.export.divisions,
            )?;
            for part in built.parts.iter().filter(|p| p.part.is_solid()) {
                merged.merge(&part.mesh);
            }
        }

        let welded = weld(&merged, self.config.weld_tolerance);
        let mesh = remove_duplicate_triangles(&welded);
        let bad_edges = find_bad_edges(&mesh);
        debug!(
            die = self.model.id(),
            triangles = mesh.triangle_count(),
            removed = welded.triangle_count() - mesh.triangle_count(),
            bad_edges = bad_edges.len(),
            "export finished"
        );
        Ok(mesh)
    }

    /// Regenerates the die when its parameters changed and the legend scale
    /// when the die or the legend set changed. Either change drops every
    /// cached face.
    fn refresh(&mut self, die: &DieParams, legends: &dyn LegendSet) -> Result<()> {
        let params = die.simplify(self.model.dials());
        let die_changed = self.shape.is_none() || self.die_params.as_ref() != Some(&params);
        if die_changed {
            let shape = self.model.build(&params)?;
            debug!(die = self.model.id(), name = %shape.name, faces = shape.faces.len(), "die rebuilt");
            self.shape = Some(shape);
            self.die_params = Some(params);
            self.die_rebuilt = true;
        }

        let key = (legends.id().to_string(), legends.revision());
        let legends_changed = self.legend_key.as_ref() != Some(&key);
        if die_changed || legends_changed {
            if let Some(shape) = self.shape.as_ref() {
                self.legend_scale = fit_scale(shape, legends, self.config.fit)?;
                debug!(scale = self.legend_scale, "legend scale fitted");
            }
            self.legend_key = Some(key);
            self.faces.clear();
        }
        Ok(())
    }
}

/// Scale at which the widest legend sits comfortably on the first numbered face.
fn fit_scale(shape: &DieShape, legends: &dyn LegendSet, params: FitParams) -> Result<f64> {
    let Some(face) = shape.first_number_face() else {
        return Ok(1.0);
    };
    let widest = legends.get(Legend::DOUBLE_ZERO);
    if widest.is_empty() {
        return Ok(1.0);
    }
    Ok(FitLegendScale::new(&face.outline, widest)
        .with_params(params)
        .execute()?
        .scale)
}

fn engrave_face(
    index: usize,
    face: &Face,
    params: FaceParams,
    legends: &dyn LegendSet,
    fit_scale: f64,
    die_depth: f64,
    divisions: usize,
) -> Result<BuiltFace> {
    let legend = params.legend_or(face.default_legend);
    let symbols = legends.get(legend);
    let placement = params.placement(fit_scale);
    let depth = params.depth(die_depth);
    let engrave = |symbols: &[Shape], depth: f64| {
        Engrave::new(&face.outline, symbols)
            .with_placement(placement)
            .with_depth(depth)
            .with_divisions(divisions)
            .execute()
    };

    let (status, engraved) = match engrave(symbols, depth) {
        Ok(engraved) if !engraved.fits => {
            warn!(face = index, %legend, "legend does not fit, face left blank");
            (FaceStatus::Degraded, engraved)
        }
        Ok(engraved) if symbols.is_empty() => (FaceStatus::Blank, engraved),
        Ok(engraved) => (FaceStatus::Engraved, engraved),
        Err(error) => {
            warn!(face = index, %legend, %error, "engraving failed, face left blank");
            (FaceStatus::Degraded, engrave(&[], die_depth)?)
        }
    };

    let parts = engraved
        .parts
        .into_iter()
        .map(|p| EngravedPart {
            part: p.part,
            mesh: p.mesh.transformed(&face.placement),
        })
        .collect();

    Ok(BuiltFace {
        status,
        legend,
        params,
        parts,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dice::DieKind;
    use crate::legend::ImmutableLegendSet;
    use crate::math::{Point2, Vector2};

    fn init_tracing() {
        let env_filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    }

    fn rect(w: f64, h: f64) -> Shape {
        Shape::from_points(&[
            Point2::new(-w / 2.0, h / 2.0),
            Point2::new(w / 2.0, h / 2.0),
            Point2::new(w / 2.0, -h / 2.0),
            Point2::new(-w / 2.0, -h / 2.0),
        ])
    }

    fn legends() -> ImmutableLegendSet {
        let mut shapes: Vec<Vec<Shape>> = (0..=30).map(|_| vec![rect(1.0, 1.4)]).collect();
        shapes[Legend::DOUBLE_ZERO.slot().unwrap()] = vec![rect(2.0, 1.4)];
        ImmutableLegendSet::new("test", "Test", shapes)
    }

    fn cube() -> Builder<DieKind> {
        Builder::new(DieKind::from_id("d6_cube").unwrap())
    }

    #[test]
    fn only_changed_faces_are_rebuilt() {
        init_tracing();
        let legends = legends();
        let mut builder = cube();
        let die = DieParams::new();

        let first = builder.build(&die, &[], &legends).unwrap();
        assert!(first.die_rebuilt);
        assert_eq!(first.rebuilt_faces, (0..6).collect::<Vec<_>>());
        assert!(builder.faces().all(|f| f.status == FaceStatus::Engraved));

        let again = builder.build(&die, &[], &legends).unwrap();
        assert_eq!(again, BuildReport::default());

        let mut faces = vec![FaceParams::default(); 6];
        faces[2].rotation = Some(1.0);
        let third = builder.build(&die, &faces, &legends).unwrap();
        assert!(!third.die_rebuilt);
        assert_eq!(third.rebuilt_faces, vec![2]);

        // Overrides equal to the defaults change nothing.
        faces[4].scale = Some(1.0);
        faces[4].legend = Some(Legend::FIVE);
        let fourth = builder.build(&die, &faces, &legends).unwrap();
        assert!(fourth.rebuilt_faces.is_empty());
    }

    #[test]
    fn die_changes_rebuild_everything() {
        let legends = legends();
        let mut builder = cube();
        builder.build(&DieParams::new(), &[], &legends).unwrap();

        let same = DieParams::new().with("polyhedron_size", 18.1);
        assert!(!builder.build(&same, &[], &legends).unwrap().die_rebuilt);

        let bigger = DieParams::new().with("polyhedron_size", 24.0);
        let report = builder.build(&bigger, &[], &legends).unwrap();
        assert!(report.die_rebuilt);
        assert_eq!(report.rebuilt_faces.len(), 6);
        assert!((builder.face_to_face() - 24.0).abs() < 1e-12);
    }

    #[test]
    fn build_after_export_uses_the_exported_die() {
        let legends = legends();
        let mut builder = cube();
        builder.build(&DieParams::new(), &[], &legends).unwrap();

        let bigger = DieParams::new().with("polyhedron_size", 40.0);
        builder.export(&bigger, &[], &legends).unwrap();
        let report = builder.build(&bigger, &[], &legends).unwrap();
        assert!(report.die_rebuilt);
        assert_eq!(report.rebuilt_faces.len(), 6);

        let front = builder.face(0).unwrap().part(Part::Front).unwrap();
        let offset = front.triangle_normal(0).dot(&front.triangle(0)[0].coords);
        assert!((offset.abs() - 20.0).abs() < 1e-9, "{offset}");
    }

    #[test]
    fn legend_set_changes_rebuild_every_face() {
        let legends = legends();
        let mut builder = cube();
        builder.build(&DieParams::new(), &[], &legends).unwrap();

        let shapes = (0..=30).map(|_| vec![rect(1.0, 1.0)]).collect();
        let other = ImmutableLegendSet::new("other", "Other", shapes);
        builder.export(&DieParams::new(), &[], &other).unwrap();
        let report = builder.build(&DieParams::new(), &[], &other).unwrap();
        assert!(!report.die_rebuilt);
        assert_eq!(report.rebuilt_faces.len(), 6);
    }

    #[test]
    fn overlapping_symbols_degrade_one_face() {
        init_tracing();
        let mut shapes: Vec<Vec<Shape>> = (0..=30).map(|_| vec![rect(1.0, 1.4)]).collect();
        shapes[Legend::DOUBLE_ZERO.slot().unwrap()] = vec![rect(2.0, 1.4)];
        shapes[Legend::FIVE.slot().unwrap()] = vec![
            rect(1.0, 1.4),
            rect(1.0, 1.4).translated(&Vector2::new(0.4, 0.3)),
        ];
        let legends = ImmutableLegendSet::new("overlap", "Overlap", shapes);
        let mut builder = cube();
        builder.build(&DieParams::new(), &[], &legends).unwrap();

        let (index, broken) = builder
            .faces()
            .enumerate()
            .find(|(_, f)| f.legend == Legend::FIVE)
            .unwrap();
        assert_eq!(broken.status, FaceStatus::Degraded);
        assert!(broken.part(Part::Front).is_some());
        assert!(broken.part(Part::Engraved).is_none());
        for (other, face) in builder.faces().enumerate() {
            if other != index {
                assert_eq!(face.status, FaceStatus::Engraved, "face {other}");
            }
        }
    }

    #[test]
    fn legend_scale_follows_the_widest_legend() {
        let legends = legends();
        let mut builder = cube();
        builder.build(&DieParams::new(), &[], &legends).unwrap();
        let scale = builder.legend_scale();
        // 18 wide faces leave 16..14 for a two unit wide legend.
        assert!(scale > 6.9 && scale < 8.1, "{scale}");

        let empty = ImmutableLegendSet::new("empty", "Empty", Vec::new());
        builder.build(&DieParams::new(), &[], &empty).unwrap();
        assert!((builder.legend_scale() - 1.0).abs() < 1e-12);
        assert!(builder.faces().all(|f| f.status == FaceStatus::Blank));
    }

    #[test]
    fn oversized_legend_degrades_one_face() {
        init_tracing();
        let legends = legends();
        let mut builder = cube();
        let mut faces = vec![FaceParams::default(); 6];
        faces[0].scale = Some(20.0);
        builder.build(&DieParams::new(), &faces, &legends).unwrap();

        let degraded = builder.face(0).unwrap();
        assert_eq!(degraded.status, FaceStatus::Degraded);
        assert!(degraded.part(Part::Engraved).is_none());
        assert!(degraded.part(Part::Symbol).is_some());
        assert!(builder.face(1).unwrap().part(Part::Engraved).is_some());
    }

    #[test]
    fn export_is_closed() {
        let legends = legends();
        let mut builder = cube();
        let mesh = builder.export(&DieParams::new(), &[], &legends).unwrap();
        assert!(!mesh.is_empty());
        assert!(find_bad_edges(&mesh).is_empty());

        let blank = ImmutableLegendSet::new("empty", "Empty", Vec::new());
        let plain = builder.export(&DieParams::new(), &[], &blank).unwrap();
        assert_eq!(plain.vertices.len(), 8);
        assert_eq!(plain.triangle_count(), 12);
    }

    #[test]
    fn csg_dice_build() {
        let legends = legends();
        let mut builder = Builder::new(DieKind::from_id("d10_trapezohedron").unwrap());
        let report = builder.build(&DieParams::new(), &[], &legends).unwrap();
        assert_eq!(report.rebuilt_faces.len(), 10);
        assert!(builder.faces().all(|f| f.status == FaceStatus::Engraved));
    }
}
