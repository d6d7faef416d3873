//! Curve generation.

use cgen_core::traits::{NamedVariant, Tracked};
use cgen_core::{CurveError, Result, TimeStamp};
use cgen_geometry::{
    Curve, KochanekParams, ParametricSpline, PointSortingMethod, PolynomialApproximation,
    SplineKind,
};
use cgen_math::Point3;
use cgen_surface::SurfacePathFinder;
use cgen_topology::SurfaceMesh;

use crate::config::{CurveConfig, CurveModel};
use crate::output::OutputCurve;
use crate::points::ControlPoints;

/// Input stamps an output was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BuildKey {
    config: TimeStamp,
    points: TimeStamp,
    mesh: Option<TimeStamp>,
}

/// Builds an [`OutputCurve`] from control points.
///
/// The output is cached: [`CurveGenerator::generate`] recomputes only when
/// the configuration, the control points or the mesh changed since the last
/// call.
#[derive(Debug, Clone)]
pub struct CurveGenerator {
    config: CurveConfig,
    /// Set when the curve model was selected by a name that is not known.
    unknown_model: Option<String>,
    mtime: TimeStamp,
    polynomial: PolynomialApproximation,
    path_finder: SurfacePathFinder,
    output: OutputCurve,
    built_from: Option<BuildKey>,
    update_count: u64,
}

impl CurveGenerator {
    pub fn new(config: CurveConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            unknown_model: None,
            mtime: TimeStamp::now(),
            polynomial: PolynomialApproximation::new(),
            path_finder: SurfacePathFinder::new(config.surface_cost_function),
            output: OutputCurve::default(),
            built_from: None,
            update_count: 0,
        }
    }

    pub fn config(&self) -> &CurveConfig {
        &self.config
    }

    /// Replace the configuration; out-of-range values are clamped.
    pub fn set_config(&mut self, config: CurveConfig) {
        self.apply_config(config, true);
    }

    /// Edit the configuration in place. An unknown model selected by name
    /// stays in effect.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut CurveConfig)) {
        let mut config = self.config;
        edit(&mut config);
        self.apply_config(config, false);
    }

    fn apply_config(&mut self, config: CurveConfig, select_model: bool) {
        let config = config.sanitized();
        let clear_unknown = select_model && self.unknown_model.is_some();
        if config != self.config || clear_unknown {
            self.config = config;
            if clear_unknown {
                self.unknown_model = None;
            }
            self.mtime.modified();
        }
    }

    pub fn set_curve_model(&mut self, model: CurveModel) {
        let mut config = self.config;
        config.curve_model = model;
        self.apply_config(config, true);
    }

    /// Select the curve model by its configuration name.
    ///
    /// An unknown name is logged and leaves the generator producing empty
    /// output until a valid model is selected.
    pub fn set_curve_model_from_str(&mut self, name: &str) -> Result<()> {
        match CurveModel::from_name(name) {
            Ok(model) => {
                self.set_curve_model(model);
                Ok(())
            }
            Err(err) => {
                log::error!("{err}");
                self.unknown_model = Some(name.to_owned());
                self.mtime.modified();
                Err(err)
            }
        }
    }

    /// Current model, or `None` after an unknown model name was selected.
    pub fn curve_model(&self) -> Option<CurveModel> {
        match self.unknown_model {
            Some(_) => None,
            None => Some(self.config.curve_model),
        }
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.update_config(|c| c.closed = closed);
    }

    pub fn set_samples_per_segment(&mut self, samples: usize) {
        self.update_config(|c| c.samples_per_segment = samples);
    }

    /// Number of times the output was actually recomputed.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Last generated curve.
    pub fn output(&self) -> &OutputCurve {
        &self.output
    }

    /// Effective polynomial order of the last polynomial fit.
    pub fn polynomial_effective_order(&self) -> Option<usize> {
        self.polynomial.effective_order()
    }

    /// Generate the curve for `points`, or return the cached one if nothing
    /// changed. `mesh` is only read by the surface model.
    pub fn generate(&mut self, points: &ControlPoints, mesh: Option<&SurfaceMesh>) -> &OutputCurve {
        let key = BuildKey {
            config: self.mtime,
            points: points.mtime(),
            mesh: mesh.map(Tracked::mtime),
        };
        if self.built_from == Some(key) {
            log::debug!("Curve is up to date");
            return &self.output;
        }

        self.update_count += 1;
        if let Err(err) = self.rebuild(points.as_slice(), mesh) {
            match err {
                CurveError::ConfigurationMismatch(_) => log::error!("Curve generation failed: {err}"),
                _ => log::warn!("Curve generation produced no points: {err}"),
            }
            self.output.clear();
        }
        self.built_from = Some(key);
        &self.output
    }

    fn rebuild(&mut self, points: &[Point3], mesh: Option<&SurfaceMesh>) -> Result<()> {
        if let Some(name) = &self.unknown_model {
            return Err(CurveError::ConfigurationMismatch(format!(
                "Unknown {}: {name:?}",
                CurveModel::KIND
            )));
        }
        if points.len() < 2 {
            return Err(CurveError::InsufficientData(format!(
                "Curve needs at least 2 control points, got {}",
                points.len()
            )));
        }

        let config = self.config;
        log::debug!(
            "Generating {} curve from {} control points",
            config.curve_model,
            points.len()
        );
        match config.curve_model {
            CurveModel::LinearSpline => self.generate_spline(points, SplineKind::Linear),
            CurveModel::CardinalSpline => self.generate_spline(points, SplineKind::Cardinal),
            CurveModel::KochanekSpline => {
                let k = config.kochanek;
                let params = KochanekParams::new(k.bias, k.tension, k.continuity);
                self.generate_spline(points, SplineKind::Kochanek(params))
            }
            CurveModel::Polynomial => self.generate_polynomial(points),
            CurveModel::ShortestDistanceOnSurface => {
                let mesh = mesh.ok_or_else(|| {
                    CurveError::InsufficientData("Surface curve needs a mesh".into())
                })?;
                self.generate_surface(points, mesh);
                Ok(())
            }
        }
    }

    /// Sample count for `segments` segments, end point included.
    fn sample_count(&self, segments: usize) -> usize {
        segments * self.config.samples_per_segment + 1
    }

    fn generate_spline(&mut self, points: &[Point3], kind: SplineKind) -> Result<()> {
        let closed = self.config.closed;
        let mut spline = ParametricSpline::new(kind);
        spline.set_closed(closed);
        spline.set_points(points);
        if matches!(kind, SplineKind::Kochanek(_)) {
            spline.set_copy_nearest_end_derivatives(self.config.kochanek.copy_nearest_end_derivatives);
        }

        let segments = if closed { points.len() } else { points.len() - 1 };
        let samples = spline.sample_uniform(self.sample_count(segments));
        self.output.set_points(samples, closed);

        let per_segment = self.config.samples_per_segment;
        let indices = (0..points.len()).map(|i| i * per_segment).collect();
        self.output.set_control_points(points, indices);
        Ok(())
    }

    fn generate_polynomial(&mut self, points: &[Point3]) -> Result<()> {
        let settings = self.config.polynomial;
        let params = settings.sort_method.parameters(points).or_else(|err| {
            log::warn!("{err}; parameterizing by index");
            PointSortingMethod::Indices.parameters(points)
        })?;

        // the polynomial never wraps around in parameter space
        let count = self.sample_count(points.len() - 1);
        let poly = &mut self.polynomial;
        poly.set_order(settings.order);
        poly.set_fit_method(settings.fit_method);
        poly.set_weight_function(settings.weight_function);
        poly.set_sample_width(settings.sample_width);
        poly.set_points_and_parameters(points, &params)?;

        let samples = poly.sample_uniform(count);
        self.output.set_points(samples, self.config.closed);
        self.output.set_control_points(points, Vec::new());
        Ok(())
    }

    fn generate_surface(&mut self, points: &[Point3], mesh: &SurfaceMesh) {
        self.path_finder.set_cost_function(self.config.surface_cost_function);
        let curve = self.path_finder.find_curve(mesh, points, self.config.closed);
        self.output.set_points(curve.points, self.config.closed);
        self.output.set_control_points(points, curve.control_point_indices);
    }
}

impl Default for CurveGenerator {
    fn default() -> Self {
        Self::new(CurveConfig::default())
    }
}

impl Tracked for CurveGenerator {
    fn mtime(&self) -> TimeStamp {
        self.mtime
    }
}
