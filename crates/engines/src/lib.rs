#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations and provides SVG
//! export and CPU-side preview rendering.
//!
//! This crate sits between `gen-art-core` (which defines the `Engine` trait)
//! and the individual engine crates (`gen-art-fabric`, `gen-art-flow`,
//! `gen-art-voronoi`). The CLI depends on it to avoid duplicating dispatch
//! logic.

pub mod pixel;
pub mod svg;

#[cfg(feature = "png")]
pub mod snapshot;

use gen_art_core::error::EngineError;
use gen_art_core::geometry::{Bounds, Drawing, Page, Placement};
use gen_art_core::Engine;
use gen_art_fabric::{ClassicFabric, Fabric, View};
use gen_art_flow::Flow;
use gen_art_voronoi::Voronoi;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use svg::SvgMeta;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["fabric", "fabric-classic", "flow", "voronoi"];

/// Margin around the classic fabric in its preview image.
const CLASSIC_PREVIEW_MARGIN: f64 = 20.0;

/// Enumeration of all available generative art engines.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction (CLI).
pub enum EngineKind {
    /// Organic fabric: Perlin-displaced threads with view navigation.
    Fabric(Fabric),
    /// The first fabric sketch, with decaying motion.
    FabricClassic(ClassicFabric),
    /// Particles advected through a sine flow field.
    Flow(Flow),
    /// Drifting sites and their Voronoi ridges.
    Voronoi(Voronoi),
}

impl EngineKind {
    /// Constructs an engine by name.
    ///
    /// `width` and `height` size the canvas of the canvas-space engines and
    /// `seed` drives their random placement; the fabrics ignore both.
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        match name {
            "fabric" => Ok(EngineKind::Fabric(Fabric::from_json(params)?)),
            "fabric-classic" => Ok(EngineKind::FabricClassic(ClassicFabric::from_json(params)?)),
            "flow" => Ok(EngineKind::Flow(Flow::from_json(width, height, seed, params)?)),
            "voronoi" => Ok(EngineKind::Voronoi(Voronoi::from_json(
                width, height, seed, params,
            )?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// Registry name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Fabric(_) => "fabric",
            EngineKind::FabricClassic(_) => "fabric-classic",
            EngineKind::Flow(_) => "flow",
            EngineKind::Voronoi(_) => "voronoi",
        }
    }

    /// Title written into exported documents.
    pub fn title(&self) -> &'static str {
        match self {
            EngineKind::Fabric(_) => "Organic Fabric",
            EngineKind::FabricClassic(_) => "Organic Motion Simulation",
            EngineKind::Flow(_) => "Fluid Flow",
            EngineKind::Voronoi(_) => "Voronoi Art",
        }
    }

    /// The fabric's view, for pan/tilt/zoom of its preview.
    pub fn view_mut(&mut self) -> Option<&mut View> {
        match self {
            EngineKind::Fabric(e) => Some(e.view_mut()),
            _ => None,
        }
    }

    /// Fixed export path for engines that have one.
    pub fn default_output(&self) -> Option<&'static str> {
        match self {
            EngineKind::FabricClassic(_) => Some(gen_art_fabric::classic::DEFAULT_EXPORT_PATH),
            _ => None,
        }
    }

    /// Writes the current frame as SVG onto the engine's page.
    ///
    /// Canvas-space engines export their canvas 1:1; the fabrics are fitted
    /// to the page by their own bounds.
    ///
    /// Returns `EngineError::EmptyGeometry` if there is nothing drawn yet.
    pub fn export_svg(&self, path: &Path) -> Result<Placement, EngineError> {
        let description = format!("Generated by gen-art {}", self.name());
        svg::write_svg(
            self.drawing(),
            self.export_frame(),
            self.page(),
            SvgMeta {
                title: self.title(),
                description: &description,
            },
            path,
        )
    }

    /// Renders the current frame as it would appear on screen.
    ///
    /// The fabric goes through its view; the classic fabric is fitted to the
    /// image; flow and voronoi are already in canvas coordinates.
    pub fn preview_rgba(&self, width: usize, height: usize) -> Vec<u8> {
        match self {
            EngineKind::Fabric(e) => pixel::rasterize(
                e.drawing(),
                &e.view().screen_projection(width, height),
                width,
                height,
            ),
            EngineKind::FabricClassic(e) => pixel::rasterize(
                e.drawing(),
                &fit_to_image(e.drawing(), width, height),
                width,
                height,
            ),
            EngineKind::Flow(_) | EngineKind::Voronoi(_) => {
                pixel::rasterize(self.drawing(), &Placement::IDENTITY, width, height)
            }
        }
    }

    /// Writes [`EngineKind::preview_rgba`] as a PNG.
    #[cfg(feature = "png")]
    pub fn write_preview(&self, width: usize, height: usize, path: &Path) -> Result<(), EngineError> {
        match self {
            EngineKind::Fabric(e) => snapshot::write_png(
                e.drawing(),
                &e.view().screen_projection(width, height),
                width,
                height,
                path,
            ),
            EngineKind::FabricClassic(e) => snapshot::write_png(
                e.drawing(),
                &fit_to_image(e.drawing(), width, height),
                width,
                height,
                path,
            ),
            EngineKind::Flow(_) | EngineKind::Voronoi(_) => {
                snapshot::write_png(self.drawing(), &Placement::IDENTITY, width, height, path)
            }
        }
    }
}

fn fit_to_image(drawing: &Drawing, width: usize, height: usize) -> Placement {
    let page = Page {
        margin: CLASSIC_PREVIEW_MARGIN,
        ..Page::canvas(width, height)
    };
    Bounds::of(drawing)
        .map(|b| Placement::fit(b, page))
        .unwrap_or(Placement::IDENTITY)
}

impl Engine for EngineKind {
    fn step(&mut self) -> Result<(), EngineError> {
        match self {
            EngineKind::Fabric(e) => e.step(),
            EngineKind::FabricClassic(e) => e.step(),
            EngineKind::Flow(e) => e.step(),
            EngineKind::Voronoi(e) => e.step(),
        }
    }

    fn drawing(&self) -> &Drawing {
        match self {
            EngineKind::Fabric(e) => e.drawing(),
            EngineKind::FabricClassic(e) => e.drawing(),
            EngineKind::Flow(e) => e.drawing(),
            EngineKind::Voronoi(e) => e.drawing(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Fabric(e) => e.params(),
            EngineKind::FabricClassic(e) => e.params(),
            EngineKind::Flow(e) => e.params(),
            EngineKind::Voronoi(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Fabric(e) => e.param_schema(),
            EngineKind::FabricClassic(e) => e.param_schema(),
            EngineKind::Flow(e) => e.param_schema(),
            EngineKind::Voronoi(e) => e.param_schema(),
        }
    }

    fn set_params(&mut self, params: &Value) -> Result<(), EngineError> {
        match self {
            EngineKind::Fabric(e) => e.set_params(params),
            EngineKind::FabricClassic(e) => e.set_params(params),
            EngineKind::Flow(e) => e.set_params(params),
            EngineKind::Voronoi(e) => e.set_params(params),
        }
    }

    fn reset(&mut self) {
        match self {
            EngineKind::Fabric(e) => e.reset(),
            EngineKind::FabricClassic(e) => e.reset(),
            EngineKind::Flow(e) => e.reset(),
            EngineKind::Voronoi(e) => e.reset(),
        }
    }

    fn tick_interval(&self) -> Duration {
        match self {
            EngineKind::Fabric(e) => e.tick_interval(),
            EngineKind::FabricClassic(e) => e.tick_interval(),
            EngineKind::Flow(e) => e.tick_interval(),
            EngineKind::Voronoi(e) => e.tick_interval(),
        }
    }

    fn page(&self) -> Page {
        match self {
            EngineKind::Fabric(e) => e.page(),
            EngineKind::FabricClassic(e) => e.page(),
            EngineKind::Flow(e) => e.page(),
            EngineKind::Voronoi(e) => e.page(),
        }
    }

    fn export_frame(&self) -> Option<Bounds> {
        match self {
            EngineKind::Fabric(e) => e.export_frame(),
            EngineKind::FabricClassic(e) => e.export_frame(),
            EngineKind::Flow(e) => e.export_frame(),
            EngineKind::Voronoi(e) => e.export_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gen_art_core::geometry::Mark;
    use gen_art_fabric::Button;
    use serde_json::json;

    fn build(name: &str, params: Value) -> EngineKind {
        EngineKind::from_name(name, 120, 90, 42, &params).unwrap()
    }

    #[test]
    fn from_name_builds_every_listed_engine() {
        for name in EngineKind::list_engines() {
            let engine = EngineKind::from_name(name, 64, 48, 42, &json!({})).unwrap();
            assert_eq!(engine.name(), *name);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = EngineKind::from_name("nonexistent", 32, 32, 42, &json!({}));
        assert!(matches!(result, Err(EngineError::UnknownEngine(_))));
    }

    #[test]
    fn canvas_engines_reject_zero_size() {
        for name in ["flow", "voronoi"] {
            let result = EngineKind::from_name(name, 0, 32, 42, &json!({}));
            assert!(matches!(result, Err(EngineError::InvalidDimensions)));
        }
    }

    #[test]
    fn trait_delegation_step_and_drawing() {
        for name in EngineKind::list_engines() {
            let mut engine = build(name, json!({}));
            assert!(engine.drawing().is_empty(), "{name} draws before its first tick");
            engine.step().unwrap();
            assert!(!engine.drawing().is_empty(), "{name} drew nothing");
        }
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        for name in EngineKind::list_engines() {
            let engine = build(name, json!({}));
            let params = engine.params();
            let schema = engine.param_schema();
            for key in params.as_object().unwrap().keys() {
                assert!(schema.get(key).is_some(), "{name}: {key} missing from schema");
            }
        }
    }

    #[test]
    fn trait_delegation_set_params_and_reset() {
        let mut engine = build("flow", json!({}));
        engine.set_params(&json!({"speed": 3.0})).unwrap();
        assert_eq!(engine.params()["speed"], 3.0);
        engine.reset();
        assert_eq!(engine.params()["speed"], 1.0);
    }

    #[test]
    fn ticks_and_pages_per_engine() {
        let fabric = build("fabric", json!({}));
        let flow = build("flow", json!({}));
        let voronoi = build("voronoi", json!({}));
        assert_eq!(fabric.tick_interval(), Duration::from_millis(50));
        assert_eq!(flow.tick_interval(), Duration::from_millis(16));
        assert_eq!(voronoi.tick_interval(), Duration::from_millis(50));
        assert_eq!(fabric.page(), Page::A4);
        assert_eq!(flow.page(), Page::canvas(120, 90));
        assert_eq!(voronoi.page(), Page::canvas(120, 90));
    }

    #[test]
    fn only_fabric_has_a_view() {
        let mut fabric = build("fabric", json!({}));
        let mut flow = build("flow", json!({}));
        assert!(flow.view_mut().is_none());
        let view = fabric.view_mut().unwrap();
        view.drag(Button::Primary, 100.0, 0.0);
        assert_eq!(view.displacement().x, 1.0);
    }

    #[test]
    fn only_classic_fabric_has_a_fixed_output() {
        assert_eq!(
            build("fabric-classic", json!({})).default_output(),
            Some("output/organic_fabric.svg")
        );
        assert_eq!(build("fabric", json!({})).default_output(), None);
    }

    #[test]
    fn determinism_same_seed() {
        for name in ["flow", "voronoi"] {
            let mut a = build(name, json!({"num_particles": 200, "num_points": 40}));
            let mut b = build(name, json!({"num_particles": 200, "num_points": 40}));
            for _ in 0..10 {
                a.step().unwrap();
                b.step().unwrap();
            }
            assert_eq!(a.drawing(), b.drawing(), "{name} diverged");
        }
    }

    #[test]
    fn export_of_empty_flow_is_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.svg");
        let mut engine = build("flow", json!({"num_particles": 0}));
        engine.step().unwrap();
        let err = engine.export_svg(&path).unwrap_err();
        assert!(matches!(err, EngineError::EmptyGeometry));
        assert_eq!(err.to_string(), "nothing to export: the current frame has no geometry");
        assert!(!path.exists());
    }

    #[test]
    fn export_round_trips_through_placement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fabric.svg");
        let mut engine = build("fabric", json!({"num_threads": 3}));
        engine.step().unwrap();
        let placement = engine.export_svg(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<title>Organic Fabric</title>"));
        assert_eq!(text.matches("<path").count(), 3);

        let first = match &engine.drawing().shapes[0].mark {
            Mark::Path(points) => points[0],
            Mark::Dot(p) => *p,
        };
        let d_start = text.find(r#"d="M"#).unwrap() + 4;
        let d_rest = &text[d_start..];
        let pair = &d_rest[..d_rest.find(' ').unwrap()];
        let (x, y) = pair.split_once(',').unwrap();
        let svg_point = gen_art_core::DVec2::new(x.parse().unwrap(), y.parse().unwrap());
        let back = placement.invert(svg_point);
        assert!((back - first).length() < 1e-3 / placement.scale);
    }

    #[test]
    fn voronoi_export_matches_the_canvas_one_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voronoi.svg");
        let mut engine =
            EngineKind::from_name("voronoi", 900, 800, 3, &json!({"num_points": 100})).unwrap();
        for _ in 0..20 {
            engine.step().unwrap();
        }
        let placement = engine.export_svg(&path).unwrap();
        assert_eq!(placement, Placement::IDENTITY);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#"width="900" height="800""#));
        let first = engine.drawing().shapes[0].mark.points()[0];
        let expected = format!(r#"d="M{:.3},{:.3} "#, first.x, first.y);
        assert!(text.contains(&expected));
    }

    #[test]
    fn flow_export_matches_the_canvas_one_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.svg");
        let mut engine = build("flow", json!({"num_particles": 3}));
        engine.step().unwrap();
        assert_eq!(engine.export_svg(&path).unwrap(), Placement::IDENTITY);
    }

    #[test]
    fn view_changes_preview_but_not_export() {
        let mut a = build("fabric", json!({"num_threads": 5}));
        let mut b = build("fabric", json!({"num_threads": 5}));
        a.step().unwrap();
        b.step().unwrap();
        if let Some(view) = b.view_mut() {
            view.drag(Button::Secondary, 200.0, 100.0);
        }
        assert_eq!(a.drawing(), b.drawing());
        let dir = tempfile::tempdir().unwrap();
        let pa = dir.path().join("a.svg");
        let pb = dir.path().join("b.svg");
        a.export_svg(&pa).unwrap();
        b.export_svg(&pb).unwrap();
        assert_eq!(
            std::fs::read_to_string(&pa).unwrap(),
            std::fs::read_to_string(&pb).unwrap()
        );
        assert_ne!(a.preview_rgba(64, 64), b.preview_rgba(64, 64));
    }

    #[test]
    fn preview_has_requested_size() {
        for name in EngineKind::list_engines() {
            let mut engine = build(name, json!({"num_particles": 50, "num_points": 20}));
            engine.step().unwrap();
            assert_eq!(engine.preview_rgba(120, 90).len(), 120 * 90 * 4);
        }
    }

    #[test]
    fn object_safety() {
        let engine = build("voronoi", json!({}));
        let boxed: Box<dyn Engine> = Box::new(engine);
        assert_eq!(boxed.page(), Page::canvas(120, 90));
    }
}
