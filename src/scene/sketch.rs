//! The ribbon sketch: builds the scene once, then animates it frame by frame.
//!
//! Construction runs the whole geometry pipeline (curve, frames, ribbon) and
//! loads both textures before the renderer sees anything, so a failed build
//! leaves the renderer untouched.

use rand::Rng;

use crate::geom::{
    CatmullRomCurve3, CurveError, FrameError, MAX_SEGMENTS, Point3, RibbonDiagnostics,
    RibbonError, RibbonMesh, build_ribbon, generate_curve_with_options, ribbon_capacity,
    sample_curve_frames,
};

use super::animation::{AnimationDriver, FrameScheduler};
use super::camera::{Camera, Lights, RendererSettings, Viewport};
use super::material::{MaterialPair, TextureError, TextureProvider};
use super::options::RibbonOptions;

/// Drawing backend for the sketch.
pub trait Renderer {
    /// Applies output settings; called once before any content is added.
    fn configure(&mut self, _settings: &RendererSettings) {}
    fn add_ribbon(&mut self, mesh: &RibbonMesh, materials: &MaterialPair);
    fn add_curve_line(&mut self, points: &[Point3]);
    fn add_lights(&mut self, lights: &Lights);
    fn render(&mut self, materials: &MaterialPair, camera: &Camera);
    fn resize(&mut self, width: u32, height: u32);
}

#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Ribbon(#[from] RibbonError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
    #[error("curve preview supports at most {max} points, got {count}")]
    TooManyPreviewPoints { count: usize, max: usize },
}

pub struct RibbonSketch<R, S> {
    options: RibbonOptions,
    curve: CatmullRomCurve3,
    mesh: RibbonMesh,
    diagnostics: RibbonDiagnostics,
    preview: Vec<Point3>,
    materials: MaterialPair,
    camera: Camera,
    lights: Lights,
    settings: RendererSettings,
    renderer: R,
    driver: AnimationDriver<S>,
}

impl<R: Renderer, S: FrameScheduler> RibbonSketch<R, S> {
    /// Builds the ribbon scene, hands it to `renderer` and requests the first
    /// frame.
    pub fn new<G, P>(
        options: RibbonOptions,
        rng: &mut G,
        textures: &P,
        mut renderer: R,
        scheduler: S,
        viewport: Viewport,
    ) -> Result<Self, SketchError>
    where
        G: Rng + ?Sized,
        P: TextureProvider + ?Sized,
    {
        if !options.time_step.is_finite() || options.time_step <= 0.0 {
            return Err(SketchError::InvalidTimeStep(options.time_step));
        }
        if options.preview_points > MAX_SEGMENTS {
            return Err(SketchError::TooManyPreviewPoints {
                count: options.preview_points,
                max: MAX_SEGMENTS,
            });
        }
        ribbon_capacity(options.segments)?;

        let curve = generate_curve_with_options(options.generator_options(), rng)?;
        let sampled = sample_curve_frames(&curve, options.segments)?;
        let (mesh, diagnostics) =
            build_ribbon(&sampled, options.half_widths, options.build_options())?;
        let materials = MaterialPair::load(textures, options.texture_offset)?;
        let preview = curve.points(options.preview_points);

        if !diagnostics.is_clean() {
            for warning in &diagnostics.warnings {
                log::warn!("ribbon: {warning}");
            }
        }
        crate::debug_log!("ribbon sketch ready: {}", diagnostics.summary());

        let camera = Camera::new(viewport.aspect());
        let lights = Lights::default();
        let settings = RendererSettings::for_device(viewport.device_pixel_ratio);

        renderer.configure(&settings);
        renderer.resize(viewport.width, viewport.height);
        renderer.add_ribbon(&mesh, &materials);
        renderer.add_curve_line(&preview);
        renderer.add_lights(&lights);

        let mut driver = AnimationDriver::new(scheduler, options.time_step);
        driver.start();

        Ok(Self {
            options,
            curve,
            mesh,
            diagnostics,
            preview,
            materials,
            camera,
            lights,
            settings,
            renderer,
            driver,
        })
    }

    /// Handles one delivered frame; renders if the animation advanced.
    pub fn on_frame(&mut self) -> bool {
        let advanced = self.driver.on_frame(&mut self.materials);
        if advanced {
            self.renderer.render(&self.materials, &self.camera);
        }
        advanced
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn play(&mut self) {
        self.driver.play();
    }

    /// Resizes the output surface. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.camera.resize(width, height) {
            self.renderer.resize(width, height);
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.driver.is_playing()
    }

    #[must_use]
    pub fn time(&self) -> f64 {
        self.driver.time()
    }

    #[must_use]
    pub fn options(&self) -> &RibbonOptions {
        &self.options
    }

    #[must_use]
    pub fn curve(&self) -> &CatmullRomCurve3 {
        &self.curve
    }

    #[must_use]
    pub fn mesh(&self) -> &RibbonMesh {
        &self.mesh
    }

    #[must_use]
    pub fn diagnostics(&self) -> &RibbonDiagnostics {
        &self.diagnostics
    }

    /// Uniform-parameter samples of the curve used for the debug line.
    #[must_use]
    pub fn preview(&self) -> &[Point3] {
        &self.preview
    }

    #[must_use]
    pub fn materials(&self) -> &MaterialPair {
        &self.materials
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn driver(&self) -> &AnimationDriver<S> {
        &self.driver
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.driver.scheduler_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::NamedTextures;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        frames: Vec<[f64; 2]>,
    }

    impl Renderer for Recorder {
        fn configure(&mut self, _settings: &RendererSettings) {
            self.calls.push("configure");
        }
        fn add_ribbon(&mut self, _mesh: &RibbonMesh, _materials: &MaterialPair) {
            self.calls.push("ribbon");
        }
        fn add_curve_line(&mut self, _points: &[Point3]) {
            self.calls.push("line");
        }
        fn add_lights(&mut self, _lights: &Lights) {
            self.calls.push("lights");
        }
        fn render(&mut self, materials: &MaterialPair, _camera: &Camera) {
            self.frames.push(materials.offsets());
        }
        fn resize(&mut self, _width: u32, _height: u32) {
            self.calls.push("resize");
        }
    }

    #[derive(Debug, Default)]
    struct Ticks(usize);

    impl FrameScheduler for Ticks {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    fn small_options() -> RibbonOptions {
        RibbonOptions {
            segments: 64,
            ..RibbonOptions::default()
        }
    }

    fn sketch(options: RibbonOptions) -> Result<RibbonSketch<Recorder, Ticks>, SketchError> {
        RibbonSketch::new(
            options,
            &mut StdRng::seed_from_u64(3),
            &NamedTextures::default(),
            Recorder::default(),
            Ticks::default(),
            Viewport::new(640, 480, 1.0),
        )
    }

    #[test]
    fn construction_installs_scene_in_order() {
        let sketch = sketch(small_options()).unwrap();
        assert_eq!(
            sketch.renderer().calls,
            vec!["configure", "resize", "ribbon", "line", "lights"]
        );
        assert_eq!(sketch.mesh().vertex_count(), 130);
        assert_eq!(sketch.preview().len(), 51);
        assert_eq!(sketch.driver().scheduler().0, 1);
        assert!(sketch.is_playing());
        assert_eq!(sketch.time(), 0.0);
    }

    #[test]
    fn frames_render_moving_offsets() {
        let mut sketch = sketch(small_options()).unwrap();
        assert!(sketch.on_frame());
        assert!(sketch.on_frame());
        sketch.stop();
        assert!(!sketch.on_frame());
        assert_eq!(sketch.renderer().frames.len(), 2);
        assert_eq!(sketch.renderer().frames[0], [0.001, -0.001]);
    }

    #[test]
    fn invalid_time_step_is_rejected() {
        let options = RibbonOptions {
            time_step: 0.0,
            ..small_options()
        };
        assert!(matches!(
            sketch(options),
            Err(SketchError::InvalidTimeStep(_))
        ));
    }

    #[test]
    fn oversized_counts_fail_before_sampling() {
        let options = RibbonOptions {
            segments: usize::MAX,
            ..small_options()
        };
        assert!(matches!(
            sketch(options),
            Err(SketchError::Ribbon(RibbonError::IndexOverflow { segments: usize::MAX }))
        ));

        let options = RibbonOptions {
            segments: MAX_SEGMENTS + 1,
            ..small_options()
        };
        assert!(matches!(
            sketch(options),
            Err(SketchError::Frame(FrameError::TooManySegments { .. }))
        ));

        let options = RibbonOptions {
            preview_points: usize::MAX,
            ..small_options()
        };
        assert!(matches!(
            sketch(options),
            Err(SketchError::TooManyPreviewPoints { .. })
        ));

        let options = RibbonOptions {
            control_points: usize::MAX,
            ..small_options()
        };
        assert!(matches!(
            sketch(options),
            Err(SketchError::Curve(CurveError::TooManyControlPoints { .. }))
        ));
    }

    #[test]
    fn resize_ignores_empty_surface() {
        let mut sketch = sketch(small_options()).unwrap();
        sketch.resize(0, 100);
        assert_eq!(sketch.renderer().calls.len(), 5);
        sketch.resize(200, 100);
        assert_eq!(sketch.camera().aspect, 2.0);
        assert_eq!(sketch.renderer().calls.last(), Some(&"resize"));
    }
}
