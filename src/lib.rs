#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod scene;

use std::fmt;

use geom::{MaterialGroup, Point3, RibbonMesh};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scene::{
    Camera, FrameScheduler, Lights, MaterialPair, NamedTextures, Renderer, RendererSettings,
    RibbonOptions, RibbonSketch, SketchError, Viewport,
};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no panic hook without the feature
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // logging stays silent without `debug_logs`
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Renderer that keeps flat GPU-ready buffers for a JS host to upload.
#[derive(Debug, Default, Clone)]
pub struct BufferRenderer {
    positions: Vec<f64>,
    uvs: Vec<f64>,
    indices: Vec<u32>,
    groups: Vec<MaterialGroup>,
    curve_line: Vec<f64>,
    lights: Option<Lights>,
    settings: Option<RendererSettings>,
    size: (u32, u32),
    offsets: [f64; 2],
    frames_rendered: u64,
}

impl BufferRenderer {
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    #[must_use]
    pub fn uvs(&self) -> &[f64] {
        &self.uvs
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[must_use]
    pub fn groups(&self) -> &[MaterialGroup] {
        &self.groups
    }

    #[must_use]
    pub fn curve_line(&self) -> &[f64] {
        &self.curve_line
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Texture offsets seen by the most recent render.
    #[must_use]
    pub fn offsets(&self) -> [f64; 2] {
        self.offsets
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Renderer for BufferRenderer {
    fn configure(&mut self, settings: &RendererSettings) {
        self.settings = Some(*settings);
    }

    fn add_ribbon(&mut self, mesh: &RibbonMesh, materials: &MaterialPair) {
        self.positions = mesh.positions_flat();
        self.uvs = mesh.uvs_flat();
        self.indices.clone_from(&mesh.indices);
        self.groups.clone_from(&mesh.groups);
        self.offsets = materials.offsets();
    }

    fn add_curve_line(&mut self, points: &[Point3]) {
        self.curve_line = points.iter().flat_map(|p| p.to_array()).collect();
    }

    fn add_lights(&mut self, lights: &Lights) {
        self.lights = Some(*lights);
    }

    fn render(&mut self, materials: &MaterialPair, _camera: &Camera) {
        self.offsets = materials.offsets();
        self.frames_rendered += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

/// Scheduler that records a frame request until the host collects it.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostScheduler {
    requested: bool,
}

impl HostScheduler {
    /// Returns whether a frame was requested and clears the request.
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }
}

impl FrameScheduler for HostScheduler {
    fn request_frame(&mut self) {
        self.requested = true;
    }
}

#[derive(Debug, Serialize)]
struct GroupExport {
    start: usize,
    count: usize,
    material_index: usize,
}

#[derive(Debug, Serialize)]
struct TextureExport {
    source: String,
    wrap_s: u32,
    wrap_t: u32,
    repeat: [f64; 2],
    offset: [f64; 2],
    flip_y: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum SideExport {
    Front,
    Back,
    Double,
}

#[derive(Debug, Serialize)]
struct MaterialExport {
    side: SideExport,
    roughness: f64,
    metalness: f64,
    alpha_test: bool,
    map: TextureExport,
}

#[derive(Debug, Serialize)]
struct LightExport {
    color: u32,
    intensity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<[f64; 3]>,
}

#[derive(Debug, Serialize)]
struct SceneExport {
    clear_color: u32,
    clear_alpha: f64,
    pixel_ratio: f64,
    antialias: bool,
    camera_position: [f64; 3],
    fov: f64,
    near: f64,
    far: f64,
    ambient: LightExport,
    directional: LightExport,
    materials: Vec<MaterialExport>,
}

impl SceneExport {
    fn new(
        settings: &RendererSettings,
        camera: &Camera,
        lights: &Lights,
        materials: &MaterialPair,
    ) -> Self {
        let materials = materials
            .iter()
            .map(|material| MaterialExport {
                side: match material.side {
                    scene::Side::Front => SideExport::Front,
                    scene::Side::Back => SideExport::Back,
                    scene::Side::Double => SideExport::Double,
                },
                roughness: material.roughness,
                metalness: material.metalness,
                alpha_test: material.alpha_test,
                map: TextureExport {
                    source: material.map.image.source.clone(),
                    wrap_s: material.map.wrap_s.gl_constant(),
                    wrap_t: material.map.wrap_t.gl_constant(),
                    repeat: material.map.repeat,
                    offset: material.map.offset,
                    flip_y: material.map.flip_y,
                },
            })
            .collect();

        Self {
            clear_color: settings.clear_color.0,
            clear_alpha: settings.clear_alpha,
            pixel_ratio: settings.pixel_ratio,
            antialias: settings.antialias,
            camera_position: camera.position.to_array(),
            fov: camera.fov,
            near: camera.near,
            far: camera.far,
            ambient: LightExport {
                color: lights.ambient.color.0,
                intensity: lights.ambient.intensity,
                position: None,
            },
            directional: LightExport {
                color: lights.directional.color.0,
                intensity: lights.directional.intensity,
                position: Some(lights.directional.position.to_array()),
            },
            materials,
        }
    }
}

/// Public entry point for JS hosts.
///
/// The host owns the animation loop: whenever [`RibbonEngine::frame`],
/// [`RibbonEngine::play`] or [`RibbonEngine::take_frame_request`] returns
/// `true` it should schedule one `requestAnimationFrame` that calls `frame`.
#[wasm_bindgen]
pub struct RibbonEngine {
    sketch: RibbonSketch<BufferRenderer, HostScheduler>,
}

#[wasm_bindgen]
impl RibbonEngine {
    /// Builds a ribbon from a plain options object (or `undefined` for the
    /// defaults) for a surface of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(
        options: JsValue,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
    ) -> Result<RibbonEngine, JsValue> {
        let options = if options.is_undefined() || options.is_null() {
            RibbonOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };
        Self::with_options(options, Viewport::new(width, height, device_pixel_ratio))
            .map_err(to_js_error)
    }

    /// Delivers one animation frame. Returns whether another frame is wanted.
    #[wasm_bindgen]
    pub fn frame(&mut self) -> bool {
        self.sketch.on_frame();
        self.sketch.scheduler_mut().take_request()
    }

    /// Collects a pending frame request, e.g. the one made at construction.
    #[wasm_bindgen]
    pub fn take_frame_request(&mut self) -> bool {
        self.sketch.scheduler_mut().take_request()
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.sketch.stop();
    }

    /// Resumes the animation. Returns whether the host must schedule a frame.
    #[wasm_bindgen]
    pub fn play(&mut self) -> bool {
        self.sketch.play();
        self.sketch.scheduler_mut().take_request()
    }

    #[wasm_bindgen]
    pub fn is_playing(&self) -> bool {
        self.sketch.is_playing()
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.sketch.resize(width, height);
    }

    #[wasm_bindgen]
    pub fn time(&self) -> f64 {
        self.sketch.time()
    }

    /// Current horizontal texture offsets `[front, back]`.
    #[wasm_bindgen]
    pub fn offsets(&self) -> Vec<f64> {
        self.sketch.materials().offsets().to_vec()
    }

    #[wasm_bindgen]
    pub fn positions(&self) -> Vec<f64> {
        self.sketch.renderer().positions().to_vec()
    }

    #[wasm_bindgen]
    pub fn uvs(&self) -> Vec<f64> {
        self.sketch.renderer().uvs().to_vec()
    }

    #[wasm_bindgen]
    pub fn indices(&self) -> Vec<u32> {
        self.sketch.renderer().indices().to_vec()
    }

    #[wasm_bindgen]
    pub fn curve_line(&self) -> Vec<f64> {
        self.sketch.renderer().curve_line().to_vec()
    }

    #[wasm_bindgen]
    pub fn vertex_count(&self) -> usize {
        self.sketch.mesh().vertex_count()
    }

    /// Column-major camera projection matrix.
    #[wasm_bindgen]
    pub fn projection_matrix(&self) -> Vec<f64> {
        self.sketch.camera().projection_matrix().to_vec()
    }

    #[wasm_bindgen]
    pub fn diagnostics(&self) -> String {
        self.sketch.diagnostics().to_string()
    }

    /// Material groups as `{ start, count, material_index }` objects.
    #[wasm_bindgen]
    pub fn groups(&self) -> Result<JsValue, JsValue> {
        let groups: Vec<GroupExport> = self
            .sketch
            .renderer()
            .groups()
            .iter()
            .map(|g| GroupExport {
                start: g.start,
                count: g.count,
                material_index: g.material_index,
            })
            .collect();
        serde_wasm_bindgen::to_value(&groups).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Renderer settings, camera, lights and material state for scene setup.
    #[wasm_bindgen]
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        let export = SceneExport::new(
            self.sketch.settings(),
            self.sketch.camera(),
            self.sketch.lights(),
            self.sketch.materials(),
        );
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl RibbonEngine {
    /// Native constructor used by tests and tools.
    pub fn with_options(options: RibbonOptions, viewport: Viewport) -> Result<Self, SketchError> {
        let textures = NamedTextures::default();
        let renderer = BufferRenderer::default();
        let scheduler = HostScheduler::default();
        let sketch = match options.seed {
            Some(seed) => RibbonSketch::new(
                options,
                &mut StdRng::seed_from_u64(seed),
                &textures,
                renderer,
                scheduler,
                viewport,
            )?,
            None => RibbonSketch::new(
                options,
                &mut rand::rng(),
                &textures,
                renderer,
                scheduler,
                viewport,
            )?,
        };
        Ok(Self { sketch })
    }

    #[must_use]
    pub fn sketch(&self) -> &RibbonSketch<BufferRenderer, HostScheduler> {
        &self.sketch
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
