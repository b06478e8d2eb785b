pub mod animation;
pub mod camera;
pub mod material;
pub mod options;
pub mod sketch;

pub use animation::{AnimationDriver, AnimationState, FrameScheduler, PlayState, TIME_STEP};
pub use camera::{
    AmbientLight, Camera, Color, DirectionalLight, Lights, RendererSettings, Viewport,
};
pub use material::{
    Face, Material, MaterialPair, NamedTextures, Side, Texture, TextureError, TextureImage,
    TextureProvider, Wrapping,
};
pub use options::RibbonOptions;
pub use sketch::{Renderer, RibbonSketch, SketchError};
