//! Two-sided ribbon materials and their textures.
//!
//! The ribbon is drawn twice over the same index buffer. The "front" material
//! culls front faces and shows the front texture on the ribbon's back faces;
//! the "back" material does the opposite with a horizontally mirrored texture.
//! Texture offsets are the only state the animation touches.

/// Which side of the ribbon a texture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
}

impl Face {
    #[must_use]
    pub const fn default_source(self) -> &'static str {
        match self {
            Face::Front => "front.png",
            Face::Back => "back.png",
        }
    }
}

/// Triangle faces a material renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapping {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

impl Wrapping {
    /// WebGL wrap constant, matching the values hosts pass to three.js.
    #[must_use]
    pub const fn gl_constant(self) -> u32 {
        match self {
            Wrapping::Repeat => 1000,
            Wrapping::ClampToEdge => 1001,
            Wrapping::MirroredRepeat => 1002,
        }
    }
}

/// Image reference handed back by a [`TextureProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub source: String,
}

impl TextureImage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("no texture source configured for the {0:?} face")]
    MissingSource(Face),
    #[error("texture `{path}` could not be loaded: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Supplies the image for each ribbon face.
pub trait TextureProvider {
    fn load(&self, face: Face) -> Result<TextureImage, TextureError>;
}

/// Provider that resolves each face to a fixed image path.
///
/// The host decodes the images itself; the engine only carries the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTextures {
    pub front: String,
    pub back: String,
}

impl Default for NamedTextures {
    fn default() -> Self {
        Self {
            front: Face::Front.default_source().to_string(),
            back: Face::Back.default_source().to_string(),
        }
    }
}

impl TextureProvider for NamedTextures {
    fn load(&self, face: Face) -> Result<TextureImage, TextureError> {
        let source = match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
        };
        if source.trim().is_empty() {
            return Err(TextureError::MissingSource(face));
        }
        Ok(TextureImage::new(source.clone()))
    }
}

/// A texture handle with sampling settings and a mutable offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub image: TextureImage,
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
    pub repeat: [f64; 2],
    pub offset: [f64; 2],
    pub flip_y: bool,
}

impl Texture {
    /// Ribbon texture for `face`: repeating, unflipped, shifted by
    /// `offset_bias` along u. The back face is mirrored horizontally.
    #[must_use]
    pub fn for_face(face: Face, image: TextureImage, offset_bias: f64) -> Self {
        let repeat = match face {
            Face::Front => [1.0, 1.0],
            Face::Back => [-1.0, 1.0],
        };
        Self {
            image,
            wrap_s: Wrapping::Repeat,
            wrap_t: Wrapping::Repeat,
            repeat,
            offset: [offset_bias, 0.0],
            flip_y: false,
        }
    }

    #[must_use]
    pub fn offset_x(&self) -> f64 {
        self.offset[0]
    }

    pub fn set_offset_x(&mut self, x: f64) {
        self.offset[0] = x;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub side: Side,
    pub roughness: f64,
    pub metalness: f64,
    pub alpha_test: bool,
    pub map: Texture,
}

impl Material {
    pub const ROUGHNESS: f64 = 0.65;
    pub const METALNESS: f64 = 0.25;

    #[must_use]
    pub fn standard(side: Side, map: Texture) -> Self {
        Self {
            side,
            roughness: Self::ROUGHNESS,
            metalness: Self::METALNESS,
            alpha_test: true,
            map,
        }
    }
}

/// Materials for both ribbon faces, indexed by material group.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPair {
    pub front: Material,
    pub back: Material,
}

impl MaterialPair {
    /// Loads both textures, failing before anything is built if either is
    /// unavailable.
    pub fn load<P: TextureProvider + ?Sized>(
        provider: &P,
        offset_bias: f64,
    ) -> Result<Self, TextureError> {
        let front = provider.load(Face::Front)?;
        let back = provider.load(Face::Back)?;
        Ok(Self {
            front: Material::standard(
                Side::Back,
                Texture::for_face(Face::Front, front, offset_bias),
            ),
            back: Material::standard(
                Side::Front,
                Texture::for_face(Face::Back, back, offset_bias),
            ),
        })
    }

    #[must_use]
    pub fn get(&self, material_index: usize) -> Option<&Material> {
        match material_index {
            0 => Some(&self.front),
            1 => Some(&self.back),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        [&self.front, &self.back].into_iter()
    }

    /// Moves the textures in opposite directions: front to `+time`, back to
    /// `-time`.
    pub fn apply_time(&mut self, time: f64) {
        self.front.map.set_offset_x(time);
        self.back.map.set_offset_x(-time);
    }

    #[must_use]
    pub fn offsets(&self) -> [f64; 2] {
        [self.front.map.offset_x(), self.back.map.offset_x()]
    }
}
