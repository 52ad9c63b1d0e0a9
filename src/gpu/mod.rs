//! Graphics device abstraction
//!
//! Every graphics-API call the effect runtime makes goes through
//! [`ShaderDevice`]. The production implementation is [`GlowDevice`]; tests
//! use an in-memory recording device. Objects cross the seam as small id
//! newtypes so effects never hold API-specific handles.
//!
//! All methods take `&self`: a device is shared (`Rc`) between the effects and
//! the texture cache of one graphics context, and implementations keep their
//! bookkeeping behind interior mutability. Everything runs on the thread that
//! owns the context.

mod glow_device;
#[cfg(test)]
pub(crate) mod fake;

pub use glow_device::GlowDevice;

use thiserror::Error;

use crate::effects::ParameterKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Binding point a sampler reads its texture from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture1D,
    Texture2D,
    Texture3D,
    CubeMap,
    Rectangle,
}

impl TextureTarget {
    /// Target matching a sampler type, `None` for non-sampler types
    pub fn for_kind(kind: ParameterKind) -> Option<Self> {
        match kind {
            ParameterKind::Sampler1D | ParameterKind::Sampler1DShadow => Some(TextureTarget::Texture1D),
            ParameterKind::Sampler2D | ParameterKind::Sampler2DShadow => Some(TextureTarget::Texture2D),
            ParameterKind::Sampler3D => Some(TextureTarget::Texture3D),
            ParameterKind::SamplerCube => Some(TextureTarget::CubeMap),
            ParameterKind::SamplerRect | ParameterKind::SamplerRectShadow => Some(TextureTarget::Rectangle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// One entry of a linked program's active uniform table
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveUniform {
    /// Name as reported by the driver (arrays may carry a trailing `[0]`)
    pub name: String,
    /// `None` when the driver type has no parameter counterpart
    pub kind: Option<ParameterKind>,
    /// Array length, 1 for non-arrays
    pub size: usize,
}

/// Data pushed into a uniform slot
#[derive(Debug, Clone, PartialEq)]
pub enum UniformData {
    /// 1-4 float components (vec1..vec4)
    Float(Vec<f32>),
    /// 1-4 int components; also used for bools and sampler units
    Int(Vec<i32>),
    /// Square column-major matrix of the given dimension
    Matrix { dim: usize, values: Vec<f32> },
}

/// Decoded RGBA8 image ready for upload
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to create {0}: {1}")]
    Create(&'static str, String),
    #[error("unknown {0} handle {1}")]
    UnknownHandle(&'static str, u32),
}

/// Graphics API surface needed by the shader effect runtime
pub trait ShaderDevice {
    /// `GL_VENDOR` string, used to pick the diagnostics parser
    fn vendor(&self) -> String;

    /// (major, minor) of the context version
    fn version(&self) -> (u32, u32);

    fn has_extension(&self, name: &str) -> bool;

    /// Number of texture units a program may sample from
    fn max_texture_units(&self) -> u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, DeviceError>;

    /// Upload source and compile; returns the compile status
    fn compile_shader(&self, shader: ShaderId, source: &str) -> bool;

    fn shader_info_log(&self, shader: ShaderId) -> String;

    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> Result<ProgramId, DeviceError>;

    fn attach_shader(&self, program: ProgramId, shader: ShaderId);

    fn detach_shader(&self, program: ProgramId, shader: ShaderId);

    /// Link attached shaders; returns the link status
    fn link_program(&self, program: ProgramId) -> bool;

    fn program_info_log(&self, program: ProgramId) -> String;

    fn delete_program(&self, program: ProgramId);

    fn active_uniforms(&self, program: ProgramId) -> Vec<ActiveUniform>;

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Read back `count` float components of a uniform
    fn read_uniform_f32(&self, program: ProgramId, location: UniformLocation, count: usize) -> Vec<f32>;

    /// Read back `count` int components of a uniform
    fn read_uniform_i32(&self, program: ProgramId, location: UniformLocation, count: usize) -> Vec<i32>;

    /// Bind a program for rendering, or unbind with `None`
    fn use_program(&self, program: Option<ProgramId>);

    /// Push data into a uniform of the currently bound program
    fn set_uniform(&self, location: UniformLocation, data: &UniformData);

    /// Back-face culling plus `LEQUAL` depth testing
    fn enable_depth_and_culling(&self);

    fn create_texture_2d(&self, image: &ImageData) -> Result<TextureId, DeviceError>;

    fn delete_texture(&self, texture: TextureId);

    /// Bind a texture (or nothing) to `target` on a texture unit
    fn bind_texture(&self, unit: u32, target: TextureTarget, texture: Option<TextureId>);
}
