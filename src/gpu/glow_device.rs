//! OpenGL device backed by `glow`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glow::HasContext;

use super::{
    ActiveUniform, DeviceError, ImageData, ProgramId, ShaderDevice, ShaderId, ShaderStage, TextureId, TextureTarget,
    UniformData, UniformLocation,
};
use crate::effects::ParameterKind;

fn gl_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture1D => glow::TEXTURE_1D,
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::Texture3D => glow::TEXTURE_3D,
        TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
        TextureTarget::Rectangle => glow::TEXTURE_RECTANGLE,
    }
}

/// Map a GL uniform type enum to a parameter kind
fn kind_from_gl(utype: u32) -> Option<ParameterKind> {
    let kind = match utype {
        glow::FLOAT => ParameterKind::Float,
        glow::FLOAT_VEC2 => ParameterKind::Vec2,
        glow::FLOAT_VEC3 => ParameterKind::Vec3,
        glow::FLOAT_VEC4 => ParameterKind::Vec4,
        glow::INT => ParameterKind::Int,
        glow::INT_VEC2 => ParameterKind::IVec2,
        glow::INT_VEC3 => ParameterKind::IVec3,
        glow::INT_VEC4 => ParameterKind::IVec4,
        glow::BOOL => ParameterKind::Bool,
        glow::BOOL_VEC2 => ParameterKind::BVec2,
        glow::BOOL_VEC3 => ParameterKind::BVec3,
        glow::BOOL_VEC4 => ParameterKind::BVec4,
        glow::FLOAT_MAT2 => ParameterKind::Mat2,
        glow::FLOAT_MAT3 => ParameterKind::Mat3,
        glow::FLOAT_MAT4 => ParameterKind::Mat4,
        glow::SAMPLER_1D => ParameterKind::Sampler1D,
        glow::SAMPLER_2D => ParameterKind::Sampler2D,
        glow::SAMPLER_3D => ParameterKind::Sampler3D,
        glow::SAMPLER_CUBE => ParameterKind::SamplerCube,
        glow::SAMPLER_2D_RECT => ParameterKind::SamplerRect,
        glow::SAMPLER_1D_SHADOW => ParameterKind::Sampler1DShadow,
        glow::SAMPLER_2D_SHADOW => ParameterKind::Sampler2DShadow,
        glow::SAMPLER_2D_RECT_SHADOW => ParameterKind::SamplerRectShadow,
        _ => return None,
    };
    Some(kind)
}

/// [`ShaderDevice`] over a current OpenGL context
pub struct GlowDevice {
    gl: Rc<glow::Context>,
    next_id: Cell<u32>,
    shaders: RefCell<HashMap<u32, glow::Shader>>,
    programs: RefCell<HashMap<u32, glow::Program>>,
    /// Location id -> (owning program id, GL location)
    locations: RefCell<HashMap<u32, (u32, glow::UniformLocation)>>,
    textures: RefCell<HashMap<u32, glow::Texture>>,
}

impl GlowDevice {
    /// Wrap a GL context
    ///
    /// # Safety
    ///
    /// The context must be current on the calling thread for as long as the
    /// device (or anything holding it) is used.
    pub unsafe fn new(gl: Rc<glow::Context>) -> Self {
        Self {
            gl,
            next_id: Cell::new(1),
            shaders: RefCell::new(HashMap::new()),
            programs: RefCell::new(HashMap::new()),
            locations: RefCell::new(HashMap::new()),
            textures: RefCell::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn shader(&self, id: ShaderId) -> Option<glow::Shader> {
        self.shaders.borrow().get(&id.0).copied()
    }

    fn program(&self, id: ProgramId) -> Option<glow::Program> {
        self.programs.borrow().get(&id.0).copied()
    }

    fn location(&self, id: UniformLocation) -> Option<glow::UniformLocation> {
        self.locations.borrow().get(&id.0).map(|(_, loc)| loc.clone())
    }
}

impl ShaderDevice for GlowDevice {
    fn vendor(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VENDOR) }
    }

    fn version(&self) -> (u32, u32) {
        let version = self.gl.version();
        (version.major, version.minor)
    }

    fn has_extension(&self, name: &str) -> bool {
        self.gl.supported_extensions().contains(name)
    }

    fn max_texture_units(&self) -> u32 {
        let units = unsafe { self.gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS) };
        if units > 0 {
            units as u32
        } else {
            8
        }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, DeviceError> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        let shader = unsafe { self.gl.create_shader(shader_type) }.map_err(|e| DeviceError::Create("shader", e))?;
        let id = self.allocate_id();
        self.shaders.borrow_mut().insert(id, shader);
        Ok(ShaderId(id))
    }

    fn compile_shader(&self, shader: ShaderId, source: &str) -> bool {
        let Some(handle) = self.shader(shader) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(handle, source);
            self.gl.compile_shader(handle);
            self.gl.get_shader_compile_status(handle)
        }
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.shader(shader)
            .map(|handle| unsafe { self.gl.get_shader_info_log(handle) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        if let Some(handle) = self.shaders.borrow_mut().remove(&shader.0) {
            unsafe { self.gl.delete_shader(handle) };
        }
    }

    fn create_program(&self) -> Result<ProgramId, DeviceError> {
        let program = unsafe { self.gl.create_program() }.map_err(|e| DeviceError::Create("program", e))?;
        let id = self.allocate_id();
        self.programs.borrow_mut().insert(id, program);
        Ok(ProgramId(id))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let (Some(p), Some(s)) = (self.program(program), self.shader(shader)) {
            unsafe { self.gl.attach_shader(p, s) };
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let (Some(p), Some(s)) = (self.program(program), self.shader(shader)) {
            unsafe { self.gl.detach_shader(p, s) };
        }
    }

    fn link_program(&self, program: ProgramId) -> bool {
        let Some(handle) = self.program(program) else {
            return false;
        };
        unsafe {
            self.gl.link_program(handle);
            self.gl.get_program_link_status(handle)
        }
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.program(program)
            .map(|handle| unsafe { self.gl.get_program_info_log(handle) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        if let Some(handle) = self.programs.borrow_mut().remove(&program.0) {
            unsafe { self.gl.delete_program(handle) };
        }
        self.locations.borrow_mut().retain(|_, (owner, _)| *owner != program.0);
    }

    fn active_uniforms(&self, program: ProgramId) -> Vec<ActiveUniform> {
        let Some(handle) = self.program(program) else {
            return Vec::new();
        };
        let count = unsafe { self.gl.get_active_uniforms(handle) };
        (0..count)
            .filter_map(|index| unsafe { self.gl.get_active_uniform(handle, index) })
            .map(|u| ActiveUniform {
                kind: kind_from_gl(u.utype),
                size: u.size.max(1) as usize,
                name: u.name,
            })
            .collect()
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let handle = self.program(program)?;
        let location = unsafe { self.gl.get_uniform_location(handle, name) }?;
        let id = self.allocate_id();
        self.locations.borrow_mut().insert(id, (program.0, location));
        Some(UniformLocation(id))
    }

    fn read_uniform_f32(&self, program: ProgramId, location: UniformLocation, count: usize) -> Vec<f32> {
        let mut values = vec![0.0; count];
        if let (Some(p), Some(loc)) = (self.program(program), self.location(location)) {
            unsafe { self.gl.get_uniform_f32(p, &loc, &mut values) };
        }
        values
    }

    fn read_uniform_i32(&self, program: ProgramId, location: UniformLocation, count: usize) -> Vec<i32> {
        let mut values = vec![0; count];
        if let (Some(p), Some(loc)) = (self.program(program), self.location(location)) {
            unsafe { self.gl.get_uniform_i32(p, &loc, &mut values) };
        }
        values
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let handle = program.and_then(|p| self.program(p));
        unsafe { self.gl.use_program(handle) };
    }

    fn set_uniform(&self, location: UniformLocation, data: &UniformData) {
        let Some(loc) = self.location(location) else {
            return;
        };
        let loc = Some(&loc);
        unsafe {
            match data {
                UniformData::Float(v) => match v.len() {
                    1 => self.gl.uniform_1_f32_slice(loc, v),
                    2 => self.gl.uniform_2_f32_slice(loc, v),
                    3 => self.gl.uniform_3_f32_slice(loc, v),
                    4 => self.gl.uniform_4_f32_slice(loc, v),
                    n => log::warn!("Cannot push {} float components", n),
                },
                UniformData::Int(v) => match v.len() {
                    1 => self.gl.uniform_1_i32_slice(loc, v),
                    2 => self.gl.uniform_2_i32_slice(loc, v),
                    3 => self.gl.uniform_3_i32_slice(loc, v),
                    4 => self.gl.uniform_4_i32_slice(loc, v),
                    n => log::warn!("Cannot push {} int components", n),
                },
                UniformData::Matrix { dim, values } => match dim {
                    2 => self.gl.uniform_matrix_2_f32_slice(loc, false, values),
                    3 => self.gl.uniform_matrix_3_f32_slice(loc, false, values),
                    4 => self.gl.uniform_matrix_4_f32_slice(loc, false, values),
                    n => log::warn!("Cannot push a {}x{} matrix", n, n),
                },
            }
        }
    }

    fn enable_depth_and_culling(&self) {
        unsafe {
            self.gl.enable(glow::CULL_FACE);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LEQUAL);
        }
    }

    fn create_texture_2d(&self, image: &ImageData) -> Result<TextureId, DeviceError> {
        let texture = unsafe { self.gl.create_texture() }.map_err(|e| DeviceError::Create("texture", e))?;
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                image.width as i32,
                image.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(&image.pixels),
            );
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
        let id = self.allocate_id();
        self.textures.borrow_mut().insert(id, texture);
        Ok(TextureId(id))
    }

    fn delete_texture(&self, texture: TextureId) {
        if let Some(handle) = self.textures.borrow_mut().remove(&texture.0) {
            unsafe { self.gl.delete_texture(handle) };
        }
    }

    fn bind_texture(&self, unit: u32, target: TextureTarget, texture: Option<TextureId>) {
        let handle = texture.and_then(|t| self.textures.borrow().get(&t.0).copied());
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(gl_target(target), handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_gl() {
        assert_eq!(kind_from_gl(glow::FLOAT_VEC3), Some(ParameterKind::Vec3));
        assert_eq!(kind_from_gl(glow::FLOAT_MAT4), Some(ParameterKind::Mat4));
        assert_eq!(kind_from_gl(glow::SAMPLER_CUBE), Some(ParameterKind::SamplerCube));
        assert_eq!(kind_from_gl(glow::SAMPLER_2D_SHADOW), Some(ParameterKind::Sampler2DShadow));
        assert_eq!(kind_from_gl(glow::UNSIGNED_INT_VEC2), None);
    }

    #[test]
    fn test_sampler_targets() {
        let target_of = |kind| TextureTarget::for_kind(kind).map(gl_target);
        assert_eq!(target_of(ParameterKind::Sampler2D), Some(glow::TEXTURE_2D));
        assert_eq!(target_of(ParameterKind::SamplerCube), Some(glow::TEXTURE_CUBE_MAP));
        assert_eq!(target_of(ParameterKind::Sampler3D), Some(glow::TEXTURE_3D));
        assert_eq!(target_of(ParameterKind::Sampler1DShadow), Some(glow::TEXTURE_1D));
        assert_eq!(target_of(ParameterKind::SamplerRect), Some(glow::TEXTURE_RECTANGLE));
        assert_eq!(target_of(ParameterKind::Vec3), None);
    }
}
