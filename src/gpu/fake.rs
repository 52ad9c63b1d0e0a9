//! In-memory recording device for tests
//!
//! "Compiles" GLSL by checking brace balance, "links" when every attached
//! stage has a `main`, and builds the active uniform table by scanning
//! `uniform <type> <name>[N] = <init>;` declarations. Uniform registers,
//! bound state and every render call are recorded for assertions.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{
    ActiveUniform, DeviceError, ImageData, ProgramId, ShaderDevice, ShaderId, ShaderStage, TextureId, TextureTarget,
    UniformData, UniformLocation,
};
use crate::effects::ParameterKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<ProgramId>),
    SetUniform { name: String, data: UniformData },
    EnableDepthAndCulling,
    BindTexture {
        unit: u32,
        target: TextureTarget,
        texture: Option<TextureId>,
    },
}

#[derive(Debug, Clone)]
struct Decl {
    name: String,
    kind: Option<ParameterKind>,
    /// Array length, `None` for plain uniforms
    array: Option<usize>,
    init: Vec<f32>,
}

struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    decls: Vec<Decl>,
    uses_builtin_matrix: bool,
}

#[derive(Default)]
struct FakeState {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    locations: HashMap<u32, (u32, String)>,
    location_ids: HashMap<(u32, String), u32>,
    registers: HashMap<(u32, String), Vec<f32>>,
    textures: HashSet<u32>,
    bound_program: Option<ProgramId>,
    calls: Vec<Call>,
}

impl FakeState {
    fn allocate_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FakeDevice {
    vendor: String,
    version: (u32, u32),
    extensions: Vec<String>,
    max_units: u32,
    state: RefCell<FakeState>,
}

fn glsl_kind(type_name: &str) -> Option<ParameterKind> {
    let kind = match type_name {
        "samplerCube" => ParameterKind::SamplerCube,
        "sampler2DRect" => ParameterKind::SamplerRect,
        "sampler2DRectShadow" => ParameterKind::SamplerRectShadow,
        "samplerCUBE" | "samplerRECT" | "samplerRECTShadow" => return None,
        other => return ParameterKind::from_type_name(other),
    };
    Some(kind)
}

fn parse_init(init: &str) -> Vec<f32> {
    let inner = match (init.find('('), init.rfind(')')) {
        (Some(open), Some(close)) if open < close => &init[open + 1..close],
        _ => init,
    };
    inner
        .split(',')
        .filter_map(|token| match token.trim() {
            "true" => Some(1.0),
            "false" => Some(0.0),
            number => number.parse().ok(),
        })
        .collect()
}

fn parse_decls(source: &str) -> Vec<Decl> {
    let mut decls = Vec::new();
    for line in source.lines() {
        let line = line.split("//").next().unwrap_or("").trim();
        let Some(rest) = line.strip_prefix("uniform ") else {
            continue;
        };
        let statement = rest.split(';').next().unwrap_or("");
        let (decl, init) = match statement.split_once('=') {
            Some((decl, init)) => (decl, parse_init(init)),
            None => (statement, Vec::new()),
        };
        let mut tokens = decl
            .split_whitespace()
            .filter(|t| !matches!(*t, "lowp" | "mediump" | "highp"));
        let (Some(type_name), Some(name)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let (name, array) = match name.split_once('[') {
            Some((base, len)) => (base, len.trim_end_matches(']').parse().ok()),
            None => (name, None),
        };
        decls.push(Decl {
            name: name.to_string(),
            kind: glsl_kind(type_name),
            array,
            init,
        });
    }
    decls
}

fn flatten(data: &UniformData) -> Vec<f32> {
    match data {
        UniformData::Float(v) => v.clone(),
        UniformData::Int(v) => v.iter().map(|x| *x as f32).collect(),
        UniformData::Matrix { values, .. } => values.clone(),
    }
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            vendor: "Fake Vendor".to_string(),
            version: (2, 1),
            extensions: Vec::new(),
            max_units: 8,
            state: RefCell::new(FakeState::default()),
        }
    }

    pub fn with_vendor(mut self, vendor: &str) -> Self {
        self.vendor = vendor.to_string();
        self
    }

    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.version = (major, minor);
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_max_texture_units(mut self, units: u32) -> Self {
        self.max_units = units;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Every value pushed to the named uniform, oldest first
    pub fn pushed(&self, name: &str) -> Vec<UniformData> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::SetUniform { name: n, data } if n == name => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn bound_program(&self) -> Option<ProgramId> {
        self.state.borrow().bound_program
    }
}

impl ShaderDevice for FakeDevice {
    fn vendor(&self) -> String {
        self.vendor.clone()
    }

    fn version(&self) -> (u32, u32) {
        self.version
    }

    fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    fn max_texture_units(&self) -> u32 {
        self.max_units
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, DeviceError> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        Ok(ShaderId(id))
    }

    fn compile_shader(&self, shader: ShaderId, source: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(s) = state.shaders.get_mut(&shader.0) else {
            return false;
        };
        s.source = source.to_string();
        let open = source.matches('{').count();
        let close = source.matches('}').count();
        s.compiled = open == close;
        s.log = if s.compiled {
            String::new()
        } else {
            format!(
                "0({}) : error C0000: syntax error, unexpected end of file\n",
                source.lines().count().max(1)
            )
        };
        s.compiled
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        self.state.borrow_mut().shaders.remove(&shader.0);
    }

    fn create_program(&self) -> Result<ProgramId, DeviceError> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.programs.insert(id, FakeProgram::default());
        Ok(ProgramId(id))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.0) {
            p.attached.push(shader.0);
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.0) {
            p.attached.retain(|s| *s != shader.0);
        }
    }

    fn link_program(&self, program: ProgramId) -> bool {
        let mut state = self.state.borrow_mut();
        let FakeState { shaders, programs, registers, .. } = &mut *state;
        let Some(p) = programs.get_mut(&program.0) else {
            return false;
        };
        let mut log = String::new();
        let mut decls: Vec<Decl> = Vec::new();
        let mut builtin = false;
        for id in &p.attached {
            let Some(s) = shaders.get(id) else {
                log.push_str("error: attached shader was deleted\n");
                continue;
            };
            if !s.compiled {
                log.push_str("error: attached shader is not compiled\n");
            }
            if !s.source.contains("void main") {
                let stage = match s.stage {
                    ShaderStage::Vertex => "vertex",
                    ShaderStage::Fragment => "fragment",
                };
                log.push_str(&format!("error: {} shader lacks `main'\n", stage));
            }
            builtin |= s.source.contains("gl_ModelViewMatrix");
            for decl in parse_decls(&s.source) {
                if !decls.iter().any(|d| d.name == decl.name) {
                    decls.push(decl);
                }
            }
        }
        p.linked = log.is_empty();
        p.log = log;
        if p.linked {
            for decl in &decls {
                let n = decl.kind.map(|k| k.component_count()).unwrap_or(1);
                match decl.array {
                    Some(len) => {
                        for i in 0..len {
                            registers.insert((program.0, format!("{}[{}]", decl.name, i)), vec![0.0; n]);
                        }
                    }
                    None => {
                        let mut value = decl.init.clone();
                        value.resize(n, 0.0);
                        registers.insert((program.0, decl.name.clone()), value);
                    }
                }
            }
            p.decls = decls;
            p.uses_builtin_matrix = builtin;
        }
        p.linked
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program.0);
        state.locations.retain(|_, (owner, _)| *owner != program.0);
        state.location_ids.retain(|(owner, _), _| *owner != program.0);
        state.registers.retain(|(owner, _), _| *owner != program.0);
        if state.bound_program == Some(program) {
            state.bound_program = None;
        }
    }

    fn active_uniforms(&self, program: ProgramId) -> Vec<ActiveUniform> {
        let state = self.state.borrow();
        let Some(p) = state.programs.get(&program.0).filter(|p| p.linked) else {
            return Vec::new();
        };
        let mut uniforms: Vec<ActiveUniform> = p
            .decls
            .iter()
            .map(|d| match d.array {
                Some(len) => ActiveUniform {
                    name: format!("{}[0]", d.name),
                    kind: d.kind,
                    size: len,
                },
                None => ActiveUniform {
                    name: d.name.clone(),
                    kind: d.kind,
                    size: 1,
                },
            })
            .collect();
        if p.uses_builtin_matrix {
            uniforms.push(ActiveUniform {
                name: "gl_ModelViewMatrix".to_string(),
                kind: Some(ParameterKind::Mat4),
                size: 1,
            });
        }
        uniforms
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let mut state = self.state.borrow_mut();
        let (base, index) = match name.split_once('[') {
            Some((base, idx)) => (base, Some(idx.trim_end_matches(']').parse::<usize>().ok()?)),
            None => (name, None),
        };
        let decl = state.programs.get(&program.0)?.decls.iter().find(|d| d.name == base)?.clone();
        let canonical = match (decl.array, index) {
            (Some(len), idx) => {
                let idx = idx.unwrap_or(0);
                if idx >= len {
                    return None;
                }
                format!("{}[{}]", base, idx)
            }
            (None, None) => base.to_string(),
            (None, Some(_)) => return None,
        };
        let key = (program.0, canonical.clone());
        if let Some(id) = state.location_ids.get(&key) {
            return Some(UniformLocation(*id));
        }
        let id = state.allocate_id();
        state.location_ids.insert(key, id);
        state.locations.insert(id, (program.0, canonical));
        Some(UniformLocation(id))
    }

    fn read_uniform_f32(&self, program: ProgramId, location: UniformLocation, count: usize) -> Vec<f32> {
        let state = self.state.borrow();
        let mut values = state
            .locations
            .get(&location.0)
            .filter(|(owner, _)| *owner == program.0)
            .and_then(|(owner, name)| state.registers.get(&(*owner, name.clone())))
            .cloned()
            .unwrap_or_default();
        values.resize(count, 0.0);
        values
    }

    fn read_uniform_i32(&self, program: ProgramId, location: UniformLocation, count: usize) -> Vec<i32> {
        self.read_uniform_f32(program, location, count)
            .into_iter()
            .map(|v| v as i32)
            .collect()
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let mut state = self.state.borrow_mut();
        state.bound_program = program;
        state.calls.push(Call::UseProgram(program));
    }

    fn set_uniform(&self, location: UniformLocation, data: &UniformData) {
        let mut state = self.state.borrow_mut();
        let Some((owner, name)) = state.locations.get(&location.0).cloned() else {
            return;
        };
        if state.bound_program != Some(ProgramId(owner)) {
            return;
        }
        state.registers.insert((owner, name.clone()), flatten(data));
        state.calls.push(Call::SetUniform {
            name,
            data: data.clone(),
        });
    }

    fn enable_depth_and_culling(&self) {
        self.state.borrow_mut().calls.push(Call::EnableDepthAndCulling);
    }

    fn create_texture_2d(&self, _image: &ImageData) -> Result<TextureId, DeviceError> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.textures.insert(id);
        Ok(TextureId(id))
    }

    fn delete_texture(&self, texture: TextureId) {
        self.state.borrow_mut().textures.remove(&texture.0);
    }

    fn bind_texture(&self, unit: u32, target: TextureTarget, texture: Option<TextureId>) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::BindTexture { unit, target, texture });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decls() {
        let decls = parse_decls(
            "uniform float k = 0.5;\nuniform vec3 lights[4];\n// uniform int skipped;\nuniform highp sampler2D tex;\nuniform uint u;",
        );
        assert_eq!(decls.len(), 4);
        assert_eq!(decls[0].init, vec![0.5]);
        assert_eq!(decls[1].array, Some(4));
        assert_eq!(decls[2].kind, Some(ParameterKind::Sampler2D));
        assert_eq!(decls[3].kind, None);
    }

    #[test]
    fn test_fake_round_trip() {
        let device = FakeDevice::new();
        let vs = device.create_shader(ShaderStage::Vertex).unwrap();
        assert!(device.compile_shader(vs, "uniform vec2 v = vec2(1.0, 2.0);\nvoid main() {}"));
        let program = device.create_program().unwrap();
        device.attach_shader(program, vs);
        assert!(device.link_program(program));

        let loc = device.uniform_location(program, "v").unwrap();
        assert_eq!(device.read_uniform_f32(program, loc, 2), vec![1.0, 2.0]);
        assert_eq!(device.uniform_location(program, "v"), Some(loc));
        assert_eq!(device.uniform_location(program, "missing"), None);
    }
}
