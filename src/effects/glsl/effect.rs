//! GLSL effect runtime
//!
//! Owns the vertex/fragment sources and the compiled program, rediscovers the
//! parameter list after every successful link and pushes parameter values
//! during the render protocol.

use std::collections::HashMap;
use std::rc::Rc;

use super::codec;
use crate::diagnostics::{parser_for_vendor, LogSource, MessageSink, NullSink, OutputParser};
use crate::effects::{BaseType, Effect, EffectClock, Parameter, ParameterKind, ParameterValue};
use crate::gpu::{
    DeviceError, ProgramId, ShaderDevice, ShaderId, ShaderStage, TextureTarget, UniformData, UniformLocation,
};
use crate::shaders::{DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER};
use crate::textures::TextureCache;

/// Uniforms with this prefix belong to the fixed-function state
const BUILTIN_PREFIX: &str = "gl_";

/// Uniform fed from the effect clock
const TIME_UNIFORM: &str = "time";

const INPUT_NAMES: [&str; 2] = ["Vertex Shader", "Fragment Shader"];

/// Where an effect is in its build cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Never built since creation or the last load
    Empty,
    Compiling,
    Linked,
    Failed,
}

/// f32 register value in its shortest decimal form as f64
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

pub struct GlslEffect {
    device: Rc<dyn ShaderDevice>,
    textures: Rc<TextureCache>,
    factory_name: &'static str,
    sources: [String; 2],
    vertex_shader: Option<ShaderId>,
    fragment_shader: Option<ShaderId>,
    program: Option<ProgramId>,
    attached: bool,
    state: BuildState,
    /// Current parameters; kept while invalid so values survive a failed build
    parameters: Vec<Parameter>,
    time_uniform: Option<UniformLocation>,
    clock: EffectClock,
    parser: Box<dyn OutputParser>,
}

impl GlslEffect {
    pub fn new(device: Rc<dyn ShaderDevice>, textures: Rc<TextureCache>, factory_name: &'static str) -> Self {
        let parser = parser_for_vendor(&device.vendor());
        Self {
            device,
            textures,
            factory_name,
            sources: [DEFAULT_VERTEX_SHADER.to_string(), DEFAULT_FRAGMENT_SHADER.to_string()],
            vertex_shader: None,
            fragment_shader: None,
            program: None,
            attached: false,
            state: BuildState::Empty,
            parameters: Vec::new(),
            time_uniform: None,
            clock: EffectClock::new(),
            parser,
        }
    }

    pub fn build_state(&self) -> BuildState {
        self.state
    }

    /// Parameters held for the next build, including while the effect is invalid
    pub fn stored_parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn clock(&self) -> &EffectClock {
        &self.clock
    }

    /// Delete program and shader objects and forget every location
    fn release(&mut self) {
        if let Some(program) = self.program.take() {
            if self.attached {
                for shader in [self.vertex_shader, self.fragment_shader].into_iter().flatten() {
                    self.device.detach_shader(program, shader);
                }
            }
            self.device.delete_program(program);
        }
        for shader in [self.vertex_shader.take(), self.fragment_shader.take()].into_iter().flatten() {
            self.device.delete_shader(shader);
        }
        self.attached = false;
        self.time_uniform = None;
        for param in &mut self.parameters {
            param.location = None;
            param.texture_unit = None;
        }
    }

    /// Compile both stages and link; `Ok(false)` on compile or link errors
    fn compile_and_link(&mut self, sink: &mut dyn MessageSink) -> Result<bool, DeviceError> {
        let vertex = self.device.create_shader(ShaderStage::Vertex)?;
        self.vertex_shader = Some(vertex);
        let fragment = self.device.create_shader(ShaderStage::Fragment)?;
        self.fragment_shader = Some(fragment);
        let program = self.device.create_program()?;
        self.program = Some(program);

        sink.info("Compiling vertex shader...");
        let vertex_ok = self.device.compile_shader(vertex, &self.sources[0]);
        sink.log(
            &self.device.shader_info_log(vertex),
            LogSource::Input(0),
            Some(self.parser.as_ref()),
        );

        sink.info("Compiling fragment shader...");
        let fragment_ok = self.device.compile_shader(fragment, &self.sources[1]);
        sink.log(
            &self.device.shader_info_log(fragment),
            LogSource::Input(1),
            Some(self.parser.as_ref()),
        );

        if !vertex_ok || !fragment_ok {
            return Ok(false);
        }

        sink.info("Linking...");
        self.device.attach_shader(program, vertex);
        self.device.attach_shader(program, fragment);
        self.attached = true;
        let linked = self.device.link_program(program);
        sink.log(
            &self.device.program_info_log(program),
            LogSource::Link,
            Some(self.parser.as_ref()),
        );
        Ok(linked)
    }

    /// Parameter with the program's current register value
    fn fresh_parameter(&self, program: ProgramId, name: &str, kind: ParameterKind, location: UniformLocation) -> Parameter {
        let mut param = Parameter::new(name, kind);
        let n = kind.component_count();
        let value = match kind.base() {
            BaseType::Sampler => return param,
            BaseType::Float => {
                let v = self.device.read_uniform_f32(program, location, n);
                if kind.is_scalar() {
                    ParameterValue::Float(widen(v[0]))
                } else {
                    ParameterValue::FloatList(v.into_iter().map(widen).collect())
                }
            }
            BaseType::Int => {
                let v = self.device.read_uniform_i32(program, location, n);
                if kind.is_scalar() {
                    ParameterValue::Int(v[0])
                } else {
                    ParameterValue::IntList(v)
                }
            }
            BaseType::Bool => {
                let v = self.device.read_uniform_i32(program, location, n);
                if kind.is_scalar() {
                    ParameterValue::Bool(v[0] != 0)
                } else {
                    ParameterValue::BoolList(v.into_iter().map(|x| x != 0).collect())
                }
            }
        };
        if !param.set_value(value) {
            log::debug!("Could not seed parameter '{}' from the program", name);
        }
        param
    }

    /// Rebuild the parameter list from the linked program
    fn init_parameters(&mut self, program: ProgramId, sink: &mut dyn MessageSink) {
        let mut previous: HashMap<(String, ParameterKind), Parameter> = self
            .parameters
            .drain(..)
            .map(|p| ((p.name().to_string(), p.kind()), p))
            .collect();
        let mut parameters = Vec::new();

        for uniform in self.device.active_uniforms(program) {
            if uniform.name.starts_with(BUILTIN_PREFIX) {
                continue;
            }
            let base = uniform.name.strip_suffix("[0]").unwrap_or(&uniform.name);

            if base.eq_ignore_ascii_case(TIME_UNIFORM) {
                if uniform.kind == Some(ParameterKind::Float) {
                    self.time_uniform = self.device.uniform_location(program, base);
                } else {
                    log::warn!("Uniform '{}' is not a float and will not receive the clock", base);
                }
                continue;
            }

            let Some(kind) = uniform.kind else {
                log::debug!("Skipping uniform '{}' of unsupported type", uniform.name);
                continue;
            };

            let names: Vec<String> = if uniform.size > 1 {
                (0..uniform.size).map(|i| format!("{}[{}]", base, i)).collect()
            } else {
                vec![base.to_string()]
            };

            for name in names {
                let Some(location) = self.device.uniform_location(program, &name) else {
                    log::debug!("Uniform '{}' has no location", name);
                    continue;
                };
                let mut param = match previous.remove(&(name.clone(), kind)) {
                    Some(old) => old,
                    None => self.fresh_parameter(program, &name, kind, location),
                };
                param.location = Some(location);
                param.texture_unit = None;
                parameters.push(param);
            }
        }

        let max_units = self.device.max_texture_units();
        let mut unit = 0;
        for param in parameters.iter_mut().filter(|p| p.kind().is_texture()) {
            if unit < max_units {
                param.texture_unit = Some(unit);
                unit += 1;
                let has_file = matches!(param.value(), ParameterValue::Texture(tex) if !tex.is_empty());
                if has_file && param.kind() != ParameterKind::Sampler2D {
                    log::warn!(
                        "Only 2D images can be loaded, leaving {} '{}' unbound",
                        param.kind(),
                        param.name()
                    );
                }
            } else {
                sink.error(&format!("Texture unit limit hit, ignoring parameter '{}'", param.name()));
            }
        }

        if !previous.is_empty() {
            log::debug!("Dropped {} parameters no longer in the program", previous.len());
        }
        self.parameters = parameters;
    }

    fn push_parameter(&self, param: &Parameter) {
        let Some(location) = param.location else {
            return;
        };
        let kind = param.kind();
        if kind.is_sampler() {
            let (Some(unit), Some(target)) = (param.texture_unit, TextureTarget::for_kind(kind)) else {
                return;
            };
            let texture = match param.value() {
                ParameterValue::Texture(tex) if target == TextureTarget::Texture2D => self.textures.open(&tex.path),
                _ => None,
            };
            self.device.bind_texture(unit, target, texture.map(|t| t.id));
            self.device.set_uniform(location, &UniformData::Int(vec![unit as i32]));
            return;
        }

        let n = kind.component_count();
        let data = match (kind.matrix_dim(), kind.base()) {
            (Some(dim), _) => UniformData::Matrix {
                dim,
                values: param.value().to_f32_vec(),
            },
            (None, BaseType::Float) => {
                let mut values = param.value().to_f32_vec();
                values.truncate(n);
                UniformData::Float(values)
            }
            _ => UniformData::Int(param.value().to_i32_vec()),
        };
        self.device.set_uniform(location, &data);
    }
}

impl Effect for GlslEffect {
    fn factory_name(&self) -> &'static str {
        self.factory_name
    }

    fn input_count(&self) -> usize {
        INPUT_NAMES.len()
    }

    fn input_name(&self, index: usize) -> &'static str {
        assert!(index < INPUT_NAMES.len(), "input index {} out of range", index);
        INPUT_NAMES[index]
    }

    fn input(&self, index: usize) -> &str {
        assert!(index < self.sources.len(), "input index {} out of range", index);
        &self.sources[index]
    }

    fn set_input(&mut self, index: usize, source: &str) {
        assert!(index < self.sources.len(), "input index {} out of range", index);
        self.sources[index] = source.to_string();
    }

    fn load(&mut self, text: &str) {
        self.release();
        self.state = BuildState::Empty;
        let doc = codec::parse_document(text);
        self.sources = [doc.vertex, doc.fragment];
        self.parameters = doc.parameters;
        self.clock.restart();
    }

    fn save(&self) -> String {
        codec::write_document(&self.sources[0], &self.sources[1], &self.parameters)
    }

    fn build(&mut self, sink: Option<&mut dyn MessageSink>) -> bool {
        let mut silent = NullSink;
        let sink: &mut dyn MessageSink = match sink {
            Some(sink) => sink,
            None => &mut silent,
        };

        self.release();
        self.state = BuildState::Compiling;
        sink.clear();

        let linked = match self.compile_and_link(sink) {
            Ok(linked) => linked,
            Err(e) => {
                sink.error(&e.to_string());
                false
            }
        };

        match (linked, self.program) {
            (true, Some(program)) => {
                self.init_parameters(program, sink);
                self.state = BuildState::Linked;
                self.clock.restart();
                log::info!("Built effect with {} parameters", self.parameters.len());
                true
            }
            _ => {
                self.release();
                self.state = BuildState::Failed;
                log::info!("Effect build failed");
                false
            }
        }
    }

    fn is_valid(&self) -> bool {
        self.program.is_some() && self.state == BuildState::Linked
    }

    fn is_animated(&self) -> bool {
        self.time_uniform.is_some()
    }

    fn begin(&mut self) {
        let Some(program) = self.program.filter(|_| self.is_valid()) else {
            return;
        };
        self.device.enable_depth_and_culling();
        self.device.use_program(Some(program));
        for param in &self.parameters {
            self.push_parameter(param);
        }
        if let Some(location) = self.time_uniform {
            self.device
                .set_uniform(location, &UniformData::Float(vec![self.clock.seconds()]));
        }
    }

    fn begin_pass(&mut self, pass: usize) {
        debug_assert!(pass < self.pass_count(), "pass index {} out of range", pass);
    }

    fn end_pass(&mut self) {}

    fn begin_material_group(&mut self) {
        if let Some(program) = self.program.filter(|_| self.is_valid()) {
            self.device.use_program(Some(program));
        }
    }

    fn end(&mut self) {
        if self.is_valid() {
            self.device.use_program(None);
        }
    }

    fn parameter_count(&self) -> usize {
        if self.is_valid() {
            self.parameters.len()
        } else {
            0
        }
    }

    fn parameter(&self, index: usize) -> &Parameter {
        assert!(index < self.parameter_count(), "parameter index {} out of range", index);
        &self.parameters[index]
    }

    fn parameter_mut(&mut self, index: usize) -> &mut Parameter {
        assert!(index < self.parameter_count(), "parameter index {} out of range", index);
        &mut self.parameters[index]
    }
}

impl Drop for GlslEffect {
    fn drop(&mut self) {
        self.release();
    }
}
