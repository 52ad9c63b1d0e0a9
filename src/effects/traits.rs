//! Effect traits
//!
//! This module defines the two seams of the effect runtime:
//! - `Effect` - a compiled shader program with its parameters and render protocol
//! - `EffectFactory` - one per effect family; probes support and creates effects

use std::rc::Rc;

use super::{EditorKind, Parameter, ParameterValue};
use crate::diagnostics::MessageSink;
use crate::gpu::ShaderDevice;
use crate::textures::TextureCache;

/// A shader effect
///
/// Source text lives in numbered inputs. `build` turns the inputs into a
/// program and rediscovers the parameter list; the render protocol
/// (`begin` .. `end`) binds the program and pushes parameter values around
/// the host's draw call. While `is_valid()` is false every render call is a
/// no-op.
pub trait Effect {
    /// Name of the factory that created the effect
    fn factory_name(&self) -> &'static str;

    /// Number of source inputs
    fn input_count(&self) -> usize;

    /// Display name of an input (e.g. "Vertex Shader")
    fn input_name(&self, index: usize) -> &'static str;

    /// Source text of an input
    fn input(&self, index: usize) -> &str;

    /// Replace the source text of an input
    fn set_input(&mut self, index: usize, source: &str);

    /// Replace inputs and stored parameter values from serialized text
    fn load(&mut self, text: &str);

    /// Serialize inputs and parameter values
    fn save(&self) -> String;

    /// Compile, link and introspect
    ///
    /// Progress and compiler output go to `sink` when given. Returns whether
    /// the effect is valid afterwards.
    fn build(&mut self, sink: Option<&mut dyn MessageSink>) -> bool;

    fn is_valid(&self) -> bool;

    /// The effect consumes a running clock and should be redrawn continuously
    fn is_animated(&self) -> bool;

    fn technique_count(&self) -> usize {
        1
    }

    fn technique_name(&self, index: usize) -> &str {
        assert!(index < self.technique_count(), "technique index {} out of range", index);
        "Default"
    }

    fn current_technique(&self) -> usize {
        0
    }

    fn select_technique(&mut self, index: usize) {
        assert!(index < self.technique_count(), "technique index {} out of range", index);
    }

    fn pass_count(&self) -> usize {
        1
    }

    /// Bind the program and push every parameter
    fn begin(&mut self);

    fn begin_pass(&mut self, pass: usize);

    fn end_pass(&mut self);

    /// Re-bind the program after the host switched programs mid-frame
    fn begin_material_group(&mut self);

    /// Unbind the program
    fn end(&mut self);

    fn parameter_count(&self) -> usize;

    fn parameter(&self, index: usize) -> &Parameter;

    fn parameter_mut(&mut self, index: usize) -> &mut Parameter;

    /// Set a parameter value, returning false if the value does not fit its kind
    fn set_parameter_value(&mut self, index: usize, value: ParameterValue) -> bool {
        self.parameter_mut(index).set_value(value)
    }

    /// Editor the host should present for a parameter
    fn parameter_editor(&self, index: usize) -> EditorKind {
        self.parameter(index).editor_kind()
    }

    /// Index of the parameter with the given name
    fn find_parameter(&self, name: &str) -> Option<usize> {
        (0..self.parameter_count()).find(|i| self.parameter(*i).name() == name)
    }
}

/// Token classes used by syntax highlighters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    DataType,
    BuiltinVariable,
    BuiltinFunction,
    Number,
    Comment,
}

/// A highlighting rule: a regular expression source matching one token class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRule {
    pub class: TokenClass,
    pub pattern: String,
}

impl HighlightRule {
    pub fn new(class: TokenClass, pattern: impl Into<String>) -> Self {
        Self {
            class,
            pattern: pattern.into(),
        }
    }
}

/// Factory trait for an effect family
///
/// Factories are stateless and registered once at startup in an
/// [`EffectRegistry`](super::EffectRegistry).
pub trait EffectFactory: Send + Sync {
    /// Display name (e.g. "GLSL Shader")
    fn name(&self) -> &'static str;

    /// Plural display name for file dialogs
    fn name_plural(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Whether the device can run effects of this family; never panics
    fn is_supported(&self, device: &dyn ShaderDevice) -> bool;

    /// Create an effect holding the default sources
    ///
    /// # Panics
    ///
    /// Panics when the device does not support this family.
    fn create_effect(&self, device: Rc<dyn ShaderDevice>, textures: Rc<TextureCache>) -> Box<dyn Effect>;

    /// Syntax highlighting grammar for the source inputs
    fn highlighting_rules(&self) -> Vec<HighlightRule>;

    /// Multi-line comment delimiters, if the language has them
    fn multi_line_comment(&self) -> Option<(&'static str, &'static str)>;

    /// File dialog filter, e.g. "GLSL Shaders (*.glsl)"
    fn file_filter(&self) -> String {
        format!("{} (*.{})", self.name_plural(), self.extension())
    }
}
