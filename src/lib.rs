//! Shader Workbench Library
//!
//! Runtime for editable GPU shader effects: compile and link GLSL programs,
//! discover their uniforms as typed parameters, keep edited values across
//! rebuilds, drive the per-frame render protocol and persist effects in a
//! tagged-section text format.

pub mod diagnostics;
pub mod effects;
pub mod gpu;
pub mod session;
pub mod settings;
pub mod shaders;
pub mod telemetry;
pub mod textures;

pub use diagnostics::{Diagnostic, LogSource, MessageLog, MessageSink, OutputParser, Severity};
pub use effects::glsl::{GlslEffect, GlslEffectFactory};
pub use effects::{Effect, EffectFactory, EffectRegistry, Parameter, ParameterKind, ParameterValue};
pub use gpu::{GlowDevice, ShaderDevice};
pub use session::{EditorSession, SessionError};
pub use settings::EditorPreferences;
pub use textures::TextureCache;
