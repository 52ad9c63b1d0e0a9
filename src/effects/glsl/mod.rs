//! GLSL effect family
//!
//! - `codec` - the tagged-section `.glsl` file format
//! - `effect` - compile/link/introspect state machine and render protocol
//! - `GlslEffectFactory` - capability probe and highlighting grammar

pub mod codec;
mod effect;

pub use effect::{BuildState, GlslEffect};

use std::rc::Rc;

use crate::effects::{Effect, EffectFactory, HighlightRule, TokenClass};
use crate::gpu::ShaderDevice;
use crate::textures::TextureCache;

/// Extensions required on contexts older than OpenGL 2.0
pub const REQUIRED_EXTENSIONS: [&str; 4] = [
    "GL_ARB_shader_objects",
    "GL_ARB_vertex_shader",
    "GL_ARB_fragment_shader",
    "GL_ARB_shading_language_100",
];

const KEYWORDS: &str = r"\b(if|else|for|while|do|struct|break|continue|discard|return|true|false)\b";

const DATA_TYPES: &str = concat!(
    r"\b(void|float|vec[2-4]|int|ivec[2-4]|bool|bvec[2-4]|mat[2-4]|sampler[1-3]D|",
    r"samplerCube|sampler2DRect|sampler[1-2]DShadow|sampler2DRectShadow|",
    r"uniform|attribute|varying|const|in|out|inout)\b"
);

const BUILTIN_VARIABLES: &str = concat!(
    r"\bgl_(Position|PointSize|ClipVertex|FragCoord|FrontFacing|FragColor|FragData|FragDepth|",
    r"Color|SecondaryColor|Normal|Vertex|MultiTexCoord[0-7]|FogCoord|FogColor|",
    r"Max(Lights|ClipPlanes|TextureUnits|TextureCoords|VertexAttribs|VertexUniformComponents|VaryingFloats|",
    r"VertexTextureImageUnits|CombinedTextureImageUnits|TextureImageUnits|FragmentUniformComponents|DrawBuffers)|",
    r"(ModelView|Projection|ModelViewProjection|Texture)Matrix(Inverse)?(Transpose)?|NormalMatrix|NormalScale|",
    r"DepthRange(Parameters)?|ClipPlane|Point(Parameters)?|(Front|Back)Material|MaterialParameters|",
    r"LightSource(Parameters)?|LightModel(Parameters|Products)?|(Front|Back)LightModelProduct|",
    r"(Front|Back)LightProduct|LightProducts|TextureEnvColor|(Eye|Object)Plane[STRQ]|Fog(Parameters)?|",
    r"(Front|Back)(Secondary)?Color|TexCoord|FogFragCoord)\b"
);

const BUILTIN_FUNCTIONS: &str = concat!(
    r"\b(radians|degrees|sin|cos|tan|asin|acos|atan|pow|exp|log|exp2|log2|sqrt|inversesqrt|",
    r"abs|sign|floor|ceil|fract|mod|min|max|clamp|mix|step|smoothstep|length|distance|dot|cross|",
    r"normalize|ftransform|faceforward|reflect|refract|matrixCompMult|lessThan|lessThanEqual|",
    r"greaterThan|greaterThanEqual|equal|notEqual|any|all|not|",
    r"texture(1D|2D|3D)(Proj)?(Lod)?|textureCube(Lod)?|shadow(1D|2D)(Proj)?(Lod)?|",
    r"dFdx|dFdy|fwidth|noise[1-4])\b"
);

const NUMBER: &str = r"\b[-+]?\d*\.?\d+([eE][-+]?\d+)?\b";

const LINE_COMMENT: &str = r"//.*$";

/// Factory for [`GlslEffect`]
pub struct GlslEffectFactory;

impl EffectFactory for GlslEffectFactory {
    fn name(&self) -> &'static str {
        "GLSL Shader"
    }

    fn name_plural(&self) -> &'static str {
        "GLSL Shaders"
    }

    fn extension(&self) -> &'static str {
        "glsl"
    }

    fn is_supported(&self, device: &dyn ShaderDevice) -> bool {
        device.version() >= (2, 0) || REQUIRED_EXTENSIONS.iter().all(|ext| device.has_extension(ext))
    }

    fn create_effect(&self, device: Rc<dyn ShaderDevice>, textures: Rc<TextureCache>) -> Box<dyn Effect> {
        assert!(
            self.is_supported(device.as_ref()),
            "{} effects are not supported by this device",
            self.name()
        );
        Box::new(GlslEffect::new(device, textures, self.name()))
    }

    fn highlighting_rules(&self) -> Vec<HighlightRule> {
        vec![
            HighlightRule::new(TokenClass::Keyword, KEYWORDS),
            HighlightRule::new(TokenClass::DataType, DATA_TYPES),
            HighlightRule::new(TokenClass::BuiltinVariable, BUILTIN_VARIABLES),
            HighlightRule::new(TokenClass::BuiltinFunction, BUILTIN_FUNCTIONS),
            HighlightRule::new(TokenClass::Number, NUMBER),
            HighlightRule::new(TokenClass::Comment, LINE_COMMENT),
        ]
    }

    fn multi_line_comment(&self) -> Option<(&'static str, &'static str)> {
        Some(("/*", "*/"))
    }
}
