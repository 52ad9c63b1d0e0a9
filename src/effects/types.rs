//! Core parameter data types
//!
//! A [`Parameter`] is a named, typed uniform value discovered by introspecting
//! a linked program (or parsed back from an effect file). The value model is
//! kept separate from GPU handles: the only runtime state a parameter carries
//! is the location and texture unit assigned during the last successful build.

use std::fmt;

use crate::gpu::UniformLocation;

/// Scalar base of a uniform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Float,
    Int,
    Bool,
    Sampler,
}

/// Every uniform type the GLSL runtime knows how to expose as a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    Bool,
    BVec2,
    BVec3,
    BVec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    SamplerRect,
    Sampler1DShadow,
    Sampler2DShadow,
    SamplerRectShadow,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 23] = [
        ParameterKind::Float,
        ParameterKind::Vec2,
        ParameterKind::Vec3,
        ParameterKind::Vec4,
        ParameterKind::Int,
        ParameterKind::IVec2,
        ParameterKind::IVec3,
        ParameterKind::IVec4,
        ParameterKind::Bool,
        ParameterKind::BVec2,
        ParameterKind::BVec3,
        ParameterKind::BVec4,
        ParameterKind::Mat2,
        ParameterKind::Mat3,
        ParameterKind::Mat4,
        ParameterKind::Sampler1D,
        ParameterKind::Sampler2D,
        ParameterKind::Sampler3D,
        ParameterKind::SamplerCube,
        ParameterKind::SamplerRect,
        ParameterKind::Sampler1DShadow,
        ParameterKind::Sampler2DShadow,
        ParameterKind::SamplerRectShadow,
    ];

    /// Type name as written in effect files
    pub fn type_name(self) -> &'static str {
        match self {
            ParameterKind::Float => "float",
            ParameterKind::Vec2 => "vec2",
            ParameterKind::Vec3 => "vec3",
            ParameterKind::Vec4 => "vec4",
            ParameterKind::Int => "int",
            ParameterKind::IVec2 => "ivec2",
            ParameterKind::IVec3 => "ivec3",
            ParameterKind::IVec4 => "ivec4",
            ParameterKind::Bool => "bool",
            ParameterKind::BVec2 => "bvec2",
            ParameterKind::BVec3 => "bvec3",
            ParameterKind::BVec4 => "bvec4",
            ParameterKind::Mat2 => "mat2",
            ParameterKind::Mat3 => "mat3",
            ParameterKind::Mat4 => "mat4",
            ParameterKind::Sampler1D => "sampler1D",
            ParameterKind::Sampler2D => "sampler2D",
            ParameterKind::Sampler3D => "sampler3D",
            ParameterKind::SamplerCube => "samplerCUBE",
            ParameterKind::SamplerRect => "samplerRECT",
            ParameterKind::Sampler1DShadow => "sampler1DShadow",
            ParameterKind::Sampler2DShadow => "sampler2DShadow",
            ParameterKind::SamplerRectShadow => "samplerRECTShadow",
        }
    }

    /// Inverse of [`type_name`](Self::type_name)
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.type_name() == name)
    }

    pub fn base(self) -> BaseType {
        match self {
            ParameterKind::Float
            | ParameterKind::Vec2
            | ParameterKind::Vec3
            | ParameterKind::Vec4
            | ParameterKind::Mat2
            | ParameterKind::Mat3
            | ParameterKind::Mat4 => BaseType::Float,
            ParameterKind::Int | ParameterKind::IVec2 | ParameterKind::IVec3 | ParameterKind::IVec4 => {
                BaseType::Int
            }
            ParameterKind::Bool | ParameterKind::BVec2 | ParameterKind::BVec3 | ParameterKind::BVec4 => {
                BaseType::Bool
            }
            _ => BaseType::Sampler,
        }
    }

    /// Number of scalar components (rows * cols for matrices, 1 for samplers)
    pub fn component_count(self) -> usize {
        match self {
            ParameterKind::Vec2 | ParameterKind::IVec2 | ParameterKind::BVec2 => 2,
            ParameterKind::Vec3 | ParameterKind::IVec3 | ParameterKind::BVec3 => 3,
            ParameterKind::Vec4 | ParameterKind::IVec4 | ParameterKind::BVec4 | ParameterKind::Mat2 => 4,
            ParameterKind::Mat3 => 9,
            ParameterKind::Mat4 => 16,
            _ => 1,
        }
    }

    /// Column count of a square matrix type
    pub fn matrix_dim(self) -> Option<usize> {
        match self {
            ParameterKind::Mat2 => Some(2),
            ParameterKind::Mat3 => Some(3),
            ParameterKind::Mat4 => Some(4),
            _ => None,
        }
    }

    pub fn is_matrix(self) -> bool {
        self.matrix_dim().is_some()
    }

    pub fn is_sampler(self) -> bool {
        self.base() == BaseType::Sampler
    }

    pub fn is_shadow_sampler(self) -> bool {
        matches!(
            self,
            ParameterKind::Sampler1DShadow | ParameterKind::Sampler2DShadow | ParameterKind::SamplerRectShadow
        )
    }

    /// Samplers that take a user texture and a texture unit
    pub fn is_texture(self) -> bool {
        self.is_sampler() && !self.is_shadow_sampler()
    }

    /// Single-component non-sampler type
    pub fn is_scalar(self) -> bool {
        !self.is_sampler() && self.component_count() == 1
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Opaque reference to an image resource, resolved through the texture cache
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct TextureRef {
    pub path: String,
}

impl TextureRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Float(f64),
    Int(i32),
    Bool(bool),
    FloatList(Vec<f64>),
    IntList(Vec<i32>),
    BoolList(Vec<bool>),
    /// RGBA color (0.0-1.0 per channel). Three-component colors keep alpha at 1.0.
    Color([f64; 4]),
    Texture(TextureRef),
}

impl ParameterValue {
    /// The zero value for a kind
    pub fn default_for(kind: ParameterKind, color: bool) -> Self {
        let n = kind.component_count();
        match kind.base() {
            BaseType::Sampler => ParameterValue::Texture(TextureRef::default()),
            BaseType::Float if color => ParameterValue::Color([0.0, 0.0, 0.0, 1.0]),
            BaseType::Float if kind.is_scalar() => ParameterValue::Float(0.0),
            BaseType::Float => ParameterValue::FloatList(vec![0.0; n]),
            BaseType::Int if kind.is_scalar() => ParameterValue::Int(0),
            BaseType::Int => ParameterValue::IntList(vec![0; n]),
            BaseType::Bool if kind.is_scalar() => ParameterValue::Bool(false),
            BaseType::Bool => ParameterValue::BoolList(vec![false; n]),
        }
    }

    /// Get the value as f32 (returns 0.0 for non-scalar types)
    pub fn as_f32(&self) -> f32 {
        match self {
            ParameterValue::Float(v) => *v as f32,
            ParameterValue::Int(v) => *v as f32,
            ParameterValue::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    /// Get the value as i32 (returns 0 for non-scalar types)
    pub fn as_i32(&self) -> i32 {
        match self {
            ParameterValue::Int(v) => *v,
            ParameterValue::Float(v) => *v as i32,
            ParameterValue::Bool(v) => i32::from(*v),
            _ => 0,
        }
    }

    /// Get the value as bool (returns false for non-scalar types)
    pub fn as_bool(&self) -> bool {
        match self {
            ParameterValue::Bool(v) => *v,
            ParameterValue::Float(v) => *v != 0.0,
            ParameterValue::Int(v) => *v != 0,
            _ => false,
        }
    }

    /// Flatten the value into f32 components, the way it is pushed to float uniforms
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            ParameterValue::FloatList(v) => v.iter().map(|x| *x as f32).collect(),
            ParameterValue::IntList(v) => v.iter().map(|x| *x as f32).collect(),
            ParameterValue::BoolList(v) => v.iter().map(|x| if *x { 1.0 } else { 0.0 }).collect(),
            ParameterValue::Color(c) => c.iter().map(|x| *x as f32).collect(),
            ParameterValue::Texture(_) => Vec::new(),
            scalar => vec![scalar.as_f32()],
        }
    }

    /// Flatten the value into i32 components (bools become 0/1)
    pub fn to_i32_vec(&self) -> Vec<i32> {
        match self {
            ParameterValue::IntList(v) => v.clone(),
            ParameterValue::BoolList(v) => v.iter().map(|x| i32::from(*x)).collect(),
            ParameterValue::FloatList(v) => v.iter().map(|x| *x as i32).collect(),
            ParameterValue::Color(c) => c.iter().map(|x| *x as i32).collect(),
            ParameterValue::Texture(_) => Vec::new(),
            scalar => vec![scalar.as_i32()],
        }
    }
}

/// How a property editor should present a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Scalar,
    Vector,
    Color,
    Matrix,
    File,
    /// Not editable (shadow samplers)
    None,
}

fn is_color_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("color") || lower.contains("colour")
}

/// A named, typed effect parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    description: String,
    kind: ParameterKind,
    value: ParameterValue,
    range: Option<(f64, f64)>,
    color: bool,
    /// Uniform location from the last successful build
    pub(crate) location: Option<UniformLocation>,
    /// Texture unit from the last successful build
    pub(crate) texture_unit: Option<u32>,
}

impl Parameter {
    /// Create a parameter holding the zero value of its kind
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        let name = name.into();
        let color = kind.base() == BaseType::Float
            && !kind.is_matrix()
            && matches!(kind.component_count(), 3 | 4)
            && is_color_name(&name);
        Self {
            value: ParameterValue::default_for(kind, color),
            name,
            description: String::new(),
            kind,
            range: None,
            color,
            location: None,
            texture_unit: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    /// Carry-over identity: two parameters match when name and kind agree
    pub fn same_slot(&self, other: &Parameter) -> bool {
        self.name == other.name && self.kind == other.kind
    }

    /// Replace the value
    ///
    /// Returns false (and leaves the parameter untouched) when the value's
    /// shape does not fit the parameter's kind. Colors are accepted for float
    /// vec3/vec4 parameters and lists for color parameters.
    pub fn set_value(&mut self, value: ParameterValue) -> bool {
        let n = self.kind.component_count();
        let normalized = match (self.kind.base(), value) {
            (BaseType::Sampler, v @ ParameterValue::Texture(_)) => v,
            (BaseType::Float, ParameterValue::Float(v)) if self.kind.is_scalar() => ParameterValue::Float(v),
            (BaseType::Float, ParameterValue::FloatList(v)) if v.len() == n && !self.kind.is_scalar() => {
                if self.color {
                    let mut c = [0.0, 0.0, 0.0, 1.0];
                    for (slot, x) in c.iter_mut().zip(v.iter()) {
                        *slot = *x;
                    }
                    ParameterValue::Color(c)
                } else {
                    ParameterValue::FloatList(v)
                }
            }
            (BaseType::Float, ParameterValue::Color(c)) if !self.kind.is_matrix() && matches!(n, 3 | 4) => {
                if self.color {
                    let mut c = c;
                    if n == 3 {
                        c[3] = 1.0;
                    }
                    ParameterValue::Color(c)
                } else {
                    ParameterValue::FloatList(c[..n].to_vec())
                }
            }
            (BaseType::Int, ParameterValue::Int(v)) if self.kind.is_scalar() => ParameterValue::Int(v),
            (BaseType::Int, ParameterValue::IntList(v)) if v.len() == n && n > 1 => ParameterValue::IntList(v),
            (BaseType::Bool, ParameterValue::Bool(v)) if self.kind.is_scalar() => ParameterValue::Bool(v),
            (BaseType::Bool, ParameterValue::BoolList(v)) if v.len() == n && n > 1 => ParameterValue::BoolList(v),
            _ => return false,
        };
        self.value = normalized;
        true
    }

    pub fn has_range(&self) -> bool {
        self.range.is_some()
    }

    pub fn set_range(&mut self, min: f64, max: f64) {
        self.range = Some((min.min(max), min.max(max)));
    }

    pub fn clear_range(&mut self) {
        self.range = None;
    }

    pub fn min_value(&self) -> Option<f64> {
        self.range.map(|(min, _)| min)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.range.map(|(_, max)| max)
    }

    pub fn component_count(&self) -> usize {
        self.kind.component_count()
    }

    /// Components can be edited one by one (vectors, colors, matrices)
    pub fn components_are_editable(&self) -> bool {
        !self.kind.is_sampler() && self.component_count() > 1
    }

    pub fn component_name(&self, index: usize) -> String {
        assert!(index < self.component_count(), "component index {} out of range", index);
        if let Some(dim) = self.kind.matrix_dim() {
            return format!("[{}, {}]", index / dim, index % dim);
        }
        let names = if self.color { ['r', 'g', 'b', 'a'] } else { ['x', 'y', 'z', 'w'] };
        names[index].to_string()
    }

    pub fn component_value(&self, index: usize) -> f64 {
        assert!(index < self.component_count(), "component index {} out of range", index);
        match &self.value {
            ParameterValue::FloatList(v) => v[index],
            ParameterValue::IntList(v) => f64::from(v[index]),
            ParameterValue::BoolList(v) => f64::from(u8::from(v[index])),
            ParameterValue::Color(c) => c[index],
            ParameterValue::Float(v) => *v,
            ParameterValue::Int(v) => f64::from(*v),
            ParameterValue::Bool(v) => f64::from(u8::from(*v)),
            ParameterValue::Texture(_) => 0.0,
        }
    }

    pub fn set_component_value(&mut self, index: usize, value: f64) {
        assert!(index < self.component_count(), "component index {} out of range", index);
        match &mut self.value {
            ParameterValue::Float(v) => *v = value,
            ParameterValue::Int(v) => *v = value.round() as i32,
            ParameterValue::Bool(v) => *v = value != 0.0,
            ParameterValue::FloatList(v) => v[index] = value,
            ParameterValue::IntList(v) => v[index] = value.round() as i32,
            ParameterValue::BoolList(v) => v[index] = value != 0.0,
            ParameterValue::Color(c) => c[index] = value,
            ParameterValue::Texture(_) => {}
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editor_kind() != EditorKind::None
    }

    pub fn editor_kind(&self) -> EditorKind {
        if self.kind.is_shadow_sampler() {
            EditorKind::None
        } else if self.kind.is_texture() {
            EditorKind::File
        } else if self.kind.is_matrix() {
            EditorKind::Matrix
        } else if self.color {
            EditorKind::Color
        } else if self.kind.is_scalar() {
            EditorKind::Scalar
        } else {
            EditorKind::Vector
        }
    }

    /// Human readable value for property panels
    pub fn display_value(&self) -> String {
        match &self.value {
            ParameterValue::Float(v) => format_float(*v),
            ParameterValue::Int(v) => v.to_string(),
            ParameterValue::Bool(v) => v.to_string(),
            ParameterValue::Texture(t) if t.is_empty() => "<none>".to_string(),
            ParameterValue::Texture(t) => t.path.clone(),
            _ => {
                let parts: Vec<String> = (0..self.component_count())
                    .map(|i| self.component_display_value(i))
                    .collect();
                format!("({})", parts.join(", "))
            }
        }
    }

    /// Base type shared by every component
    pub fn component_type(&self) -> BaseType {
        self.kind.base()
    }

    /// Lower bound for component editors: the range if set, 0 for colors
    pub fn component_min_value(&self) -> Option<f64> {
        self.min_value().or(if self.color { Some(0.0) } else { None })
    }

    /// Upper bound for component editors: the range if set, 1 for colors
    pub fn component_max_value(&self) -> Option<f64> {
        self.max_value().or(if self.color { Some(1.0) } else { None })
    }

    pub fn component_display_value(&self, index: usize) -> String {
        let value = self.component_value(index);
        match self.component_type() {
            BaseType::Bool => (value != 0.0).to_string(),
            BaseType::Int => (value as i32).to_string(),
            BaseType::Float => format_float(value),
            BaseType::Sampler => self.display_value(),
        }
    }

    /// Uniform location assigned by the last build, if any
    pub fn location(&self) -> Option<UniformLocation> {
        self.location
    }

    /// Texture unit assigned by the last build, if any
    pub fn texture_unit(&self) -> Option<u32> {
        self.texture_unit
    }
}

/// Shortest decimal text that round-trips the value
pub(crate) fn format_float(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_roundtrip() {
        for kind in ParameterKind::ALL {
            assert_eq!(ParameterKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(ParameterKind::from_type_name("double"), None);
        assert_eq!(ParameterKind::SamplerCube.type_name(), "samplerCUBE");
    }

    #[test]
    fn test_component_counts() {
        assert_eq!(ParameterKind::Float.component_count(), 1);
        assert_eq!(ParameterKind::BVec3.component_count(), 3);
        assert_eq!(ParameterKind::Mat3.component_count(), 9);
        assert_eq!(ParameterKind::Sampler2D.component_count(), 1);
        assert!(ParameterKind::Sampler2D.is_texture());
        assert!(!ParameterKind::Sampler2DShadow.is_texture());
    }

    #[test]
    fn test_new_parameter_zero_values() {
        assert_eq!(Parameter::new("k", ParameterKind::Float).value(), &ParameterValue::Float(0.0));
        assert_eq!(
            Parameter::new("v", ParameterKind::IVec2).value(),
            &ParameterValue::IntList(vec![0, 0])
        );
        assert_eq!(
            Parameter::new("tex", ParameterKind::Sampler2D).value(),
            &ParameterValue::Texture(TextureRef::default())
        );
    }

    #[test]
    fn test_color_classification() {
        let diffuse = Parameter::new("diffuseColor", ParameterKind::Vec3);
        assert_eq!(diffuse.editor_kind(), EditorKind::Color);
        assert_eq!(diffuse.value(), &ParameterValue::Color([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(diffuse.component_name(0), "r");

        let offset = Parameter::new("offset", ParameterKind::Vec3);
        assert_eq!(offset.editor_kind(), EditorKind::Vector);
        assert_eq!(offset.component_name(2), "z");

        let scalar_color = Parameter::new("color", ParameterKind::Float);
        assert_eq!(scalar_color.editor_kind(), EditorKind::Scalar);
    }

    #[test]
    fn test_set_value_checks_shape() {
        let mut p = Parameter::new("v", ParameterKind::Vec2);
        assert!(p.set_value(ParameterValue::FloatList(vec![1.0, 2.0])));
        assert!(!p.set_value(ParameterValue::FloatList(vec![1.0, 2.0, 3.0])));
        assert!(!p.set_value(ParameterValue::Int(3)));
        assert_eq!(p.value(), &ParameterValue::FloatList(vec![1.0, 2.0]));

        let mut tex = Parameter::new("tex", ParameterKind::Sampler2D);
        assert!(tex.set_value(ParameterValue::Texture(TextureRef::new("a.png"))));
        assert!(!tex.set_value(ParameterValue::Float(1.0)));
    }

    #[test]
    fn test_color_value_conversions() {
        let mut tint = Parameter::new("tintColour", ParameterKind::Vec3);
        assert!(tint.set_value(ParameterValue::FloatList(vec![0.5, 0.25, 1.0])));
        assert_eq!(tint.value(), &ParameterValue::Color([0.5, 0.25, 1.0, 1.0]));

        let mut dir = Parameter::new("dir", ParameterKind::Vec4);
        assert!(dir.set_value(ParameterValue::Color([1.0, 0.0, 0.0, 0.5])));
        assert_eq!(dir.value(), &ParameterValue::FloatList(vec![1.0, 0.0, 0.0, 0.5]));
    }

    #[test]
    fn test_components() {
        let mut m = Parameter::new("m", ParameterKind::Mat2);
        assert_eq!(m.component_count(), 4);
        assert_eq!(m.component_name(1), "[0, 1]");
        assert_eq!(m.component_name(2), "[1, 0]");
        m.set_component_value(3, 2.5);
        assert_eq!(m.component_value(3), 2.5);
        assert_eq!(m.editor_kind(), EditorKind::Matrix);

        let mut flags = Parameter::new("flags", ParameterKind::BVec2);
        flags.set_component_value(1, 1.0);
        assert_eq!(flags.value(), &ParameterValue::BoolList(vec![false, true]));
        assert_eq!(flags.display_value(), "(false, true)");

        let mut count = Parameter::new("count", ParameterKind::Int);
        count.set_component_value(0, 2.6);
        assert_eq!(count.value(), &ParameterValue::Int(3));
    }

    #[test]
    #[should_panic]
    fn test_component_out_of_range() {
        let p = Parameter::new("v", ParameterKind::Vec2);
        p.component_value(2);
    }

    #[test]
    fn test_range() {
        let mut p = Parameter::new("k", ParameterKind::Float);
        assert!(!p.has_range());
        p.set_range(1.0, -1.0);
        assert_eq!(p.min_value(), Some(-1.0));
        assert_eq!(p.max_value(), Some(1.0));
        p.clear_range();
        assert_eq!(p.min_value(), None);
    }

    #[test]
    fn test_component_accessors() {
        let mut tint = Parameter::new("tintColor", ParameterKind::Vec4);
        assert_eq!(tint.component_type(), BaseType::Float);
        assert_eq!(tint.component_min_value(), Some(0.0));
        assert_eq!(tint.component_max_value(), Some(1.0));
        tint.set_component_value(0, 0.123456789);
        assert_eq!(tint.component_value(0), 0.123456789);
        assert_eq!(tint.component_display_value(0), "0.123456789");
        assert_eq!(tint.component_display_value(3), "1");

        tint.set_range(-2.0, 2.0);
        assert_eq!(tint.component_min_value(), Some(-2.0));
        assert_eq!(tint.component_max_value(), Some(2.0));

        let offset = Parameter::new("offset", ParameterKind::Vec2);
        assert_eq!(offset.component_min_value(), None);
        assert_eq!(offset.component_max_value(), None);

        let mut cells = Parameter::new("cells", ParameterKind::IVec3);
        cells.set_component_value(1, 7.0);
        assert_eq!(cells.component_type(), BaseType::Int);
        assert_eq!(cells.component_display_value(1), "7");

        let mut flags = Parameter::new("flags", ParameterKind::BVec2);
        flags.set_component_value(0, 1.0);
        assert_eq!(flags.component_type(), BaseType::Bool);
        assert_eq!(flags.component_display_value(0), "true");
        assert_eq!(flags.component_display_value(1), "false");

        let mut k = Parameter::new("k", ParameterKind::Float);
        k.set_value(ParameterValue::Float(0.1 + 0.2));
        assert_eq!(k.component_value(0), 0.1 + 0.2);

        let tex = Parameter::new("tex", ParameterKind::Sampler2D);
        assert_eq!(tex.component_type(), BaseType::Sampler);
        assert_eq!(tex.component_display_value(0), "<none>");
    }

    #[test]
    fn test_display_value() {
        let mut k = Parameter::new("k", ParameterKind::Float);
        k.set_value(ParameterValue::Float(0.7));
        assert_eq!(k.display_value(), "0.7");

        let mut v = Parameter::new("v", ParameterKind::Vec2);
        v.set_value(ParameterValue::FloatList(vec![1.0, 0.5]));
        assert_eq!(v.display_value(), "(1, 0.5)");

        let shadow = Parameter::new("depth", ParameterKind::Sampler2DShadow);
        assert_eq!(shadow.display_value(), "<none>");
        assert!(!shadow.is_editable());
    }
}
