//! GLSL effect file format
//!
//! ```text
//! [VertexShader]
//! <vertex source>
//! [FragmentShader]
//! <fragment source>
//! [Parameters]
//! float k = 0.7;
//! vec2 offset = vec2(1, 0.5);
//! sampler2D tex = load("stone.png");
//! ```
//!
//! Each section runs until the next line starting with `[`. Parameter lines
//! that do not parse are dropped.

use crate::effects::types::format_float;
use crate::effects::{BaseType, Parameter, ParameterKind, ParameterValue, TextureRef};

pub const VERTEX_SHADER_TAG: &str = "[VertexShader]";
pub const FRAGMENT_SHADER_TAG: &str = "[FragmentShader]";
pub const PARAMETERS_TAG: &str = "[Parameters]";

/// Decoded effect file
#[derive(Debug, Default)]
pub struct EffectDocument {
    pub vertex: String,
    pub fragment: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Clone, Copy)]
enum Section {
    Vertex,
    Fragment,
    Parameters,
    Unknown,
}

/// Split an effect file into its sections
///
/// Sources missing from the text come back empty.
pub fn parse_document(text: &str) -> EffectDocument {
    let mut doc = EffectDocument::default();
    let mut section = Section::Unknown;

    for line in text.split_inclusive('\n') {
        if line.starts_with('[') {
            section = match line.trim_end() {
                VERTEX_SHADER_TAG => Section::Vertex,
                FRAGMENT_SHADER_TAG => Section::Fragment,
                PARAMETERS_TAG => Section::Parameters,
                other => {
                    log::debug!("Skipping unknown section {}", other);
                    Section::Unknown
                }
            };
            continue;
        }
        match section {
            Section::Vertex => doc.vertex.push_str(line),
            Section::Fragment => doc.fragment.push_str(line),
            Section::Parameters => {
                if let Some(param) = parse_parameter(line) {
                    doc.parameters.push(param);
                }
            }
            Section::Unknown => {}
        }
    }

    doc
}

/// Serialize sources and parameters
///
/// Shader bodies are newline terminated; the parameter section is only
/// written when there are parameters.
pub fn write_document(vertex: &str, fragment: &str, parameters: &[Parameter]) -> String {
    let mut out = String::new();
    for (tag, body) in [(VERTEX_SHADER_TAG, vertex), (FRAGMENT_SHADER_TAG, fragment)] {
        out.push_str(tag);
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    if !parameters.is_empty() {
        out.push_str(PARAMETERS_TAG);
        out.push('\n');
        for param in parameters {
            out.push_str(&parameter_assignment(param));
        }
    }
    out
}

/// `<type> <name> = <value>;` line for a parameter
pub fn parameter_assignment(param: &Parameter) -> String {
    let kind = param.kind();
    let value = match param.value() {
        ParameterValue::Texture(tex) => format!("load(\"{}\")", tex.path),
        ParameterValue::Float(v) => format_float(*v),
        ParameterValue::Int(v) => v.to_string(),
        ParameterValue::Bool(v) => v.to_string(),
        ParameterValue::BoolList(v) => {
            let parts: Vec<String> = v.iter().map(|b| b.to_string()).collect();
            format!("{}({})", kind.type_name(), parts.join(", "))
        }
        ParameterValue::IntList(v) => {
            let parts: Vec<String> = v.iter().map(|i| i.to_string()).collect();
            format!("{}({})", kind.type_name(), parts.join(", "))
        }
        ParameterValue::FloatList(v) => {
            let parts: Vec<String> = v.iter().map(|x| format_float(*x)).collect();
            format!("{}({})", kind.type_name(), parts.join(", "))
        }
        ParameterValue::Color(c) => {
            let parts: Vec<String> = c[..param.component_count()].iter().map(|x| format_float(*x)).collect();
            format!("{}({})", kind.type_name(), parts.join(", "))
        }
    };
    format!("{} {} = {};\n", kind.type_name(), param.name(), value)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Identifier, optionally followed by an `[index]` suffix
fn is_parameter_name(s: &str) -> bool {
    match s.split_once('[') {
        Some((base, rest)) => match rest.strip_suffix(']') {
            Some(index) => is_identifier(base) && !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        },
        None => is_identifier(s),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_value(kind: ParameterKind, text: &str) -> Option<ParameterValue> {
    let text = text.trim();
    if kind.is_sampler() {
        let path = text.strip_prefix("load(\"")?.strip_suffix("\")")?;
        return Some(ParameterValue::Texture(TextureRef::new(path)));
    }
    if kind.is_scalar() {
        return match kind.base() {
            BaseType::Float => text.parse().ok().map(ParameterValue::Float),
            BaseType::Int => text.parse().ok().map(ParameterValue::Int),
            BaseType::Bool => parse_bool(text).map(ParameterValue::Bool),
            BaseType::Sampler => None,
        };
    }

    let args = text
        .strip_prefix(kind.type_name())?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let args: Vec<&str> = args.split(',').collect();
    if args.len() != kind.component_count() {
        return None;
    }
    match kind.base() {
        BaseType::Float => args
            .iter()
            .map(|a| a.trim().parse().ok())
            .collect::<Option<Vec<f64>>>()
            .map(ParameterValue::FloatList),
        BaseType::Int => args
            .iter()
            .map(|a| a.trim().parse().ok())
            .collect::<Option<Vec<i32>>>()
            .map(ParameterValue::IntList),
        BaseType::Bool => args
            .iter()
            .map(|a| parse_bool(a))
            .collect::<Option<Vec<bool>>>()
            .map(ParameterValue::BoolList),
        BaseType::Sampler => None,
    }
}

/// Parse one parameter line; `None` for comments, blanks and malformed lines
pub fn parse_parameter(line: &str) -> Option<Parameter> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return None;
    }

    let parsed = (|| {
        let statement = trimmed.strip_suffix(';')?;
        let (lhs, rhs) = statement.split_once('=')?;
        let mut tokens = lhs.split_whitespace();
        let (type_name, name) = (tokens.next()?, tokens.next()?);
        if tokens.next().is_some() || !is_identifier(type_name) || !is_parameter_name(name) {
            return None;
        }
        let kind = ParameterKind::from_type_name(type_name)?;
        let mut param = Parameter::new(name, kind);
        param.set_value(parse_value(kind, rhs)?).then_some(param)
    })();

    if parsed.is_none() {
        log::debug!("Ignoring malformed parameter line: {}", trimmed);
    }
    parsed
}
