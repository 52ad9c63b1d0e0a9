//! Build diagnostics
//!
//! Compile and link logs flow from an effect into a [`MessageSink`], tagged
//! with the input they came from (vertex = 0, fragment = 1, link = -1). A sink
//! may use the effect's vendor-specific [`OutputParser`] to split raw driver
//! text into located [`Diagnostic`]s.

mod parser;

pub use parser::*;

use std::fmt;

/// Which build step produced a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSource {
    /// Shader input by index (0 = vertex, 1 = fragment)
    Input(usize),
    /// Program link step
    Link,
}

impl LogSource {
    /// Numeric tag used by hosts: the input index, or -1 for the link step
    pub fn index(self) -> i32 {
        match self {
            LogSource::Input(i) => i as i32,
            LogSource::Link => -1,
        }
    }

    pub fn from_index(index: i32) -> Self {
        if index < 0 {
            LogSource::Link
        } else {
            LogSource::Input(index as usize)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One located compiler or linker message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: LogSource,
    /// 1-based line in the input, when the driver reported one
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(source: LogSource, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            source,
            line: None,
            column: None,
            message: message.into(),
            severity,
        }
    }

    pub fn at(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => write!(f, "{}:{}: {}: {}", line, col, self.severity, self.message),
            (Some(line), None) => write!(f, "{}: {}: {}", line, self.severity, self.message),
            _ => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Receiver for build progress and compiler output
pub trait MessageSink {
    /// Drop everything reported by a previous build
    fn clear(&mut self);

    fn info(&mut self, message: &str);

    fn error(&mut self, message: &str);

    /// Raw compiler or linker log for one build step
    ///
    /// `parser` is the effect's vendor-selected parser; sinks that only want
    /// the raw text may ignore it.
    fn log(&mut self, raw: &str, source: LogSource, parser: Option<&dyn OutputParser>);
}

/// Sink that drops everything, used for silent builds
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn clear(&mut self) {}

    fn info(&mut self, _message: &str) {}

    fn error(&mut self, _message: &str) {}

    fn log(&mut self, _raw: &str, _source: LogSource, _parser: Option<&dyn OutputParser>) {}
}

/// One entry recorded by a [`MessageLog`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Error(String),
    /// Non-empty raw log with its parsed diagnostics
    Log {
        source: LogSource,
        raw: String,
        diagnostics: Vec<Diagnostic>,
    },
}

/// Collecting sink
///
/// Keeps every message of the current build and mirrors it to the `log`
/// facade, so headless hosts see build output in their logs.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Parsed diagnostics of all logs, in report order
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Log { diagnostics, .. } => Some(diagnostics.iter()),
                _ => None,
            })
            .flatten()
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| match m {
            Message::Error(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some() || self.diagnostics().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSink for MessageLog {
    fn clear(&mut self) {
        self.messages.clear();
    }

    fn info(&mut self, message: &str) {
        log::info!("{}", message);
        self.messages.push(Message::Info(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        log::error!("{}", message);
        self.messages.push(Message::Error(message.to_string()));
    }

    fn log(&mut self, raw: &str, source: LogSource, parser: Option<&dyn OutputParser>) {
        if raw.trim().is_empty() {
            return;
        }
        let diagnostics = match parser {
            Some(parser) => parser.parse(raw, source),
            None => GenericParser.parse(raw, source),
        };
        for d in &diagnostics {
            match d.severity {
                Severity::Error => log::warn!("[{}] {}", source.index(), d),
                _ => log::debug!("[{}] {}", source.index(), d),
            }
        }
        self.messages.push(Message::Log {
            source,
            raw: raw.to_string(),
            diagnostics,
        });
    }
}
