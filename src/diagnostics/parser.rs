//! Vendor-specific compiler/linker output parsers
//!
//! Drivers format GLSL info logs differently. Each parser turns one raw log
//! into diagnostics; lines it cannot locate are kept as unlocated messages so
//! nothing the driver said is lost.
//!
//! Formats handled:
//!
//! | Parser          | Example line                                   |
//! |-----------------|------------------------------------------------|
//! | `NvidiaParser`  | `0(12) : error C0000: syntax error`            |
//! | `AtiParser`     | `ERROR: 0:12: 'foo' : undeclared identifier`   |
//! | `GenericParser` | `0:12(5): error: syntax error` (Mesa)          |

use super::{Diagnostic, LogSource, Severity};

/// Turns raw compiler text into diagnostics
pub trait OutputParser {
    fn parse(&self, raw: &str, source: LogSource) -> Vec<Diagnostic>;
}

/// Pick the parser matching a `GL_VENDOR` string
pub fn parser_for_vendor(vendor: &str) -> Box<dyn OutputParser> {
    let lower = vendor.to_lowercase();
    if lower.starts_with("nvidia") {
        Box::new(NvidiaParser)
    } else if lower.starts_with("ati technologies") || lower.contains("amd") {
        Box::new(AtiParser)
    } else {
        Box::new(GenericParser)
    }
}

// ── Cursor ────────────────────────────────────────────────────────────────

/// Minimal scanner over one log line
struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn skip_spaces(&mut self) {
        let trimmed = self.rest().trim_start_matches([' ', '\t']);
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Option<u32> {
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let value = self.rest()[..digits].parse().ok()?;
        self.pos += digits;
        Some(value)
    }
}

fn severity_word(word: &str) -> Option<Severity> {
    match word.to_ascii_lowercase().as_str() {
        "error" | "fatal error" => Some(Severity::Error),
        "warning" => Some(Severity::Warning),
        "info" | "note" => Some(Severity::Info),
        _ => None,
    }
}

/// Severity guessed from free text
fn guess_severity(line: &str) -> Severity {
    let lower = line.to_ascii_lowercase();
    if lower.contains("error") {
        Severity::Error
    } else if lower.contains("warning") {
        Severity::Warning
    } else {
        Severity::Info
    }
}

fn unlocated(line: &str, source: LogSource) -> Diagnostic {
    Diagnostic::new(source, guess_severity(line), line.trim())
}

fn parse_lines(raw: &str, source: LogSource, f: impl Fn(&str) -> Option<Diagnostic>) -> Vec<Diagnostic> {
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| f(l).unwrap_or_else(|| unlocated(l, source)))
        .collect()
}

// ── NVIDIA ────────────────────────────────────────────────────────────────

/// `<file>(<line>) : <severity> <code>: <message>`
pub struct NvidiaParser;

impl NvidiaParser {
    fn parse_line(line: &str, source: LogSource) -> Option<Diagnostic> {
        let mut c = Cursor::new(line.trim());
        c.number();
        if !c.eat("(") {
            return None;
        }
        let line_no = c.number()?;
        if !c.eat(")") {
            return None;
        }
        c.skip_spaces();
        if !c.eat(":") {
            return None;
        }
        c.skip_spaces();
        let rest = c.rest();
        let word_end = rest.find(' ').unwrap_or(rest.len());
        let severity = severity_word(&rest[..word_end])?;
        // skip the error code (C0000) up to the next colon
        let message = match rest[word_end..].find(':') {
            Some(idx) => rest[word_end + idx + 1..].trim(),
            None => rest[word_end..].trim(),
        };
        Some(Diagnostic::new(source, severity, message).at(Some(line_no), None))
    }
}

impl OutputParser for NvidiaParser {
    fn parse(&self, raw: &str, source: LogSource) -> Vec<Diagnostic> {
        parse_lines(raw, source, |l| Self::parse_line(l, source))
    }
}

// ── ATI / AMD ─────────────────────────────────────────────────────────────

/// `<SEVERITY>: <file>:<line>: <message>`
pub struct AtiParser;

impl AtiParser {
    fn parse_line(line: &str, source: LogSource) -> Option<Diagnostic> {
        let line = line.trim();
        let colon = line.find(':')?;
        let severity = severity_word(&line[..colon])?;
        let mut c = Cursor::new(&line[colon + 1..]);
        c.skip_spaces();
        let located = c.number().is_some() && c.eat(":");
        let line_no = if located { c.number() } else { None };
        if line_no.is_some() && c.eat(":") {
            Some(Diagnostic::new(source, severity, c.rest().trim()).at(line_no, None))
        } else {
            // e.g. "ERROR: 2 compilation errors.  No code generated."
            Some(Diagnostic::new(source, severity, line[colon + 1..].trim()))
        }
    }
}

impl OutputParser for AtiParser {
    fn parse(&self, raw: &str, source: LogSource) -> Vec<Diagnostic> {
        parse_lines(raw, source, |l| Self::parse_line(l, source))
    }
}

// ── Generic ───────────────────────────────────────────────────────────────

/// Mesa style `<file>:<line>(<column>): <severity>: <message>`, otherwise one
/// unlocated message per line
pub struct GenericParser;

impl GenericParser {
    fn parse_line(line: &str, source: LogSource) -> Option<Diagnostic> {
        let mut c = Cursor::new(line.trim());
        c.number()?;
        if !c.eat(":") {
            return None;
        }
        let line_no = c.number()?;
        let column = if c.eat("(") {
            let col = c.number();
            if !c.eat(")") {
                return None;
            }
            col
        } else {
            None
        };
        if !c.eat(":") {
            return None;
        }
        c.skip_spaces();
        let rest = c.rest();
        let (severity, message) = match rest.find(':') {
            Some(idx) => match severity_word(rest[..idx].trim()) {
                Some(severity) => (severity, rest[idx + 1..].trim()),
                None => (guess_severity(rest), rest.trim()),
            },
            None => (guess_severity(rest), rest.trim()),
        };
        Some(Diagnostic::new(source, severity, message).at(Some(line_no), column))
    }
}

impl OutputParser for GenericParser {
    fn parse(&self, raw: &str, source: LogSource) -> Vec<Diagnostic> {
        parse_lines(raw, source, |l| Self::parse_line(l, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nvidia_format() {
        let raw = "0(12) : error C0000: syntax error, unexpected '}'\n0(3) : warning C7011: implicit cast\n";
        let out = NvidiaParser.parse(raw, LogSource::Input(1));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].line, Some(12));
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[0].message, "syntax error, unexpected '}'");
        assert_eq!(out[0].source, LogSource::Input(1));
        assert_eq!(out[1].severity, Severity::Warning);
        assert_eq!(out[1].line, Some(3));
    }

    #[test]
    fn test_ati_format() {
        let raw = "ERROR: 0:7: 'foo' : undeclared identifier\nERROR: 1 compilation errors.  No code generated.";
        let out = AtiParser.parse(raw, LogSource::Input(0));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].line, Some(7));
        assert_eq!(out[0].message, "'foo' : undeclared identifier");
        assert_eq!(out[1].line, None);
        assert_eq!(out[1].severity, Severity::Error);
    }

    #[test]
    fn test_generic_mesa_format() {
        let out = GenericParser.parse("0:5(10): error: `x' undeclared", LogSource::Input(0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].line, Some(5));
        assert_eq!(out[0].column, Some(10));
        assert_eq!(out[0].severity, Severity::Error);
        assert_eq!(out[0].message, "`x' undeclared");
    }

    #[test]
    fn test_unlocated_lines_kept() {
        let out = GenericParser.parse("Link failed.\n\nwarning: unused varying\n", LogSource::Link);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|d| d.line.is_none()));
        assert_eq!(out[0].severity, Severity::Info);
        assert_eq!(out[1].severity, Severity::Warning);
        assert_eq!(out[0].source, LogSource::Link);
    }

    #[test]
    fn test_parser_for_vendor() {
        let raw = "0(2) : error C1008: undefined variable";
        let nv = parser_for_vendor("NVIDIA Corporation").parse(raw, LogSource::Input(0));
        assert_eq!(nv[0].line, Some(2));

        let ati = parser_for_vendor("ATI Technologies Inc.").parse("ERROR: 0:4: bad", LogSource::Input(0));
        assert_eq!(ati[0].line, Some(4));

        let generic = parser_for_vendor("Mesa").parse(raw, LogSource::Input(0));
        assert_eq!(generic[0].line, None);
    }
}
