//! Shader Workbench - command line front end
//!
//! Headless tools for `.glsl` effect files: inspect, normalise and watch them
//! without a graphics context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde_json::json;

use shader_workbench::effects::glsl::codec::{self, EffectDocument};
use shader_workbench::effects::EffectRegistry;
use shader_workbench::settings::EditorPreferences;
use shader_workbench::shaders::EffectFileWatcher;
use shader_workbench::telemetry::{init_logging, LogConfig};

const USAGE: &str = "\
Usage: shader-workbench [-v] <command> [args]

Commands:
  list                    List the registered effect types
  check [--json] <file>   Parse an effect file and print a summary
  format [--write] <file> Print the file re-saved in canonical form
  watch [file]            Re-check a file whenever it changes
                          (defaults to the last watched file)";

enum Command {
    List,
    Check { path: PathBuf, json: bool },
    Format { path: PathBuf, write: bool },
    Watch { path: Option<PathBuf> },
}

fn parse_args(args: &[String]) -> Result<(Command, bool)> {
    let mut verbose = false;
    let mut json = false;
    let mut write = false;
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--json" => json = true,
            "--write" => write = true,
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with('-') => bail!("unknown option '{}'\n\n{}", flag, USAGE),
            _ => positional.push(arg.as_str()),
        }
    }

    let command = match positional.as_slice() {
        ["list"] => Command::List,
        ["check", path] => Command::Check {
            path: PathBuf::from(path),
            json,
        },
        ["format", path] => Command::Format {
            path: PathBuf::from(path),
            write,
        },
        ["watch"] => Command::Watch { path: None },
        ["watch", path] => Command::Watch {
            path: Some(PathBuf::from(path)),
        },
        _ => bail!("{}", USAGE),
    };
    Ok((command, verbose))
}

fn read_document(path: &Path) -> Result<EffectDocument> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(codec::parse_document(&text))
}

fn list(registry: &EffectRegistry) {
    for factory in registry.all() {
        println!("{:<16} .{:<6} {}", factory.name(), factory.extension(), factory.file_filter());
    }
}

fn check(path: &Path, as_json: bool) -> Result<()> {
    let doc = read_document(path)?;
    if as_json {
        let parameters: Vec<_> = doc
            .parameters
            .iter()
            .map(|p| {
                json!({
                    "name": p.name(),
                    "type": p.kind().type_name(),
                    "value": p.display_value(),
                })
            })
            .collect();
        let summary = json!({
            "file": path.display().to_string(),
            "vertexLines": doc.vertex.lines().count(),
            "fragmentLines": doc.fragment.lines().count(),
            "parameters": parameters,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", path.display());
    println!("  vertex shader:   {} lines", doc.vertex.lines().count());
    println!("  fragment shader: {} lines", doc.fragment.lines().count());
    if doc.parameters.is_empty() {
        println!("  no stored parameters");
    }
    for p in &doc.parameters {
        println!("  {} {} = {}", p.kind(), p.name(), p.display_value());
    }
    Ok(())
}

fn format(path: &Path, write: bool) -> Result<()> {
    let doc = read_document(path)?;
    let text = codec::write_document(&doc.vertex, &doc.fragment, &doc.parameters);
    if write {
        std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Formatted {}", path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn watch(path: Option<PathBuf>, prefs: &mut EditorPreferences) -> Result<()> {
    let path = match path.or_else(|| prefs.last_opened()) {
        Some(path) => path,
        None => bail!("no file given and no previously watched file\n\n{}", USAGE),
    };
    prefs.set_last_opened(&path);

    let mut watcher = EffectFileWatcher::new(&path).with_context(|| format!("failed to watch {}", path.display()))?;
    check(&path, false)?;
    loop {
        if let Some(changed) = watcher.poll() {
            if let Err(e) = check(&changed, false) {
                tracing::warn!("{:#}", e);
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, verbose) = parse_args(&args)?;

    // Keep the guard alive for the program duration
    let _log_guard = match init_logging(&LogConfig::for_cli(verbose)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let mut prefs = EditorPreferences::load();
    let registry = EffectRegistry::with_builtin();

    match command {
        Command::List => {
            list(&registry);
            Ok(())
        }
        Command::Check { path, json } => check(&path, json),
        Command::Format { path, write } => format(&path, write),
        Command::Watch { path } => watch(path, &mut prefs),
    }
}
