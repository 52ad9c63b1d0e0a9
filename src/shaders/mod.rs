//! Built-in shader sources and effect file hot-reload
//!
//! New GLSL effects start from the embedded default program (fixed-function
//! style Phong lighting). [`EffectFileWatcher`] lets a host rebuild an open
//! effect whenever its file is changed by an external editor.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// Vertex stage of a new GLSL effect
pub const DEFAULT_VERTEX_SHADER: &str = include_str!("default.vert");

/// Fragment stage of a new GLSL effect
pub const DEFAULT_FRAGMENT_SHADER: &str = include_str!("default.frag");

/// Watches one effect file and signals when it should be reloaded
pub struct EffectFileWatcher {
    /// Kept alive to maintain the watch
    _watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    path: PathBuf,
    file_name: OsString,
    last_change: Option<Instant>,
    /// Ignore rapid successive changes (editors often write twice)
    debounce_duration: Duration,
}

impl EffectFileWatcher {
    /// Watch `path`
    ///
    /// The parent directory is watched rather than the file itself so that
    /// editors replacing the file on save are still noticed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, notify::Error> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| notify::Error::generic("effect path has no file name"))?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching effect file {}", path.display());

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path,
            file_name,
            last_change: None,
            debounce_duration: Duration::from_millis(100),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_debounce(&mut self, duration: Duration) {
        self.debounce_duration = duration;
    }

    fn is_target(&self, changed: &Path) -> bool {
        changed.file_name() == Some(self.file_name.as_os_str())
    }

    /// Poll for changes
    ///
    /// Returns the watched path once the file changed and the debounce time
    /// has passed since the last change.
    pub fn poll(&mut self) -> Option<PathBuf> {
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) => {
                    if event.paths.iter().any(|p| self.is_target(p)) {
                        self.last_change = Some(Instant::now());
                    }
                }
                Ok(Err(e)) => {
                    log::warn!("Effect watcher error: {:?}", e);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Effect watcher channel disconnected");
                    break;
                }
            }
        }

        match self.last_change {
            Some(last) if last.elapsed() >= self.debounce_duration => {
                self.last_change = None;
                log::info!("Effect file changed: {}", self.path.display());
                Some(self.path.clone())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources() {
        assert!(DEFAULT_VERTEX_SHADER.contains("ftransform()"));
        assert!(DEFAULT_FRAGMENT_SHADER.contains("gl_FragColor"));
        assert!(!DEFAULT_FRAGMENT_SHADER.contains("uniform"));
    }

    #[test]
    fn test_watcher_filters_other_files() {
        let dir = std::env::temp_dir().join(format!("shader-workbench-watch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("effect.glsl");
        std::fs::write(&path, "[VertexShader]\n").unwrap();

        let mut watcher = EffectFileWatcher::new(&path).unwrap();
        assert_eq!(watcher.path(), path.as_path());
        assert!(watcher.is_target(&dir.join("effect.glsl")));
        assert!(!watcher.is_target(&dir.join("other.glsl")));
        assert_eq!(watcher.poll(), None);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_watcher_missing_directory() {
        let path = std::env::temp_dir()
            .join("shader-workbench-no-such-dir")
            .join("effect.glsl");
        assert!(EffectFileWatcher::new(path).is_err());
    }
}
