//! Editor session
//!
//! Host-side document workflow around one effect: create or open an effect,
//! track modifications, rebuild after a period of inactivity and save.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::diagnostics::{MessageLog, MessageSink};
use crate::effects::{Effect, EffectFactory, EffectRegistry, ParameterValue};
use crate::gpu::ShaderDevice;
use crate::settings::EditorPreferences;
use crate::textures::TextureCache;

const APP_NAME: &str = "Shader Workbench";

/// Session errors shown to the user
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No effect files supported")]
    NoSupportedFactories,
    #[error("Unsupported effect file type '{0}'")]
    UnsupportedExtension(String),
    #[error("No effect is open")]
    NoEffect,
    #[error("Effect has not been saved to a file yet")]
    NoPath,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Debounced rebuild timer
///
/// Every edit pushes the deadline back; the rebuild fires once the user has
/// been idle for `delay`.
#[derive(Debug, Clone)]
pub struct RebuildScheduler {
    enabled: bool,
    delay: Duration,
    deadline: Option<Instant>,
}

impl RebuildScheduler {
    pub fn new(enabled: bool, delay: Duration) -> Self {
        Self {
            enabled,
            delay,
            deadline: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.deadline = None;
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) {
        if self.enabled {
            self.deadline = Some(now + self.delay);
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the deadline has passed; the timer is then stopped
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub struct EditorSession {
    registry: EffectRegistry,
    device: Rc<dyn ShaderDevice>,
    textures: Rc<TextureCache>,
    factory: Option<Arc<dyn EffectFactory>>,
    effect: Option<Box<dyn Effect>>,
    path: Option<PathBuf>,
    modified: bool,
    scheduler: RebuildScheduler,
    animation_interval: Duration,
    messages: MessageLog,
}

impl EditorSession {
    pub fn new(registry: EffectRegistry, device: Rc<dyn ShaderDevice>, prefs: &EditorPreferences) -> Self {
        let textures = Rc::new(TextureCache::new(device.clone()));
        Self {
            registry,
            device,
            textures,
            factory: None,
            effect: None,
            path: None,
            modified: false,
            scheduler: RebuildScheduler::new(prefs.auto_compile, prefs.compile_delay()),
            animation_interval: prefs.animation_interval(),
            messages: MessageLog::new(),
        }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn textures(&self) -> &Rc<TextureCache> {
        &self.textures
    }

    pub fn factory(&self) -> Option<&Arc<dyn EffectFactory>> {
        self.factory.as_ref()
    }

    pub fn effect(&self) -> Option<&dyn Effect> {
        self.effect.as_deref()
    }

    pub fn effect_mut(&mut self) -> Option<&mut (dyn Effect + 'static)> {
        self.effect.as_deref_mut()
    }

    /// Output of the last build
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn scheduler(&self) -> &RebuildScheduler {
        &self.scheduler
    }

    pub fn set_auto_compile(&mut self, enabled: bool) {
        self.scheduler.set_enabled(enabled);
    }

    /// Open-dialog filter over every supported effect type
    pub fn open_filter(&self) -> String {
        let patterns: Vec<String> = self
            .registry
            .supported(self.device.as_ref())
            .iter()
            .map(|f| format!("*.{}", f.extension()))
            .collect();
        format!("Effect Files ({})", patterns.join(" "))
    }

    /// File name shown for the document
    pub fn file_name(&self) -> String {
        match (&self.path, &self.factory) {
            (Some(path), _) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            (None, Some(factory)) => format!("untitled.{}", factory.extension()),
            (None, None) => "untitled".to_string(),
        }
    }

    pub fn window_title(&self) -> String {
        let mut title = match &self.path {
            Some(_) => self.file_name(),
            None => "Untitled".to_string(),
        };
        if self.modified {
            title.push_str(" [modified]");
        }
        format!("{} - {}", title, APP_NAME)
    }

    fn close_effect(&mut self) {
        self.scheduler.cancel();
        self.effect = None;
        self.factory = None;
        self.path = None;
        self.modified = false;
        self.messages.clear();
        self.textures.clear();
        self.textures.set_base_dir(None);
    }

    /// Start a new effect from the first supported factory
    pub fn new_effect(&mut self) -> Result<bool, SessionError> {
        let factory = self
            .registry
            .first_supported(self.device.as_ref())
            .ok_or(SessionError::NoSupportedFactories)?;
        self.close_effect();
        self.effect = Some(factory.create_effect(self.device.clone(), self.textures.clone()));
        log::info!("New {} effect", factory.name());
        self.factory = Some(factory);
        Ok(self.build())
    }

    /// Open an effect file, choosing the factory by extension, and build it
    pub fn open(&mut self, path: &Path) -> Result<bool, SessionError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let factory = self
            .registry
            .find_by_extension(&extension)
            .filter(|f| f.is_supported(self.device.as_ref()))
            .ok_or_else(|| SessionError::UnsupportedExtension(extension.clone()))?;
        let text = fs::read_to_string(path)?;

        self.close_effect();
        self.textures.set_base_dir(path.parent().map(Path::to_path_buf));
        let mut effect = factory.create_effect(self.device.clone(), self.textures.clone());
        effect.load(&text);
        log::info!("Opened {} ({})", path.display(), factory.name());

        self.effect = Some(effect);
        self.factory = Some(factory);
        self.path = Some(path.to_path_buf());
        Ok(self.build())
    }

    /// Save to the current file
    pub fn save(&mut self) -> Result<(), SessionError> {
        if self.effect.is_none() {
            return Err(SessionError::NoEffect);
        }
        let path = self.path.clone().ok_or(SessionError::NoPath)?;
        self.write_to(&path)
    }

    /// Save to `path` and make it the current file
    pub fn save_as(&mut self, path: &Path) -> Result<(), SessionError> {
        self.write_to(path)?;
        self.path = Some(path.to_path_buf());
        self.textures.set_base_dir(path.parent().map(Path::to_path_buf));
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<(), SessionError> {
        let effect = self.effect.as_ref().ok_or(SessionError::NoEffect)?;
        fs::write(path, effect.save())?;
        self.modified = false;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    /// Replace one shader input; an auto-compile is scheduled
    pub fn set_input(&mut self, index: usize, source: &str, now: Instant) -> Result<(), SessionError> {
        let effect = self.effect.as_mut().ok_or(SessionError::NoEffect)?;
        if effect.input(index) == source {
            return Ok(());
        }
        effect.set_input(index, source);
        self.modified = true;
        self.scheduler.schedule(now);
        Ok(())
    }

    /// Change a parameter from the property editor
    pub fn set_parameter_value(&mut self, index: usize, value: ParameterValue) -> Result<bool, SessionError> {
        let effect = self.effect.as_mut().ok_or(SessionError::NoEffect)?;
        let changed = effect.set_parameter_value(index, value);
        if changed {
            self.modified = true;
        }
        Ok(changed)
    }

    /// Rebuild when the inactivity delay has passed
    ///
    /// Returns the build result when a rebuild ran.
    pub fn poll_rebuild(&mut self, now: Instant) -> Option<bool> {
        if self.effect.is_none() || !self.scheduler.take_due(now) {
            return None;
        }
        log::debug!("Auto-compiling after {:?} of inactivity", self.scheduler.delay());
        Some(self.build())
    }

    /// Build the current effect and report the outcome to the message log
    pub fn build(&mut self) -> bool {
        self.scheduler.cancel();
        let Some(effect) = self.effect.as_mut() else {
            return false;
        };
        let ok = effect.build(Some(&mut self.messages));
        if ok {
            self.messages.info("Compilation succeeded.");
        } else {
            self.messages.error("Compilation failed.");
        }
        ok
    }

    /// Redraw interval while the effect is animated
    pub fn animation_interval(&self) -> Option<Duration> {
        self.effect
            .as_ref()
            .filter(|e| e.is_valid() && e.is_animated())
            .map(|_| self.animation_interval)
    }
}
