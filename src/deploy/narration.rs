// ABOUTME: Narration lines emitted while a release progresses.
// ABOUTME: Narrator is the single logging sink the deploy pipeline writes to.

use std::fmt;

use crate::diagnostics::WarningKind;

/// How prominent a narration line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Background detail, only shown in verbose output.
    Detail,
    /// Normal progress.
    Info,
    /// Terminal success.
    Success,
    /// Something worth attention that does not stop the release.
    Warn,
    /// Something that fails the release.
    Error,
}

/// One line of narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub level: Level,
    pub text: String,
    /// Set on every `Level::Warn` line.
    pub warning: Option<WarningKind>,
}

impl Narration {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            warning: None,
        }
    }

    pub fn detail(text: impl Into<String>) -> Self {
        Self::new(Level::Detail, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Level::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Level::Success, text)
    }

    pub fn warn(kind: WarningKind, text: impl Into<String>) -> Self {
        Self {
            warning: Some(kind),
            ..Self::new(Level::Warn, text)
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Receives narration from the pipeline and the monitor.
pub trait Narrator: Send + Sync {
    fn narrate(&self, narration: &Narration);
}

/// Prefixes every line with a label, so concurrent releases stay readable.
pub struct Prefixed<'a> {
    label: String,
    inner: &'a dyn Narrator,
}

impl<'a> Prefixed<'a> {
    pub fn new(label: impl Into<String>, inner: &'a dyn Narrator) -> Self {
        Self {
            label: label.into(),
            inner,
        }
    }
}

impl Narrator for Prefixed<'_> {
    fn narrate(&self, narration: &Narration) {
        self.inner.narrate(&Narration {
            text: format!("[{}] {}", self.label, narration.text),
            ..narration.clone()
        });
    }
}
