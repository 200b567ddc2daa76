// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Renders release narration in normal, quiet (CI), and JSON modes.

use parking_lot::Mutex;
use serde::Serialize;
use std::time::Instant;

use crate::deploy::{Level, Narration, Narrator};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, ErrorKind};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
///
/// Shared by concurrent releases, so the warning log sits behind a lock.
pub struct Output {
    mode: OutputMode,
    verbose: bool,
    start_time: Instant,
    diagnostics: Mutex<Diagnostics>,
}

impl Output {
    pub fn new(mode: OutputMode, verbose: bool) -> Self {
        Self {
            mode,
            verbose,
            start_time: Instant::now(),
            diagnostics: Mutex::new(Diagnostics::default()),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Get elapsed time since the output was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with timing, plus a JSON payload in json mode.
    pub fn success<T: Serialize>(&self, message: &str, payload: &T) {
        match self.mode {
            OutputMode::Normal => println!("{message} ({:.1}s)", self.elapsed_secs()),
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit_json(&JsonEvent {
                event: "success",
                level: None,
                message,
                duration_secs: Some(self.elapsed_secs()),
                data: serde_json::to_value(payload).ok(),
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    level: None,
                    message,
                    duration_secs: Some(self.elapsed_secs()),
                    data: None,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    /// Print catalog errors with their explanations.
    pub fn error_kinds(&self, kinds: &[ErrorKind]) {
        for kind in kinds {
            match self.mode {
                OutputMode::Normal | OutputMode::Quiet => {
                    eprintln!("Error [{}]: {}", kind.code(), kind.message());
                    if self.mode == OutputMode::Normal {
                        eprintln!("  {}", kind.details());
                    }
                }
                OutputMode::Json => {
                    let event = JsonError {
                        event: "error",
                        code: kind.code(),
                        message: kind.message(),
                        details: kind.details(),
                    };
                    if let Ok(json) = serde_json::to_string(&event) {
                        eprintln!("{json}");
                    }
                }
            }
        }
    }

    /// Summary of collected warnings, if any were recorded.
    pub fn warnings_summary(&self) -> Option<String> {
        let diagnostics = self.diagnostics.lock();
        if !diagnostics.has_warnings() {
            return None;
        }
        let mut summary = format!("{} warning(s) during this run:", diagnostics.warnings().len());
        for warning in diagnostics.warnings() {
            summary.push_str(&format!("\n  - {}", warning.message));
        }
        Some(summary)
    }

    /// Print collected warnings once the run is over.
    pub fn print_warnings(&self) {
        if self.mode != OutputMode::Normal {
            return;
        }
        if let Some(summary) = self.warnings_summary() {
            println!("\n{summary}");
        }
    }

    /// Report a failed run: the warnings gathered on the way, then the error.
    pub fn report_failure(&self, err: &Error) {
        self.print_warnings();

        let kinds = err.kinds();
        if kinds.is_empty() {
            self.error(&err.to_string());
            return;
        }
        if let Error::Deploy { .. } = err {
            self.error(&err.to_string());
        }
        self.error_kinds(&kinds);
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.lock().warnings().len()
    }

    fn emit_json(&self, event: &JsonEvent<'_>) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }
}

impl Narrator for Output {
    fn narrate(&self, narration: &Narration) {
        if let Some(kind) = narration.warning {
            self.diagnostics
                .lock()
                .warn(Warning::new(kind, narration.text.clone()));
        }

        match self.mode {
            OutputMode::Normal => match narration.level {
                Level::Detail if !self.verbose => {}
                Level::Error => eprintln!("{}", narration.text),
                _ => println!("{}", narration.text),
            },
            OutputMode::Quiet => {
                if narration.level == Level::Error {
                    eprintln!("{}", narration.text);
                }
            }
            OutputMode::Json => self.emit_json(&JsonEvent {
                event: "narration",
                level: Some(level_name(narration.level)),
                message: &narration.text,
                duration_secs: None,
                data: None,
            }),
        }
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Detail => "detail",
        Level::Info => "info",
        Level::Success => "success",
        Level::Warn => "warn",
        Level::Error => "error",
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<&'a str>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    event: &'a str,
    code: &'a str,
    message: &'a str,
    details: &'a str,
}
