// ABOUTME: Narrator that records every line for assertions.
// ABOUTME: Lines are kept in order with their level.

use ecsroll::deploy::{Level, Narration, Narrator};
use parking_lot::Mutex;

#[derive(Default)]
pub struct RecordingNarrator {
    lines: Mutex<Vec<Narration>>,
}

impl RecordingNarrator {
    pub fn lines(&self) -> Vec<Narration> {
        self.lines.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.lock().iter().map(|l| l.text.clone()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|l| l.text.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.text.contains(needle))
            .count()
    }

    pub fn at_level(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.level == level)
            .map(|l| l.text.clone())
            .collect()
    }
}

impl Narrator for RecordingNarrator {
    fn narrate(&self, narration: &Narration) {
        self.lines.lock().push(narration.clone());
    }
}
