//! Score readout

/// Tracks the text shown in the score element
#[derive(Debug, Clone, Default)]
pub struct Hud {
    shown: Option<u64>,
    text: String,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format_score(score: u64) -> String {
        format!("Score: {}", score)
    }

    /// New text when `score` differs from what is shown, `None` otherwise
    pub fn sync(&mut self, score: u64) -> Option<&str> {
        if self.shown == Some(score) {
            return None;
        }
        self.shown = Some(score);
        self.text = Self::format_score(score);
        Some(&self.text)
    }

    /// Text currently shown
    pub fn text(&self) -> &str {
        &self.text
    }
}
