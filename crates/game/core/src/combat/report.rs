//! The scrolling combat report.

use std::collections::VecDeque;

use crate::config::GameConfig;

/// Presentation hint for a report line; the renderer maps tones to
/// colors/icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Attack,
    Defense,
    Neutral,
    Info,
    Important,
    Ability,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportLine {
    pub text: String,
    pub tone: Tone,
}

/// Text log of a battle, capped to the visible window height; old lines
/// scroll off the top.
#[derive(Clone, Debug, Default)]
pub struct Report {
    lines: VecDeque<ReportLine>,
}

impl Report {
    pub fn push(&mut self, text: impl Into<String>, tone: Tone) {
        self.lines.push_back(ReportLine {
            text: text.into(),
            tone,
        });
        while self.lines.len() > GameConfig::REPORT_LINES {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&ReportLine> {
        self.lines.back()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_caps_to_visible_height() {
        let mut report = Report::default();
        for i in 0..GameConfig::REPORT_LINES + 5 {
            report.push(format!("line {i}"), Tone::Neutral);
        }
        assert_eq!(report.lines().count(), GameConfig::REPORT_LINES);
        // Oldest lines scrolled off.
        assert!(!report.contains("line 0"));
        assert!(report.contains(&format!("line {}", GameConfig::REPORT_LINES + 4)));
    }
}
