//! Input history for the prompter.
//!
//! Ring buffer over submitted lines with up/down traversal. The line being
//! typed is stashed when the user starts navigating so arrowing back down
//! past the newest entry restores it.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct InputHistory {
    lines: VecDeque<String>,
    max_size: usize,
    cursor: Option<usize>,
    stashed_line: Option<String>,
}

impl InputHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_size,
            cursor: None,
            stashed_line: None,
        }
    }

    /// Record a submitted line. Consecutive duplicates are skipped.
    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        if !line.is_empty() && self.lines.back().map(String::as_str) != Some(line) {
            if self.lines.len() >= self.max_size {
                self.lines.pop_front();
            }
            self.lines.push_back(line.to_string());
        }
        self.cursor = None;
        self.stashed_line = None;
    }

    /// Up-arrow: step to the previous line, stashing the in-progress one.
    pub fn previous(&mut self, current: &str) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        match self.cursor {
            None => {
                self.stashed_line = Some(current.to_string());
                self.cursor = Some(self.lines.len() - 1);
                self.lines.back().cloned()
            }
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.lines.get(i - 1).cloned()
            }
            Some(_) => self.lines.front().cloned(),
        }
    }

    /// Down-arrow: step forward, returning the stashed line past the end.
    pub fn next(&mut self) -> Option<String> {
        match self.cursor {
            None => None,
            Some(i) if i + 1 < self.lines.len() => {
                self.cursor = Some(i + 1);
                self.lines.get(i + 1).cloned()
            }
            Some(_) => {
                self.cursor = None;
                self.stashed_line.take().or_else(|| Some(String::new()))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_skips_consecutive_duplicates() {
        let mut history = InputHistory::new(10);
        history.push("carl sagan");
        history.push("carl sagan");
        history.push("recent");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut history = InputHistory::new(2);
        history.push("one");
        history.push("two");
        history.push("three");
        assert_eq!(history.len(), 2);
        assert_eq!(history.previous("").as_deref(), Some("three"));
        assert_eq!(history.previous("").as_deref(), Some("two"));
    }

    #[test]
    fn test_traversal_restores_typed_line() {
        let mut history = InputHistory::new(10);
        history.push("carl sagan");
        history.push("1");

        assert_eq!(history.previous("rec").as_deref(), Some("1"));
        assert_eq!(history.previous("rec").as_deref(), Some("carl sagan"));
        assert_eq!(history.next().as_deref(), Some("1"));
        assert_eq!(history.next().as_deref(), Some("rec"));
    }

    #[test]
    fn test_next_without_navigation_is_none() {
        let mut history = InputHistory::new(10);
        history.push("carl sagan");
        assert!(history.next().is_none());
    }
}
