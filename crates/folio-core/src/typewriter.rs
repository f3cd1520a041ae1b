use std::time::Duration;

/// Delay before the first character appears.
pub const START_DELAY: Duration = Duration::from_millis(1000);
const TYPE_DELAY: Duration = Duration::from_millis(100);
const DELETE_DELAY: Duration = Duration::from_millis(50);
const HOLD_DELAY: Duration = Duration::from_millis(2000);

/// Headline that types a phrase, holds it, deletes it, and moves on to the
/// next one, forever.
#[derive(Debug, Clone)]
pub struct Typewriter {
    texts: Vec<String>,
    index: usize,
    chars: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            texts,
            index: 0,
            chars: 0,
            deleting: false,
        }
    }

    /// Advance one character and return how long to wait before the next step.
    pub fn step(&mut self) -> Duration {
        let Some(current) = self.texts.get(self.index) else {
            return HOLD_DELAY;
        };
        let len = current.chars().count();

        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
        } else {
            self.chars = (self.chars + 1).min(len);
        }

        if !self.deleting && self.chars == len {
            self.deleting = true;
            return HOLD_DELAY;
        }
        if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.index = (self.index + 1) % self.texts.len();
            return DELETE_DELAY;
        }

        if self.deleting {
            DELETE_DELAY
        } else {
            TYPE_DELAY
        }
    }

    pub fn visible(&self) -> String {
        self.texts
            .get(self.index)
            .map(|t| t.chars().take(self.chars).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> Typewriter {
        Typewriter::new(vec!["Rust".to_string(), "Go".to_string()])
    }

    #[test]
    fn test_types_then_holds() {
        let mut w = writer();
        assert_eq!(w.visible(), "");
        assert_eq!(w.step(), TYPE_DELAY);
        assert_eq!(w.visible(), "R");
        w.step();
        w.step();
        assert_eq!(w.visible(), "Rus");
        assert_eq!(w.step(), HOLD_DELAY);
        assert_eq!(w.visible(), "Rust");
    }

    #[test]
    fn test_deletes_then_moves_on() {
        let mut w = writer();
        for _ in 0..4 {
            w.step();
        }
        assert_eq!(w.step(), DELETE_DELAY);
        assert_eq!(w.visible(), "Rus");
        for _ in 0..3 {
            w.step();
        }
        assert_eq!(w.visible(), "");
        assert_eq!(w.step(), TYPE_DELAY);
        assert_eq!(w.visible(), "G");
    }

    #[test]
    fn test_cycles_back_to_first() {
        let mut w = writer();
        // "Rust": 4 up, 4 down; "Go": 2 up, 2 down
        for _ in 0..12 {
            w.step();
        }
        w.step();
        assert_eq!(w.visible(), "R");
    }

    #[test]
    fn test_empty_list_is_inert() {
        let mut w = Typewriter::new(Vec::new());
        assert_eq!(w.step(), HOLD_DELAY);
        assert_eq!(w.visible(), "");
    }
}
