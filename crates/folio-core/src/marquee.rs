//! Continuously scrolling logo strip
//!
//! The engine owns the strip layout and the scroll offset; the front end
//! calls [`MarqueeEngine::frame`] once per display tick and translates the
//! rendered strip by [`MarqueeEngine::visible_start`]. All motion goes
//! through [`MarqueeEngine::advance`], which needs no clock.

use serde::{Deserialize, Serialize};

use crate::page::ContainerRegistry;

/// How many times the input list is repeated in the rendered strip.
pub const COPIES: usize = 4;

/// One logo in the strip. The icon is a short glyph drawn in `item_size` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoEntry {
    pub icon: String,
    pub title: String,
    #[serde(default = "default_href")]
    pub href: String,
}

fn default_href() -> String {
    "#".to_string()
}

impl LogoEntry {
    pub fn new(icon: &str, title: &str, href: &str) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            href: href.to_string(),
        }
    }

    /// Whether the entry points anywhere worth opening.
    pub fn has_link(&self) -> bool {
        !self.href.is_empty() && self.href != "#"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeOptions {
    pub logos: Vec<LogoEntry>,
    /// Cells per second
    pub speed: f64,
    pub direction: Direction,
    pub pause_on_hover: bool,
    /// Cells reserved for the icon glyph
    pub item_size: usize,
    /// Blank cells on each side of an item
    pub gap: usize,
}

impl Default for MarqueeOptions {
    fn default() -> Self {
        Self {
            logos: Vec::new(),
            speed: 100.0,
            direction: Direction::Left,
            pause_on_hover: false,
            item_size: 2,
            gap: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarqueeEngine {
    options: MarqueeOptions,
    strip: Vec<LogoEntry>,
    offset: f64,
    last_timestamp: Option<f64>,
    hovered: bool,
}

impl MarqueeEngine {
    /// Mount a marquee in `container_id`. Returns `None` when the registry
    /// has no such container.
    pub fn create(
        registry: &ContainerRegistry,
        container_id: &str,
        options: MarqueeOptions,
    ) -> Option<Self> {
        if !registry.contains(container_id) {
            return None;
        }

        let strip = render_strip(&options.logos);
        Some(Self {
            options,
            strip,
            offset: 0.0,
            last_timestamp: None,
            hovered: false,
        })
    }

    pub fn options(&self) -> &MarqueeOptions {
        &self.options
    }

    /// The rendered entries, input list repeated [`COPIES`] times.
    pub fn strip(&self) -> &[LogoEntry] {
        &self.strip
    }

    /// Cells one item occupies: margin, icon, a space, title, margin.
    pub fn item_width(&self, entry: &LogoEntry) -> usize {
        self.options.gap * 2 + self.options.item_size + 1 + entry.title.chars().count()
    }

    pub fn rendered_width(&self) -> usize {
        self.strip.iter().map(|e| self.item_width(e)).sum()
    }

    pub fn one_set_width(&self) -> f64 {
        self.rendered_width() as f64 / COPIES as f64
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Hover only flips the flag; offset and timestamp baseline are untouched.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_paused(&self) -> bool {
        self.hovered && self.options.pause_on_hover
    }

    /// Per-frame entry point. `timestamp_ms` is a monotonic clock reading;
    /// the first frame only records the baseline.
    pub fn frame(&mut self, timestamp_ms: f64) {
        let last = self.last_timestamp.unwrap_or(timestamp_ms);
        let elapsed = ((timestamp_ms - last) / 1000.0).max(0.0);
        self.last_timestamp = Some(timestamp_ms);
        self.advance(elapsed);
    }

    /// Move the strip by `speed * elapsed_secs` (unless paused) and wrap.
    pub fn advance(&mut self, elapsed_secs: f64) {
        if !self.is_paused() {
            let movement = self.options.speed * elapsed_secs;
            match self.options.direction {
                Direction::Left => self.offset -= movement,
                Direction::Right => self.offset += movement,
            }
        }

        let one_set = self.one_set_width();
        if one_set <= 0.0 {
            self.offset = 0.0;
            return;
        }

        match self.options.direction {
            Direction::Left => {
                if self.offset.abs() >= one_set {
                    self.offset = 0.0;
                }
            }
            Direction::Right => {
                if self.offset >= 0.0 {
                    self.offset = -one_set;
                }
            }
        }
    }

    /// Strip column shown at the left edge of the viewport.
    pub fn visible_start(&self) -> usize {
        (-self.offset).max(0.0).floor() as usize
    }

    /// The entry drawn at viewport column `column`, if any.
    pub fn logo_at(&self, column: usize) -> Option<&LogoEntry> {
        let total = self.rendered_width();
        if total == 0 {
            return None;
        }

        let mut target = (self.visible_start() + column) % total;
        for entry in &self.strip {
            let width = self.item_width(entry);
            if target < width {
                return Some(entry);
            }
            target -= width;
        }
        None
    }
}

fn render_strip(logos: &[LogoEntry]) -> Vec<LogoEntry> {
    let mut strip = Vec::with_capacity(logos.len() * COPIES);
    for _ in 0..COPIES {
        strip.extend(logos.iter().cloned());
    }
    strip
}

/// The tech stack shown when the config names no logos.
pub fn default_logos() -> Vec<LogoEntry> {
    vec![
        LogoEntry::new("🐍", "Python", "https://www.python.org"),
        LogoEntry::new("🗄", "SQL", "#"),
        LogoEntry::new("☁", "AWS", "https://aws.amazon.com"),
        LogoEntry::new("⚗", "Flask", "https://flask.palletsprojects.com"),
        LogoEntry::new("JS", "JavaScript", "#"),
        LogoEntry::new("<>", "HTML5", "#"),
        LogoEntry::new("#", "CSS3", "#"),
        LogoEntry::new("⎇", "Git", "https://git-scm.com"),
        LogoEntry::new("🐳", "Docker", "https://www.docker.com"),
        LogoEntry::new("🐧", "Linux", "#"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::LOGO_CONTAINER;

    fn registry() -> ContainerRegistry {
        let mut registry = ContainerRegistry::new();
        registry.register(LOGO_CONTAINER);
        registry
    }

    fn logos() -> Vec<LogoEntry> {
        vec![
            LogoEntry::new("R", "Rust", "https://www.rust-lang.org"),
            LogoEntry::new("G", "Go", "#"),
            LogoEntry::new("Z", "Zig", "#"),
        ]
    }

    fn engine(direction: Direction, pause_on_hover: bool) -> MarqueeEngine {
        let options = MarqueeOptions {
            logos: logos(),
            speed: 37.0,
            direction,
            pause_on_hover,
            item_size: 1,
            gap: 1,
        };
        MarqueeEngine::create(&registry(), LOGO_CONTAINER, options).unwrap()
    }

    #[test]
    fn test_missing_container_is_noop() {
        let engine = MarqueeEngine::create(&ContainerRegistry::new(), "nowhere", MarqueeOptions::default());
        assert!(engine.is_none());
    }

    #[test]
    fn test_strip_is_four_ordered_copies() {
        let engine = engine(Direction::Left, false);
        let strip = engine.strip();
        assert_eq!(strip.len(), 12);
        for (i, entry) in strip.iter().enumerate() {
            assert_eq!(entry, &logos()[i % 3]);
        }
        // "Rust" = 1+1+1+4+1, "Go" = 6, "Zig" = 7
        assert_eq!(engine.rendered_width(), 4 * (8 + 6 + 7));
        assert_eq!(engine.one_set_width(), 21.0);
    }

    #[test]
    fn test_first_frame_records_baseline_only() {
        let mut engine = engine(Direction::Left, false);
        engine.frame(5_000.0);
        assert_eq!(engine.offset(), 0.0);
        engine.frame(5_100.0);
        assert!((engine.offset() + 3.7).abs() < 1e-9);
    }

    #[test]
    fn test_left_offset_stays_within_one_set() {
        let mut engine = engine(Direction::Left, false);
        let one_set = engine.one_set_width();
        let mut t = 0.0;
        for i in 0..5_000 {
            t += 16.0 + (i % 7) as f64;
            engine.frame(t);
            assert!(engine.offset() <= 0.0);
            assert!(engine.offset().abs() < one_set, "offset {} at frame {i}", engine.offset());
        }
    }

    #[test]
    fn test_left_resets_to_zero_not_clamps() {
        let mut engine = engine(Direction::Left, false);
        // 21 cells at 37 cells/s is reached after ~0.57s
        engine.advance(0.5);
        assert!((engine.offset() + 18.5).abs() < 1e-9);
        engine.advance(0.1);
        assert_eq!(engine.offset(), 0.0);
    }

    #[test]
    fn test_right_offset_stays_within_one_set() {
        let mut engine = engine(Direction::Right, false);
        let one_set = engine.one_set_width();
        engine.advance(0.0);
        assert_eq!(engine.offset(), -one_set);

        let mut t = 0.0;
        for _ in 0..5_000 {
            t += 16.0;
            engine.frame(t);
            assert!(engine.offset() < 0.0);
            assert!(engine.offset().abs() <= one_set);
        }
    }

    #[test]
    fn test_hover_pause_holds_offset() {
        let mut engine = engine(Direction::Left, true);
        engine.frame(0.0);
        engine.frame(200.0);
        let held = engine.offset();
        assert!(held < 0.0);

        engine.set_hovered(true);
        engine.frame(400.0);
        engine.frame(2_000.0);
        assert_eq!(engine.offset(), held);

        engine.set_hovered(false);
        engine.frame(2_100.0);
        assert!((engine.offset() - (held - 3.7)).abs() < 1e-9);
    }

    #[test]
    fn test_hover_without_pause_keeps_moving() {
        let mut engine = engine(Direction::Left, false);
        engine.set_hovered(true);
        engine.advance(0.1);
        assert!(engine.offset() < 0.0);
    }

    #[test]
    fn test_empty_strip_never_moves() {
        let options = MarqueeOptions::default();
        let mut engine = MarqueeEngine::create(&registry(), LOGO_CONTAINER, options).unwrap();
        engine.advance(3.0);
        assert_eq!(engine.offset(), 0.0);
        assert!(engine.logo_at(0).is_none());
    }

    #[test]
    fn test_logo_at_follows_offset() {
        let mut engine = engine(Direction::Left, false);
        assert_eq!(engine.logo_at(0).unwrap().title, "Rust");
        assert_eq!(engine.logo_at(8).unwrap().title, "Go");

        // shift past the first item
        engine.advance(8.5 / 37.0);
        assert_eq!(engine.visible_start(), 8);
        assert_eq!(engine.logo_at(0).unwrap().title, "Go");
    }
}
