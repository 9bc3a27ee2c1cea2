/// Blank columns between the end of the content and its next pass.
pub const TICKER_GAP: usize = 8;

/// Horizontal-scroll compositor for one text line.
///
/// The content loops forever; `advance` moves the viewport by
/// `speed / fps` columns, so a tick at the configured frame rate scrolls
/// `speed` columns per second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticker {
    content: Vec<char>,
    offset: f64,
    speed: f64,
    fps: u32,
}

impl Ticker {
    pub fn new(speed: f64, fps: u32) -> Self {
        Self { content: Vec::new(), offset: 0.0, speed, fps }
    }

    pub fn configure(&mut self, speed: f64, fps: u32) {
        self.speed = speed;
        self.fps = fps;
    }

    /// Replace the content and restart from the first column.
    pub fn set_content(&mut self, text: &str) {
        self.content = text.chars().chain(std::iter::repeat_n(' ', TICKER_GAP)).collect();
        self.offset = 0.0;
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.offset = 0.0;
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn step(&self) -> f64 {
        self.speed / f64::from(self.fps.max(1))
    }

    pub fn advance(&mut self) {
        if self.content.is_empty() {
            return;
        }
        self.offset = (self.offset + self.step()) % self.content.len() as f64;
    }

    /// The `width` columns currently in view.
    pub fn visible(&self, width: usize) -> String {
        if self.content.is_empty() {
            return String::new();
        }
        let start = self.offset.floor() as usize;
        (0..width)
            .map(|i| self.content[(start + i) % self.content.len()])
            .collect()
    }
}
