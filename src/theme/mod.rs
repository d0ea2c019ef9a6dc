//! Theme palettes for word coloring
//!
//! The dashboard ships exactly two themes. Each carries the five accent
//! colors words cycle through; the canvas background itself stays
//! transparent.

use palette::Srgb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub palette: Vec<Srgb<u8>>,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(), // Default
        }
    }

    /// Dark palette (default)
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            palette: vec![
                Srgb::new(96, 165, 250),  // #60a5fa
                Srgb::new(74, 222, 128),  // #4ade80
                Srgb::new(249, 115, 22),  // #f97316
                Srgb::new(167, 139, 250), // #a78bfa
                Srgb::new(244, 63, 94),   // #f43f5e
            ],
        }
    }

    /// Light palette
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            palette: vec![
                Srgb::new(37, 99, 235),  // #2563eb
                Srgb::new(22, 163, 74),  // #16a34a
                Srgb::new(234, 88, 12),  // #ea580c
                Srgb::new(124, 58, 237), // #7c3aed
                Srgb::new(225, 29, 72),  // #e11d48
            ],
        }
    }

    /// Palette color for a word, by its index in placement order
    pub fn color_for(&self, order: usize) -> Srgb<u8> {
        self.palette[order % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
