//! Core types for spark-tabbar.
//!
//! Colors and rectangles that flow from configuration, through the layout
//! pass, into preset visuals and finally the renderer.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Scale alpha by `factor` (clamped to 0..=1).
    pub fn fade(self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        self.with_alpha((self.a as f64 * factor).round() as u8)
    }

    /// Parse a hex color: `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    ///
    /// # Examples
    ///
    /// ```
    /// use spark_tabbar::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("#f00"), Some(Rgba::RED));
    /// assert_eq!(Rgba::from_hex("00ff00"), Some(Rgba::GREEN));
    /// assert!(Rgba::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            let high = hex_digit(s[i])?;
            let low = hex_digit(s[i + 1])?;
            Some((high << 4) | low)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = hex_byte(bytes, 0)?;
                let g = hex_byte(bytes, 2)?;
                let b = hex_byte(bytes, 4)?;
                let a = hex_byte(bytes, 6)?;
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse a color from configuration: a hex string or a basic color name.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        match s.to_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "yellow" => Some(Self::YELLOW),
            "cyan" => Some(Self::CYAN),
            "magenta" => Some(Self::MAGENTA),
            "gray" | "grey" => Some(Self::GRAY),
            "transparent" => Some(Self::TRANSPARENT),
            _ => Self::from_hex(s),
        }
    }
}

impl From<Rgba> for crossterm::style::Color {
    fn from(color: Rgba) -> Self {
        crossterm::style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

// =============================================================================
// Layout Box
// =============================================================================

/// An axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this box (right/bottom edges exclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

// =============================================================================
// Tests
// =============================================================================
