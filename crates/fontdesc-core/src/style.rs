//! Weight, width and slant: how a face sits within its family
//!
//! On the wire a style is one packed integer,
//! `(weight << 16) | (width << 8) | slant`. Streams written before the
//! packed form stored a 2-bit value instead (bit 0 bold, bit 1 italic);
//! any packed value of 2 or less is read through [`FontStyle::from_legacy`].

use std::fmt;

/// Which way the glyphs lean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slant {
    #[default]
    Upright,
    Italic,
    Oblique,
}

impl Slant {
    /// Wire value of this slant
    pub const fn to_bits(self) -> u8 {
        match self {
            Slant::Upright => 0,
            Slant::Italic => 1,
            Slant::Oblique => 2,
        }
    }

    /// Decode a wire value; anything past the known range leans as Oblique
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Slant::Upright,
            1 => Slant::Italic,
            _ => Slant::Oblique,
        }
    }
}

/// Style of a single face within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontStyle {
    weight: u16,
    width: u8,
    slant: Slant,
}

impl FontStyle {
    pub const THIN_WEIGHT: u16 = 100;
    pub const EXTRA_LIGHT_WEIGHT: u16 = 200;
    pub const LIGHT_WEIGHT: u16 = 300;
    pub const NORMAL_WEIGHT: u16 = 400;
    pub const MEDIUM_WEIGHT: u16 = 500;
    pub const SEMI_BOLD_WEIGHT: u16 = 600;
    pub const BOLD_WEIGHT: u16 = 700;
    pub const EXTRA_BOLD_WEIGHT: u16 = 800;
    pub const BLACK_WEIGHT: u16 = 900;
    pub const MAX_WEIGHT: u16 = 1000;

    pub const ULTRA_CONDENSED_WIDTH: u8 = 1;
    pub const CONDENSED_WIDTH: u8 = 3;
    pub const NORMAL_WIDTH: u8 = 5;
    pub const EXPANDED_WIDTH: u8 = 7;
    pub const ULTRA_EXPANDED_WIDTH: u8 = 9;

    pub const NORMAL: Self = Self::new(Self::NORMAL_WEIGHT, Self::NORMAL_WIDTH, Slant::Upright);
    pub const BOLD: Self = Self::new(Self::BOLD_WEIGHT, Self::NORMAL_WIDTH, Slant::Upright);
    pub const ITALIC: Self = Self::new(Self::NORMAL_WEIGHT, Self::NORMAL_WIDTH, Slant::Italic);
    pub const BOLD_ITALIC: Self = Self::new(Self::BOLD_WEIGHT, Self::NORMAL_WIDTH, Slant::Italic);

    /// Build a style, clamping weight to `0..=1000` and width to `1..=9`
    pub const fn new(weight: u16, width: u8, slant: Slant) -> Self {
        let weight = if weight > Self::MAX_WEIGHT {
            Self::MAX_WEIGHT
        } else {
            weight
        };
        let width = if width < Self::ULTRA_CONDENSED_WIDTH {
            Self::ULTRA_CONDENSED_WIDTH
        } else if width > Self::ULTRA_EXPANDED_WIDTH {
            Self::ULTRA_EXPANDED_WIDTH
        } else {
            width
        };
        Self {
            weight,
            width,
            slant,
        }
    }

    pub const fn weight(&self) -> u16 {
        self.weight
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    pub const fn slant(&self) -> Slant {
        self.slant
    }

    /// Pack into the wire integer
    pub const fn to_bits(&self) -> u32 {
        ((self.weight as u32) << 16) | ((self.width as u32) << 8) | self.slant.to_bits() as u32
    }

    /// Unpack a packed integer, ignoring the legacy range
    pub const fn unpack(bits: u32) -> Self {
        Self::new(
            ((bits >> 16) & 0xFFFF) as u16,
            ((bits >> 8) & 0xFF) as u8,
            Slant::from_bits((bits & 0xFF) as u8),
        )
    }

    /// Map an old 2-bit style (bit 0 bold, bit 1 italic)
    pub const fn from_legacy(bits: u32) -> Self {
        let weight = if bits & 0x1 != 0 {
            Self::BOLD_WEIGHT
        } else {
            Self::NORMAL_WEIGHT
        };
        let slant = if bits & 0x2 != 0 {
            Slant::Italic
        } else {
            Slant::Upright
        };
        Self::new(weight, Self::NORMAL_WIDTH, slant)
    }

    /// Decode whatever a stream carried, legacy or packed
    pub fn from_wire(bits: u64) -> Self {
        if bits <= 2 {
            return Self::from_legacy(bits as u32);
        }
        // Packed styles occupy 32 bits; anything wider keeps its low word
        Self::unpack(bits as u32)
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slant = match self.slant {
            Slant::Upright => "upright",
            Slant::Italic => "italic",
            Slant::Oblique => "oblique",
        };
        write!(f, "weight {} width {} {}", self.weight, self.width, slant)
    }
}
