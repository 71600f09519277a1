use std::fmt;

/// The independently togglable character style bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleBit {
    Bold,
    Italic,
    Underline,
}

impl StyleBit {
    pub fn all() -> &'static [StyleBit] {
        &[Self::Bold, Self::Italic, Self::Underline]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleFlags {
    pub const REGULAR: StyleFlags = StyleFlags {
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn has(&self, bit: StyleBit) -> bool {
        match bit {
            StyleBit::Bold => self.bold,
            StyleBit::Italic => self.italic,
            StyleBit::Underline => self.underline,
        }
    }

    pub fn with(mut self, bit: StyleBit, on: bool) -> Self {
        match bit {
            StyleBit::Bold => self.bold = on,
            StyleBit::Italic => self.italic = on,
            StyleBit::Underline => self.underline = on,
        }
        self
    }

    pub fn is_regular(&self) -> bool {
        *self == Self::REGULAR
    }
}

/// Font size stored in half points, the unit RTF uses for `\fs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u32);

impl FontSize {
    /// 12pt.
    pub const DEFAULT: FontSize = FontSize(24);

    /// Largest half-point value an RTF `\fs` parameter can carry.
    pub const MAX_HALF_POINTS: u32 = i32::MAX as u32;

    /// Returns `None` for zero or for sizes whose half-point value does not
    /// fit an RTF parameter.
    pub fn from_points(points: u32) -> Option<Self> {
        points.checked_mul(2).and_then(Self::from_half_points)
    }

    pub fn from_half_points(half_points: u32) -> Option<Self> {
        if half_points == 0 || half_points > Self::MAX_HALF_POINTS {
            None
        } else {
            Some(Self(half_points))
        }
    }

    pub fn half_points(&self) -> u32 {
        self.0
    }

    /// Whole points, rounding half points up.
    pub fn rounded_points(&self) -> u32 {
        self.0.div_ceil(2)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Family, size and style bits: the part of a character style that a font
/// change replaces as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub size: FontSize,
    pub flags: StyleFlags,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: FontSize, flags: StyleFlags) -> Self {
        Self {
            family: family.into(),
            size,
            flags,
        }
    }

    pub fn with_flags(&self, flags: StyleFlags) -> Self {
        Self {
            flags,
            ..self.clone()
        }
    }

    pub fn with_size(&self, size: FontSize) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharStyle {
    pub font: FontSpec,
    pub color: Rgb,
}

impl CharStyle {
    pub fn new(font: FontSpec, color: Rgb) -> Self {
        Self { font, color }
    }

    /// Regular style in the given font, black.
    pub fn plain(font: &FontSpec) -> Self {
        Self {
            font: font.with_flags(StyleFlags::REGULAR),
            color: Rgb::BLACK,
        }
    }
}

/// Value of an attribute over a selection: one value everywhere, or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effective<T> {
    Uniform(T),
    Mixed,
}

impl<T> Effective<T> {
    pub fn uniform(self) -> Option<T> {
        match self {
            Self::Uniform(v) => Some(v),
            Self::Mixed => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed)
    }

    pub fn unwrap_or(self, fallback: T) -> T {
        self.uniform().unwrap_or(fallback)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Effective<U> {
        match self {
            Self::Uniform(v) => Effective::Uniform(f(v)),
            Self::Mixed => Effective::Mixed,
        }
    }

    /// Folds values into a single effective value. An empty iterator is `Mixed`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
    {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return Self::Mixed;
        };
        for v in iter {
            if v != first {
                return Self::Mixed;
            }
        }
        Self::Uniform(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_rejects_zero() {
        assert!(FontSize::from_points(0).is_none());
        assert!(FontSize::from_half_points(0).is_none());
    }

    #[test]
    fn test_font_size_overflow() {
        assert!(FontSize::from_points(u32::MAX).is_none());
        assert!(FontSize::from_points(u32::MAX / 2).is_none());
        assert!(FontSize::from_points(1_073_741_824).is_none());
        let largest = FontSize::from_points(1_073_741_823).unwrap();
        assert_eq!(largest.half_points(), 2_147_483_646);
        assert!(FontSize::from_half_points(FontSize::MAX_HALF_POINTS).is_some());
        assert!(FontSize::from_half_points(FontSize::MAX_HALF_POINTS + 1).is_none());
    }

    #[test]
    fn test_font_size_display() {
        assert_eq!(FontSize::from_points(12).unwrap().to_string(), "12");
        assert_eq!(FontSize::from_half_points(21).unwrap().to_string(), "10.5");
        assert_eq!(FontSize::from_half_points(21).unwrap().rounded_points(), 11);
    }

    #[test]
    fn test_flags_with_and_has() {
        let flags = StyleFlags::REGULAR.with(StyleBit::Bold, true).with(StyleBit::Underline, true);
        assert!(flags.has(StyleBit::Bold));
        assert!(!flags.has(StyleBit::Italic));
        assert!(flags.has(StyleBit::Underline));
        assert!(flags.with(StyleBit::Bold, false).with(StyleBit::Underline, false).is_regular());
    }

    #[test]
    fn test_effective_from_values() {
        assert_eq!(Effective::from_values([1, 1, 1]), Effective::Uniform(1));
        assert_eq!(Effective::from_values([1, 2]), Effective::Mixed);
        assert_eq!(Effective::<i32>::from_values([]), Effective::Mixed);
        assert_eq!(Effective::Uniform(3).map(|v| v * 2), Effective::Uniform(6));
        assert_eq!(Effective::<i32>::Mixed.unwrap_or(7), 7);
    }
}
