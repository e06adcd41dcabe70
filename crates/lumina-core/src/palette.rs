//! Colors per layer kind.
//!
//! The set of layer kinds is closed, so a [`Palette`] is a total mapping:
//! building one from entries fails if any kind is missing.

use crate::error::SceneError;

/// Particle categories making up the tree body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    Star,
    Heart,
    Snow,
    Orb,
}

impl ShapeCategory {
    pub const ALL: [ShapeCategory; 4] = [
        ShapeCategory::Star,
        ShapeCategory::Heart,
        ShapeCategory::Snow,
        ShapeCategory::Orb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Snow => "snow",
            Self::Orb => "orb",
        }
    }
}

/// Sprite drawn for each particle of a layer. The discriminant is the shape
/// index the point shader switches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Disc = 0,
    Star = 1,
    Heart = 2,
    Snowflake = 3,
    Orb = 4,
}

impl Sprite {
    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Every colorable particle layer: the four tree categories plus the ribbon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Tree(ShapeCategory),
    Ribbon,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Tree(ShapeCategory::Star),
        LayerKind::Tree(ShapeCategory::Heart),
        LayerKind::Tree(ShapeCategory::Snow),
        LayerKind::Tree(ShapeCategory::Orb),
        LayerKind::Ribbon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Tree(c) => c.name(),
            Self::Ribbon => "ribbon",
        }
    }

    pub fn sprite(self) -> Sprite {
        match self {
            Self::Tree(ShapeCategory::Star) => Sprite::Star,
            Self::Tree(ShapeCategory::Heart) => Sprite::Heart,
            Self::Tree(ShapeCategory::Snow) => Sprite::Snowflake,
            Self::Tree(ShapeCategory::Orb) => Sprite::Orb,
            Self::Ribbon => Sprite::Disc,
        }
    }
}

/// Linear RGB in \[0, 1\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, SceneError> {
        let invalid = || SceneError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut rgb = [0.0f32; 3];
        for (i, c) in rgb.iter_mut().enumerate() {
            let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
            *c = byte as f32 / 255.0;
        }
        Ok(Rgb(rgb))
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0
    }
}

// Theme colors
pub const GOLD: &str = "#B8860B";
pub const ROSE: &str = "#C82033";
pub const EMERALD: &str = "#1B7837";
pub const DIAMOND: &str = "#FFFFFF";
pub const ICE: &str = "#92C3EF";
pub const CHAMPAGNE: &str = "#FBF0DC";
pub const VIOLET: &str = "#C0B6F9";
pub const SAND: &str = "#D8B697";

pub const THEME: [&str; 8] = [GOLD, ROSE, EMERALD, DIAMOND, ICE, CHAMPAGNE, VIOLET, SAND];

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    star: Rgb,
    heart: Rgb,
    snow: Rgb,
    orb: Rgb,
    ribbon: Rgb,
}

impl Palette {
    /// Build from `(kind, color)` entries. Later entries override earlier ones;
    /// every [`LayerKind`] must appear at least once.
    pub fn from_entries(entries: &[(LayerKind, Rgb)]) -> Result<Self, SceneError> {
        let find = |kind: LayerKind| {
            entries
                .iter()
                .rev()
                .find(|(k, _)| *k == kind)
                .map(|(_, c)| *c)
                .ok_or(SceneError::MissingColor(kind))
        };
        Ok(Self {
            star: find(LayerKind::Tree(ShapeCategory::Star))?,
            heart: find(LayerKind::Tree(ShapeCategory::Heart))?,
            snow: find(LayerKind::Tree(ShapeCategory::Snow))?,
            orb: find(LayerKind::Tree(ShapeCategory::Orb))?,
            ribbon: find(LayerKind::Ribbon)?,
        })
    }

    pub fn color(&self, kind: LayerKind) -> Rgb {
        *self.slot(kind)
    }

    pub fn set_color(&mut self, kind: LayerKind, color: Rgb) {
        *self.slot_mut(kind) = color;
    }

    fn slot(&self, kind: LayerKind) -> &Rgb {
        match kind {
            LayerKind::Tree(ShapeCategory::Star) => &self.star,
            LayerKind::Tree(ShapeCategory::Heart) => &self.heart,
            LayerKind::Tree(ShapeCategory::Snow) => &self.snow,
            LayerKind::Tree(ShapeCategory::Orb) => &self.orb,
            LayerKind::Ribbon => &self.ribbon,
        }
    }

    fn slot_mut(&mut self, kind: LayerKind) -> &mut Rgb {
        match kind {
            LayerKind::Tree(ShapeCategory::Star) => &mut self.star,
            LayerKind::Tree(ShapeCategory::Heart) => &mut self.heart,
            LayerKind::Tree(ShapeCategory::Snow) => &mut self.snow,
            LayerKind::Tree(ShapeCategory::Orb) => &mut self.orb,
            LayerKind::Ribbon => &mut self.ribbon,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        // Theme constants are valid literals.
        let rgb = |hex: &str| Rgb::from_hex(hex).unwrap_or(Rgb([1.0, 1.0, 1.0]));
        Self {
            star: rgb(GOLD),
            heart: rgb(ICE),
            snow: rgb(DIAMOND),
            orb: rgb(EMERALD),
            ribbon: rgb(CHAMPAGNE),
        }
    }
}
