//! Height and surface material rules driven by feature tags.
//!
//! Every resolver is a pure function of the tags. Unknown or malformed values
//! fall through to a default; tags are external data and never raise errors.

use serde::Serialize;

use crate::color::Rgb;
use crate::tags::{TagValue, Tags};

/// Height of one storey in meters.
pub const LEVEL_HEIGHT: f64 = 3.0;

/// Height used when a building carries no height information.
pub const DEFAULT_HEIGHT: f64 = 3.0;

/// Colour of polygon outlines.
pub const OUTLINE_COLOR: u32 = 0x00_0f40;

/// Colour of line-string features.
pub const LINE_COLOR: u32 = 0x30_0f40;

/// Surface description handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "color", rename_all = "snake_case")]
pub enum Material {
    /// Rough, low-metalness concrete.
    Stone,
    /// Glossy reflective glass with a clear-coat layer.
    Glass,
    /// Matte surface of a tagged colour.
    Flat(Rgb),
    /// Fallback building surface.
    Neutral,
    /// Rough, barely reflective exposed rock.
    BareRock,
    /// Glossy, highly reflective water with a clear-coat layer.
    Water,
    /// Fallback natural surface.
    Vegetation,
    /// Unlit line colour.
    Line(Rgb),
}

impl Material {
    #[must_use]
    pub fn base_color(&self) -> Rgb {
        match self {
            Self::Stone => Rgb::from_hex(0x9e_9a94),
            Self::Glass => Rgb::from_hex(0x8f_b8cc),
            Self::Flat(color) | Self::Line(color) => *color,
            Self::Neutral => Rgb::from_hex(0xd9_d4cc),
            Self::BareRock => Rgb::from_hex(0x85_7a6e),
            Self::Water => Rgb::from_hex(0x2a_6496),
            Self::Vegetation => Rgb::from_hex(0x5a_a04a),
        }
    }

    #[must_use]
    pub fn roughness(&self) -> f32 {
        match self {
            Self::Stone => 0.9,
            Self::Glass => 0.05,
            Self::Flat(_) | Self::Line(_) => 1.0,
            Self::Neutral => 0.8,
            Self::BareRock => 0.95,
            Self::Water => 0.1,
            Self::Vegetation => 0.9,
        }
    }

    #[must_use]
    pub fn metalness(&self) -> f32 {
        match self {
            Self::Stone | Self::BareRock => 0.1,
            Self::Glass => 0.8,
            Self::Water => 0.2,
            Self::Flat(_) | Self::Line(_) | Self::Neutral | Self::Vegetation => 0.0,
        }
    }

    #[must_use]
    pub fn reflectivity(&self) -> f32 {
        match self {
            Self::Stone => 0.2,
            Self::Glass | Self::Water => 0.9,
            Self::BareRock => 0.1,
            Self::Flat(_) | Self::Neutral | Self::Vegetation => 0.5,
            Self::Line(_) => 0.0,
        }
    }

    /// Strength of the clear-coat layer, zero for single-layer surfaces.
    #[must_use]
    pub fn clearcoat(&self) -> f32 {
        match self {
            Self::Glass | Self::Water => 1.0,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn is_unlit(&self) -> bool {
        matches!(self, Self::Line(_))
    }

    #[must_use]
    pub fn outline() -> Self {
        Self::Line(Rgb::from_hex(OUTLINE_COLOR))
    }

    #[must_use]
    pub fn line() -> Self {
        Self::Line(Rgb::from_hex(LINE_COLOR))
    }
}

/// Extrusion range `(height, min_height)` of a building.
#[must_use]
pub fn resolve_building_height(tags: &Tags) -> (f64, f64) {
    let min_height = tags.min_height().unwrap_or(0.0);
    if let Some(height) = tags.height() {
        (height, min_height)
    } else if let Some(levels) = tags.building_levels() {
        (levels * LEVEL_HEIGHT, min_height)
    } else {
        (DEFAULT_HEIGHT, 0.0)
    }
}

#[must_use]
pub fn resolve_roof_material(tags: &Tags) -> Material {
    match tags.roof_material() {
        Some("concrete") => return Material::Stone,
        Some("glass") => return Material::Glass,
        _ => {}
    }
    match tags.roof_colour().map(|c| (c, Rgb::parse(c))) {
        Some((_, Some(color))) => Material::Flat(color),
        Some((raw, None)) => {
            tracing::debug!(roof_colour = raw, "unrecognized roof colour");
            Material::Neutral
        }
        None => Material::Neutral,
    }
}

#[must_use]
pub fn resolve_wall_material(tags: &Tags) -> Material {
    match tags.building_colour().map(|c| (c, Rgb::parse(c))) {
        Some((_, Some(color))) => Material::Flat(color),
        Some((raw, None)) => {
            tracing::debug!(building_colour = raw, "unrecognized building colour");
            Material::Neutral
        }
        None => Material::Neutral,
    }
}

#[must_use]
pub fn resolve_natural_material(tags: &Tags) -> Material {
    match tags.natural().and_then(TagValue::as_text) {
        Some("bare_rock") => Material::BareRock,
        Some("water") => Material::Water,
        other => {
            tracing::debug!(natural = ?other, "default natural surface");
            Material::Vegetation
        }
    }
}
