//! Planet descriptors, packed colors and grid cell addressing.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::SceneError;

/// 0xRRGGBB color, serialized as a `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackedRgb(pub u32);

impl PackedRgb {
    pub fn parse(hex: &str) -> Result<Self, SceneError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(SceneError::InvalidColor(hex.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(PackedRgb)
            .map_err(|_| SceneError::InvalidColor(hex.to_string()))
    }

    pub fn channels(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }

    pub fn to_color(self) -> Color {
        let (r, g, b) = self.channels();
        Color::srgb_u8(r, g, b)
    }
}

impl fmt::Display for PackedRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00ff_ffff)
    }
}

impl TryFrom<String> for PackedRgb {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PackedRgb::parse(&value)
    }
}

impl From<PackedRgb> for String {
    fn from(value: PackedRgb) -> Self {
        value.to_string()
    }
}

/// Immutable description of the planet being shown. Compared by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetDescriptor {
    pub name: String,
    pub color: PackedRgb,
    pub radius: f32,
}

impl PlanetDescriptor {
    pub fn new(name: impl Into<String>, color: PackedRgb, radius: f32) -> Result<Self, SceneError> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(SceneError::InvalidRadius(radius));
        }
        Ok(Self {
            name: name.into(),
            color,
            radius,
        })
    }
}

impl Default for PlanetDescriptor {
    fn default() -> Self {
        Self {
            name: String::from("Mars"),
            color: PackedRgb(0xFF5733),
            radius: 0.53,
        }
    }
}

/// Case-insensitive catalog lookup.
pub fn find_planet(planets: &[PlanetDescriptor], name: &str) -> Result<PlanetDescriptor, SceneError> {
    planets
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| SceneError::UnknownPlanet(name.to_string()))
}

/// The planet currently selected by the host. Writing an equal value is a no-op for the scene.
#[derive(Resource, Debug, Clone, PartialEq, Deref, DerefMut)]
pub struct SelectedPlanet(pub PlanetDescriptor);

/// One patch of the `segments x segments` lat/lon discretization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub lat_index: u32,
    pub lon_index: u32,
}

impl GridCell {
    pub const fn new(lat_index: u32, lon_index: u32) -> Self {
        Self {
            lat_index,
            lon_index,
        }
    }

    /// Center cell of the grid, where the rover starts.
    pub const fn center(segments: u32) -> Self {
        Self::new(segments / 2, segments / 2)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {}, lon {}", self.lat_index, self.lon_index)
    }
}

// Radii are relative to Earth.
pub fn solar_system() -> Vec<PlanetDescriptor> {
    vec![
        PlanetDescriptor {
            name: String::from("Mercury"),
            color: PackedRgb(0xA9A9A9),
            radius: 0.38,
        },
        PlanetDescriptor {
            name: String::from("Venus"),
            color: PackedRgb(0xFFA500),
            radius: 0.95,
        },
        PlanetDescriptor {
            name: String::from("Earth"),
            color: PackedRgb(0x4682B4),
            radius: 1.0,
        },
        PlanetDescriptor::default(),
    ]
}
