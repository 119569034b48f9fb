use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Chordal tolerance used when triangulating solids, in source units.
pub const DEFAULT_TESSELLATION_TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Guid(Uuid);

impl Guid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length unit of the coordinates handed to the exporter.
///
/// Output vertices always live on an integer millimeter grid.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "ft", alias = "foot")]
    Foot,
    #[serde(rename = "in", alias = "inch")]
    Inch,
    #[serde(rename = "m", alias = "meter")]
    Meter,
    #[serde(rename = "mm", alias = "millimeter")]
    Millimeter,
}

impl LengthUnit {
    /// Grid units (millimeters) per source unit.
    pub const fn grid_scale(self) -> f64 {
        match self {
            Self::Foot => 25.4 * 12.0,
            Self::Inch => 25.4,
            Self::Meter => 1000.0,
            Self::Millimeter => 1.0,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Foot => "ft",
            Self::Inch => "in",
            Self::Meter => "m",
            Self::Millimeter => "mm",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "ft" | "foot" | "feet" => Ok(Self::Foot),
            "in" | "inch" | "inches" => Ok(Self::Inch),
            "m" | "meter" | "meters" => Ok(Self::Meter),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeter),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub unit: LengthUnit,
    /// Write the `.mtl` library and `usemtl` directives.
    pub export_colors: bool,
    pub tessellation_tolerance: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            unit: LengthUnit::Foot,
            export_colors: true,
            tessellation_tolerance: DEFAULT_TESSELLATION_TOLERANCE,
        }
    }
}

/// 24-bit color, one byte per channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const MID_GRAY: Self = Self::new(127, 127, 127);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels packed as `0xRRGGBB`.
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channels mapped into `[0, 1)` by dividing by 256.
    pub fn unit_channels(self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| f64::from(c) / 256.0)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        [color.r, color.g, color.b]
    }
}

/// Largest accepted transparency; 0 is opaque.
pub const MAX_TRANSPARENCY: u8 = 100;

/// A color with a transparency in `0..=100`.
///
/// Two materials are the same material exactly when both fields are equal,
/// which makes this the deduplication key of the material library.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MaterialFields")]
pub struct Material {
    color: Rgb,
    transparency: u8,
}

#[derive(Deserialize)]
struct MaterialFields {
    color: Rgb,
    #[serde(default)]
    transparency: u8,
}

impl TryFrom<MaterialFields> for Material {
    type Error = Error;

    fn try_from(fields: MaterialFields) -> Result<Self> {
        Self::new(fields.color, fields.transparency)
    }
}

impl Material {
    /// Fallback for elements with no material anywhere up the chain.
    pub const DEFAULT: Self = Self {
        color: Rgb::MID_GRAY,
        transparency: 0,
    };

    pub fn new(color: Rgb, transparency: u8) -> Result<Self> {
        if transparency > MAX_TRANSPARENCY {
            return Err(Error::TransparencyOutOfRange(transparency));
        }
        Ok(Self {
            color,
            transparency,
        })
    }

    pub const fn opaque(color: Rgb) -> Self {
        Self {
            color,
            transparency: 0,
        }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    pub const fn transparency(&self) -> u8 {
        self.transparency
    }

    /// Transparency in bits 24..32, color in bits 0..24.
    pub const fn packed(&self) -> u32 {
        ((self.transparency as u32) << 24) | self.color.packed()
    }

    /// Stable library name: two hex digits of transparency, six of color.
    pub fn name(&self) -> String {
        format!("{:02X}{:06X}", self.transparency, self.color.packed())
    }

    /// Output convention: 1.0 is fully opaque, 0.0 fully transparent.
    pub fn opacity(&self) -> f64 {
        f64::from(MAX_TRANSPARENCY - self.transparency) / 100.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("transparency {0} is outside 0..=100")]
    TransparencyOutOfRange(u8),
    #[error("unknown length unit `{0}`")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_name_is_transparency_then_color() -> Result<()> {
        let red = Material::new(Rgb::new(255, 0, 0), 0)?;
        assert_eq!(red.name(), "00FF0000");

        let glass = Material::new(Rgb::new(0x12, 0x34, 0x56), 30)?;
        assert_eq!(glass.name(), "1E123456");
        assert_eq!(glass.packed(), 0x1E12_3456);
        Ok(())
    }

    #[test]
    fn opacity_inverts_transparency() -> Result<()> {
        let color = Rgb::MID_GRAY;
        assert_eq!(Material::new(color, 0)?.opacity(), 1.0);
        assert_eq!(Material::new(color, 100)?.opacity(), 0.0);
        assert!((Material::new(color, 30)?.opacity() - 0.7).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn transparency_above_hundred_is_rejected() {
        let err = Material::new(Rgb::MID_GRAY, 101).unwrap_err();
        assert!(matches!(err, Error::TransparencyOutOfRange(101)));
    }

    #[test]
    fn unit_parses_symbols() -> Result<()> {
        assert_eq!("ft".parse::<LengthUnit>()?, LengthUnit::Foot);
        assert_eq!("MM".parse::<LengthUnit>()?, LengthUnit::Millimeter);
        assert!("parsec".parse::<LengthUnit>().is_err());
        assert!((LengthUnit::Foot.grid_scale() - 304.8).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn material_deserialize_validates() {
        let ok: std::result::Result<Material, _> =
            serde_json::from_str(r#"{"color":[10,20,30],"transparency":50}"#);
        assert!(ok.is_ok());
        let bad: std::result::Result<Material, _> =
            serde_json::from_str(r#"{"color":[10,20,30],"transparency":150}"#);
        assert!(bad.is_err());
    }
}
