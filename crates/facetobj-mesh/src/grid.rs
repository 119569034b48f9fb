use std::fmt;
use truck_base::cgmath64::Point3;

/// A vertex snapped to the integer output grid.
///
/// Equality and hashing are exact, so two source points share a vertex
/// exactly when they round to the same grid cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl GridPoint {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Scales `point` into grid units and rounds half up.
    pub fn quantize(point: Point3, scale: f64) -> Result<Self, SnapError> {
        Ok(Self {
            x: snap(point.x, scale)?,
            y: snap(point.y, scale)?,
            z: snap(point.z, scale)?,
        })
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Why a coordinate has no grid cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapError {
    NonFinite,
    /// Finite, but outside the `i64` grid.
    OutOfRange,
}

// 2^63; `i64::MIN` is exactly `-LIMIT`
const LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn snap(value: f64, scale: f64) -> Result<i64, SnapError> {
    let snapped = (value * scale + 0.5).floor();
    if !snapped.is_finite() {
        return Err(SnapError::NonFinite);
    }
    if !(-LIMIT..LIMIT).contains(&snapped) {
        return Err(SnapError::OutOfRange);
    }
    Ok(snapped as i64)
}
