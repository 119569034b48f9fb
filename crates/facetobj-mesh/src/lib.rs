//! Accumulates independently triangulated faces into one indexed mesh.
//!
//! Vertices are deduplicated on an integer grid, materials by value, and the
//! triangles are kept in emission order with a material switch recorded only
//! where the active material changes.

mod accumulator;
mod grid;

pub use accumulator::{MeshAccumulator, Record, Triangle};
pub use facetobj_base::{LengthUnit, Material, Rgb};
pub use grid::{GridPoint, SnapError};
pub use truck_base::cgmath64::Point3;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("triangle {triangle} has a non-finite coordinate")]
    NonFiniteCoordinate { triangle: usize },
    #[error("triangle {triangle} collapses to fewer than three grid points")]
    DegenerateTriangle { triangle: usize },
    #[error("triangle {triangle} has a coordinate beyond the output grid")]
    CoordinateOutOfRange { triangle: usize },
    #[error(transparent)]
    Base(#[from] facetobj_base::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
