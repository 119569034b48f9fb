//! Host-side document model: a tree of elements, each carrying solids and
//! an optional material, plus a JSON scene format that builds one.

mod element;
mod primitives;
mod scene;

pub use element::{Category, CategoryMaterials, Element, Walk, resolve_material};
pub use primitives::{box_solid, cylinder};
pub use scene::{Scene, SceneElement, Shape};
pub use truck_modeling::{Point3, Solid, Vector3};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("read scene {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse scene: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Modeling(#[from] truck_modeling::errors::Error),
    #[error(transparent)]
    Base(#[from] facetobj_base::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
