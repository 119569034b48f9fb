pub mod obj;
pub mod session;
pub mod tessellate;

pub use facetobj_base::DEFAULT_TESSELLATION_TOLERANCE;
pub use obj::{export_obj, materials_path, write_mtl, write_obj};
pub use session::{ExportSession, ExportSummary};
pub use tessellate::triangulate_faces;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid output path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },
    #[error(transparent)]
    Mesh(#[from] facetobj_mesh::Error),
    #[error(transparent)]
    Model(#[from] facetobj_model::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
