use facetobj_base::{ExportOptions, Material};
use facetobj_mesh::{GridPoint, MeshAccumulator, Triangle};
use facetobj_model::{CategoryMaterials, Element, resolve_material};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::obj::export_obj;
use crate::tessellate::triangulate_faces;
use crate::Result;

/// Point-in-time counts of an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub elements: usize,
    pub solids: usize,
    pub faces: usize,
    pub triangles: usize,
    pub vertices: usize,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements processed, {} solids, {} faces, {} triangles, {} vertices",
            self.elements, self.solids, self.faces, self.triangles, self.vertices
        )
    }
}

/// One export pass: feed elements or faces in, then write once.
pub struct ExportSession {
    options: ExportOptions,
    categories: CategoryMaterials,
    mesh: MeshAccumulator,
    elements: usize,
    solids: usize,
}

impl ExportSession {
    pub fn new(options: ExportOptions, categories: CategoryMaterials) -> Self {
        Self {
            mesh: MeshAccumulator::new(options.unit),
            options,
            categories,
            elements: 0,
            solids: 0,
        }
    }

    pub fn mesh(&self) -> &MeshAccumulator {
        &self.mesh
    }

    /// Exports `root` and everything below it.
    pub fn add_element(&mut self, root: &Element) -> Result<()> {
        for element in root.walk() {
            self.elements += 1;
            let material = resolve_material(element, &self.categories);
            for solid in &element.solids {
                let faces = triangulate_faces(solid, self.options.tessellation_tolerance);
                if faces.is_empty() {
                    warn!(element = %element.name, "solid triangulated to no faces");
                    continue;
                }
                self.solids += 1;
                for triangles in &faces {
                    self.emit_face(triangles, material)?;
                }
            }
            debug!(
                element = %element.name,
                guid = %element.guid,
                group = element.is_group(),
                material = %material.name(),
                "element exported"
            );
        }
        Ok(())
    }

    /// Emits one face directly, bypassing the element model.
    ///
    /// Triangles that collapse on the output grid are skipped.
    pub fn emit_face(&mut self, triangles: &[Triangle], material: Material) -> Result<usize> {
        let scale = self.mesh.scale();
        let kept: Vec<Triangle> = triangles
            .iter()
            .filter(|triangle| !collapses(triangle, scale))
            .copied()
            .collect();
        if kept.len() < triangles.len() {
            debug!(
                skipped = triangles.len() - kept.len(),
                "dropped triangles below grid resolution"
            );
        }
        Ok(self
            .mesh
            .emit_face(&kept, material.color(), material.transparency())?)
    }

    pub fn summary(&self) -> ExportSummary {
        ExportSummary {
            elements: self.elements,
            solids: self.solids,
            faces: self.mesh.face_count(),
            triangles: self.mesh.triangle_count(),
            vertices: self.mesh.vertex_count(),
        }
    }

    /// Writes the mesh file at `path` (plus its material library) and ends
    /// the session.
    pub fn export(self, path: impl AsRef<Path>) -> Result<ExportSummary> {
        let path = path.as_ref();
        export_obj(&self.mesh, path, self.options.export_colors)?;
        let summary = self.summary();
        info!(path = %path.display(), %summary, "OBJ export complete");
        Ok(summary)
    }
}

fn collapses(triangle: &Triangle, scale: f64) -> bool {
    // unplaceable corners are left for the accumulator to reject
    match (*triangle).map(|point| GridPoint::quantize(point, scale)) {
        [Ok(a), Ok(b), Ok(c)] => a == b || b == c || a == c,
        _ => false,
    }
}
