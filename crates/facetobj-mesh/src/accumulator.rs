use std::collections::HashMap;

use facetobj_base::{LengthUnit, Material, Rgb};
use truck_base::cgmath64::Point3;

use crate::grid::{GridPoint, SnapError};
use crate::{Error, Result};

/// Three corners in source units, in construction order.
pub type Triangle = [Point3; 3];

/// One entry of the ordered output stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Record {
    /// Every following triangle uses this material.
    UseMaterial(Material),
    /// Zero-based indices into [`MeshAccumulator::vertices`].
    Triangle([usize; 3]),
}

/// Collects faces for a single export.
///
/// Tables only grow; indices handed out are never reassigned.
#[derive(Clone, Debug)]
pub struct MeshAccumulator {
    scale: f64,
    vertex_index: HashMap<GridPoint, usize>,
    vertices: Vec<GridPoint>,
    material_index: HashMap<Material, usize>,
    materials: Vec<Material>,
    records: Vec<Record>,
    active_material: Option<Material>,
    face_count: usize,
    triangle_count: usize,
}

impl MeshAccumulator {
    pub fn new(unit: LengthUnit) -> Self {
        Self {
            scale: unit.grid_scale(),
            vertex_index: HashMap::new(),
            vertices: Vec::new(),
            material_index: HashMap::new(),
            materials: Vec::new(),
            records: Vec::new(),
            active_material: None,
            face_count: 0,
            triangle_count: 0,
        }
    }

    /// Adds one face and returns how many triangles it contributed.
    ///
    /// The face is validated as a whole first; on error nothing is recorded.
    /// A face without triangles is counted but leaves the stream untouched.
    pub fn emit_face(
        &mut self,
        triangles: &[Triangle],
        color: Rgb,
        transparency: u8,
    ) -> Result<usize> {
        let material = Material::new(color, transparency)?;
        let snapped = self.quantize_face(triangles)?;

        if !snapped.is_empty() {
            self.activate(material);
        }
        for corners in snapped {
            let indices = corners.map(|point| self.vertex(point));
            self.records.push(Record::Triangle(indices));
        }

        self.face_count += 1;
        self.triangle_count += triangles.len();
        Ok(triangles.len())
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Grid units per source unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Unique vertices in first-seen order.
    pub fn vertices(&self) -> &[GridPoint] {
        &self.vertices
    }

    /// Unique materials in first-seen order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn quantize_face(&self, triangles: &[Triangle]) -> Result<Vec<[GridPoint; 3]>> {
        triangles
            .iter()
            .enumerate()
            .map(|(triangle, corners)| {
                let mut snapped = [GridPoint::new(0, 0, 0); 3];
                for (slot, point) in snapped.iter_mut().zip(corners) {
                    *slot = GridPoint::quantize(*point, self.scale).map_err(|err| match err {
                        SnapError::NonFinite => Error::NonFiniteCoordinate { triangle },
                        SnapError::OutOfRange => Error::CoordinateOutOfRange { triangle },
                    })?;
                }
                let [a, b, c] = snapped;
                if a == b || b == c || a == c {
                    return Err(Error::DegenerateTriangle { triangle });
                }
                Ok(snapped)
            })
            .collect()
    }

    fn activate(&mut self, material: Material) {
        if self.active_material == Some(material) {
            return;
        }
        if !self.material_index.contains_key(&material) {
            self.material_index.insert(material, self.materials.len());
            self.materials.push(material);
        }
        self.records.push(Record::UseMaterial(material));
        self.active_material = Some(material);
    }

    fn vertex(&mut self, point: GridPoint) -> usize {
        if let Some(&index) = self.vertex_index.get(&point) {
            return index;
        }
        let index = self.vertices.len();
        self.vertex_index.insert(point, index);
        self.vertices.push(point);
        index
    }
}
