use facetobj_mesh::Triangle;
use facetobj_model::Solid;
use truck_meshalgo::prelude::*;
use truck_polymesh::PolygonMesh;

/// Triangulates `solid` and returns the triangles of each B-rep face.
///
/// Quads and larger polygons are split into fans. Faces whose orientation
/// is reversed get their winding swapped so every triangle faces outward.
pub fn triangulate_faces(solid: &Solid, tol: f64) -> Vec<Vec<Triangle>> {
    let meshed = solid.triangulation(tol);
    meshed
        .face_iter()
        .filter_map(|face| {
            let mesh = face.surface()?;
            let mut triangles = face_triangles(&mesh);
            if !face.orientation() {
                for triangle in &mut triangles {
                    triangle.swap(1, 2);
                }
            }
            Some(triangles)
        })
        .collect()
}

fn face_triangles(mesh: &PolygonMesh) -> Vec<Triangle> {
    let positions = mesh.positions();
    let mut triangles: Vec<Triangle> = mesh
        .tri_faces()
        .iter()
        .map(|tri| [positions[tri[0].pos], positions[tri[1].pos], positions[tri[2].pos]])
        .collect();

    for quad in mesh.quad_faces() {
        triangles.push([positions[quad[0].pos], positions[quad[1].pos], positions[quad[2].pos]]);
        triangles.push([positions[quad[0].pos], positions[quad[2].pos], positions[quad[3].pos]]);
    }
    for polygon in mesh.faces().other_faces() {
        if polygon.len() < 3 {
            continue;
        }
        for idx in 1..(polygon.len() - 1) {
            triangles.push([
                positions[polygon[0].pos],
                positions[polygon[idx].pos],
                positions[polygon[idx + 1].pos],
            ]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetobj_model::{Point3, Vector3, box_solid};

    #[test]
    fn box_yields_six_faces_of_triangles() -> facetobj_model::Result<()> {
        let solid = box_solid(Point3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 3.0, 4.0))?;
        let faces = triangulate_faces(&solid, 0.01);
        assert_eq!(faces.len(), 6);
        for triangles in &faces {
            assert!(triangles.len() >= 2);
        }
        Ok(())
    }
}
