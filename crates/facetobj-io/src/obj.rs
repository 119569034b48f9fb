//! Wavefront OBJ + MTL output.
//!
//! Vertices are written as integer grid coordinates. Material names are
//! derived from the material value, so the `usemtl` lines in the mesh file
//! always match a `newmtl` block in the library.

use facetobj_mesh::{MeshAccumulator, Record};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// The material library written next to `path`.
pub fn materials_path(path: &Path) -> PathBuf {
    path.with_extension("mtl")
}

/// Writes one `newmtl` block per material in first-seen order.
pub fn write_mtl<W: Write>(mesh: &MeshAccumulator, writer: &mut W) -> io::Result<()> {
    for material in mesh.materials() {
        let [r, g, b] = material.color().unit_channels().map(format_float);
        writeln!(writer, "newmtl {}", material.name())?;
        writeln!(writer, "Ka {r} {g} {b}")?;
        writeln!(writer, "Kd {r} {g} {b}")?;
        writeln!(writer, "d {}", format_float(material.opacity()))?;
    }
    Ok(())
}

/// Writes vertices, then the record stream.
///
/// With `mtllib` set, the header references that library and material
/// switches become `usemtl` lines; without it they are dropped.
pub fn write_obj<W: Write>(
    mesh: &MeshAccumulator,
    mtllib: Option<&str>,
    writer: &mut W,
) -> io::Result<()> {
    if let Some(library) = mtllib {
        writeln!(writer, "mtllib {library}")?;
    }

    for vertex in mesh.vertices() {
        writeln!(writer, "v {vertex}")?;
    }

    for record in mesh.records() {
        match record {
            Record::UseMaterial(material) => {
                if mtllib.is_some() {
                    writeln!(writer, "usemtl {}", material.name())?;
                }
            }
            // OBJ indices are 1-based
            Record::Triangle([i, j, k]) => writeln!(writer, "f {} {} {}", i + 1, j + 1, k + 1)?,
        }
    }
    Ok(())
}

/// Writes `path` and, with colors enabled, its `.mtl` sibling.
///
/// The library is complete and closed before the mesh file is created.
/// Existing files are overwritten.
pub fn export_obj(mesh: &MeshAccumulator, path: impl AsRef<Path>, export_colors: bool) -> Result<()> {
    let path = path.as_ref();
    let mtl_path = materials_path(path);
    if export_colors && mtl_path == path {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "mesh file would be overwritten by its material library",
        });
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let library = if export_colors {
        write_file(&mtl_path, |writer| write_mtl(mesh, writer))?;
        debug!(path = %mtl_path.display(), materials = mesh.material_count(), "MTL written");
        let name = mtl_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidPath {
                path: path.to_path_buf(),
                reason: "no file name",
            })?;
        Some(name)
    } else {
        None
    };

    write_file(path, |writer| write_obj(mesh, library.as_deref(), writer))?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "OBJ written"
    );
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Shortest round-trip form, always with a decimal point.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use facetobj_mesh::{LengthUnit, Point3, Rgb};

    fn render(mesh: &MeshAccumulator, mtllib: Option<&str>) -> Result<String> {
        let mut buf = Vec::new();
        write_obj(mesh, mtllib, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn render_mtl(mesh: &MeshAccumulator) -> Result<String> {
        let mut buf = Vec::new();
        write_mtl(mesh, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn red_triangle() -> Result<MeshAccumulator> {
        let mut mesh = MeshAccumulator::new(LengthUnit::Foot);
        let triangle = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        mesh.emit_face(&[triangle], Rgb::new(255, 0, 0), 0)?;
        Ok(mesh)
    }

    #[test]
    fn obj_lists_grid_vertices_and_one_based_faces() -> Result<()> {
        let text = render(&red_triangle()?, Some("model.mtl"))?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "mtllib model.mtl",
                "v 0 0 0",
                "v 305 0 0",
                "v 0 305 0",
                "usemtl 00FF0000",
                "f 1 2 3",
            ]
        );
        Ok(())
    }

    #[test]
    fn obj_without_library_has_no_material_lines() -> Result<()> {
        let text = render(&red_triangle()?, None)?;
        assert!(!text.contains("mtllib"));
        assert!(!text.contains("usemtl"));
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 1);
        Ok(())
    }

    #[test]
    fn mtl_block_uses_unit_channels_and_opacity() -> Result<()> {
        let text = render_mtl(&red_triangle()?)?;
        assert_eq!(
            text,
            "newmtl 00FF0000\nKa 0.99609375 0.0 0.0\nKd 0.99609375 0.0 0.0\nd 1.0\n"
        );
        Ok(())
    }

    #[test]
    fn opacity_is_inverse_of_transparency() -> Result<()> {
        let mut mesh = MeshAccumulator::new(LengthUnit::Millimeter);
        let triangle = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        for transparency in [0, 30, 100] {
            mesh.emit_face(&[triangle], Rgb::MID_GRAY, transparency)?;
        }
        let text = render_mtl(&mesh)?;
        let opacities: Vec<&str> = text.lines().filter(|l| l.starts_with("d ")).collect();
        assert_eq!(opacities, ["d 1.0", "d 0.7", "d 0.0"]);
        Ok(())
    }

    #[test]
    fn empty_mesh_writes_header_only() -> Result<()> {
        let mesh = MeshAccumulator::new(LengthUnit::Foot);
        assert_eq!(render(&mesh, Some("empty.mtl"))?, "mtllib empty.mtl\n");
        assert!(render_mtl(&mesh)?.is_empty());
        Ok(())
    }

    #[test]
    fn format_float_keeps_a_decimal_point() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(0.49609375), "0.49609375");
    }
}
