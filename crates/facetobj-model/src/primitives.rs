use truck_modeling::{Face, Point3, Rad, Solid, Vector3, Wire, builder};

use crate::{Error, Result};

/// Axis-aligned box with its minimum corner at `origin`.
pub fn box_solid(origin: Point3, size: Vector3) -> Result<Solid> {
    ensure_positive("box width", size.x)?;
    ensure_positive("box depth", size.y)?;
    ensure_positive("box height", size.z)?;

    let v = builder::vertex(origin);
    let e = builder::tsweep(&v, Vector3::unit_x() * size.x);
    let f = builder::tsweep(&e, Vector3::unit_y() * size.y);
    Ok(builder::tsweep(&f, Vector3::unit_z() * size.z))
}

/// Upright cylinder standing on the disk centered at `center`.
pub fn cylinder(center: Point3, radius: f64, height: f64) -> Result<Solid> {
    ensure_positive("cylinder radius", radius)?;
    ensure_positive("cylinder height", height)?;

    let base = disk(center, radius)?;
    Ok(builder::tsweep(&base, Vector3::unit_z() * height))
}

fn disk(center: Point3, radius: f64) -> Result<Face> {
    let start = builder::vertex(Point3::new(center.x + radius, center.y, center.z));
    let rim: Wire = builder::rsweep(&start, center, Vector3::unit_z(), Rad(std::f64::consts::TAU));
    Ok(builder::try_attach_plane(&[rim])?)
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(Error::InvalidParameter(format!("{name} must be > 0, got {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_six_faces() -> Result<()> {
        let solid = box_solid(Point3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0))?;
        assert_eq!(solid.face_iter().count(), 6);
        Ok(())
    }

    #[test]
    fn cylinder_has_faces() -> Result<()> {
        let solid = cylinder(Point3::new(0.0, 0.0, 0.0), 2.0, 10.0)?;
        assert!(solid.face_iter().count() >= 3);
        Ok(())
    }

    #[test]
    fn flat_box_is_rejected() {
        let err = box_solid(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 1.0));
        assert!(matches!(err, Err(Error::InvalidParameter(_))));
    }
}
