use facetobj_base::{LengthUnit, Material};
use serde::{Deserialize, Serialize};
use std::path::Path;
use truck_modeling::{Point3, Solid, Vector3};

use crate::element::{Category, CategoryMaterials, Element};
use crate::primitives::{box_solid, cylinder};
use crate::{Error, Result};

/// JSON description of a document.
///
/// ```json
/// {
///   "unit": "ft",
///   "categories": { "wall": { "color": [180, 90, 60] } },
///   "elements": [
///     { "name": "North wall", "category": "wall",
///       "shapes": [{ "kind": "box", "origin": [0, 0, 0], "size": [20, 1, 10] }] }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub unit: Option<LengthUnit>,
    #[serde(default)]
    pub categories: CategoryMaterials,
    #[serde(default)]
    pub elements: Vec<SceneElement>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneElement {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub material: Option<Material>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub children: Vec<SceneElement>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Box {
        origin: [f64; 3],
        size: [f64; 3],
    },
    Cylinder {
        center: [f64; 3],
        radius: f64,
        height: f64,
    },
}

impl Shape {
    pub fn build(&self) -> Result<Solid> {
        match *self {
            Shape::Box { origin, size } => box_solid(Point3::from(origin), Vector3::from(size)),
            Shape::Cylinder {
                center,
                radius,
                height,
            } => cylinder(Point3::from(center), radius, height),
        }
    }
}

impl Scene {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Builds the solids of every element, keeping the tree shape.
    pub fn build_elements(&self) -> Result<Vec<Element>> {
        self.elements.iter().map(SceneElement::build).collect()
    }
}

impl SceneElement {
    pub fn build(&self) -> Result<Element> {
        let mut element = Element::new(self.name.clone(), self.category);
        element.material = self.material;
        for shape in &self.shapes {
            let solid = shape.build().map_err(|err| match err {
                Error::InvalidParameter(message) => {
                    Error::InvalidParameter(format!("element `{}`: {message}", self.name))
                }
                other => other,
            })?;
            element.solids.push(solid);
        }
        for child in &self.children {
            element.children.push(child.build()?);
        }
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetobj_base::Rgb;

    const SCENE: &str = r#"{
        "unit": "mm",
        "categories": { "wall": { "color": [180, 90, 60] } },
        "elements": [
            { "name": "Level 1", "children": [
                { "name": "North wall", "category": "wall",
                  "shapes": [{ "kind": "box", "origin": [0, 0, 0], "size": [4000, 200, 3000] }] },
                { "name": "Pane", "category": "window",
                  "material": { "color": [200, 220, 255], "transparency": 70 },
                  "shapes": [{ "kind": "box", "origin": [500, 0, 900], "size": [800, 10, 1200] }] }
            ] },
            { "name": "Post", "category": "column",
              "shapes": [{ "kind": "cylinder", "center": [0, 0, 0], "radius": 150, "height": 3000 }] }
        ]
    }"#;

    #[test]
    fn parses_and_builds_tree() -> Result<()> {
        let scene = Scene::from_json(SCENE)?;
        assert_eq!(scene.unit, Some(LengthUnit::Millimeter));
        assert_eq!(
            scene.categories.get(Category::Wall),
            Some(Material::opaque(Rgb::new(180, 90, 60)))
        );

        let elements = scene.build_elements()?;
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].children.len(), 2);
        assert_eq!(elements[0].children[1].material.map(|m| m.transparency()), Some(70));
        assert_eq!(elements[1].solids.len(), 1);
        Ok(())
    }

    #[test]
    fn demo_scene_builds() -> Result<()> {
        let scene = Scene::from_json(include_str!("../../../demos/house.json"))?;
        assert_eq!(scene.unit, Some(LengthUnit::Foot));
        assert_eq!(scene.categories.len(), 3);
        let elements = scene.build_elements()?;
        let count: usize = elements.iter().map(|e| e.walk().count()).sum();
        assert_eq!(count, 7);
        Ok(())
    }

    #[test]
    fn bad_transparency_fails_to_parse() {
        let text = r#"{ "elements": [ { "name": "x",
            "material": { "color": [1, 2, 3], "transparency": 120 } } ] }"#;
        assert!(matches!(Scene::from_json(text), Err(Error::Parse(_))));
    }

    #[test]
    fn bad_shape_names_the_element() -> Result<()> {
        let text = r#"{ "elements": [ { "name": "Flat",
            "shapes": [{ "kind": "box", "origin": [0, 0, 0], "size": [1, 0, 1] }] } ] }"#;
        let scene = Scene::from_json(text)?;
        let err = scene.build_elements().unwrap_err();
        assert!(err.to_string().contains("Flat"));
        Ok(())
    }
}
