use facetobj_base::{Guid, Material};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use truck_modeling::Solid;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Wall,
    Slab,
    Beam,
    Column,
    Door,
    Window,
    Roof,
    #[default]
    Generic,
}

/// Material assigned to every element of a category that has none itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMaterials(BTreeMap<Category, Material>);

impl CategoryMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, material: Material) -> Option<Material> {
        self.0.insert(category, material)
    }

    pub fn get(&self, category: Category) -> Option<Material> {
        self.0.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub guid: Guid,
    pub name: String,
    pub category: Category,
    pub material: Option<Material>,
    pub solids: Vec<Solid>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            guid: Guid::new(),
            name: name.into(),
            category,
            material: None,
            solids: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_solid(mut self, solid: Solid) -> Self {
        self.solids.push(solid);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this element only groups others.
    pub fn is_group(&self) -> bool {
        self.solids.is_empty() && !self.children.is_empty()
    }

    /// Depth-first, parents before children, siblings in document order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// The element's own material, else its category's, else [`Material::DEFAULT`].
pub fn resolve_material(element: &Element, categories: &CategoryMaterials) -> Material {
    element
        .material
        .or_else(|| categories.get(element.category))
        .unwrap_or(Material::DEFAULT)
}
