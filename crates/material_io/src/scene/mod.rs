//! Minimal scene surface used by material collection and remapping
//!
//! Only what the material pipeline needs from a scene: shape enumeration and
//! per-shape material bindings.

use slotmap::{new_key_type, SlotMap};

use crate::materials::MaterialHandle;

new_key_type! {
    /// Handle to a shape stored in a [`Scene`]
    pub struct ShapeHandle;
}

/// A scene entity with an optional material binding
#[derive(Debug, Clone)]
pub struct Shape {
    /// Display name
    pub name: String,
    material: Option<MaterialHandle>,
}

impl Shape {
    /// Create an unbound shape
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
        }
    }

    /// Bind a material (builder style)
    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.material = Some(material);
        self
    }

    /// The currently bound material, if any
    pub fn material(&self) -> Option<MaterialHandle> {
        self.material
    }

    /// Bind or unbind the shape's material
    pub fn set_material(&mut self, material: Option<MaterialHandle>) {
        self.material = material;
    }
}

/// Shape arena enumerated by the collector and the mapper
#[derive(Debug, Default, Clone)]
pub struct Scene {
    shapes: SlotMap<ShapeHandle, Shape>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape and return its handle
    pub fn add_shape(&mut self, shape: Shape) -> ShapeHandle {
        self.shapes.insert(shape)
    }

    /// Get a shape by handle
    pub fn shape(&self, handle: ShapeHandle) -> Option<&Shape> {
        self.shapes.get(handle)
    }

    /// Get a mutable shape by handle
    pub fn shape_mut(&mut self, handle: ShapeHandle) -> Option<&mut Shape> {
        self.shapes.get_mut(handle)
    }

    /// Iterate over all shapes
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeHandle, &Shape)> {
        self.shapes.iter()
    }

    /// Iterate over all shapes with mutable access
    pub fn shapes_mut(&mut self) -> impl Iterator<Item = (ShapeHandle, &mut Shape)> {
        self.shapes.iter_mut()
    }

    /// Number of shapes in the scene
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{MaterialGraph, MaterialNode};

    #[test]
    fn test_bind_and_rebind_material() {
        let mut graph = MaterialGraph::new();
        let red = graph.add_material(MaterialNode::new("red"));
        let blue = graph.add_material(MaterialNode::new("blue"));

        let mut scene = Scene::new();
        let handle = scene.add_shape(Shape::new("box").with_material(red));

        assert_eq!(scene.shape(handle).unwrap().material(), Some(red));

        scene.shape_mut(handle).unwrap().set_material(Some(blue));
        assert_eq!(scene.shape(handle).unwrap().material(), Some(blue));
    }
}
