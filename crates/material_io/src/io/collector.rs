//! Reachability walk over scene material bindings

use std::collections::HashSet;

use crate::materials::{MaterialGraph, MaterialHandle};
use crate::scene::Scene;

/// Collect every material reachable from the scene's shape bindings
///
/// Follows material-to-material dependency inputs with an explicit stack, so
/// traversal depth is bounded by graph size rather than call depth. Each
/// reachable material appears exactly once, in first-visit order; the order
/// only affects where elements land in a saved document.
pub fn collect_scene_materials(scene: &Scene, graph: &MaterialGraph) -> Vec<MaterialHandle> {
    let mut seen = HashSet::new();
    let mut collected = Vec::new();
    let mut stack = Vec::new();

    for (_, shape) in scene.shapes() {
        if let Some(material) = shape.material() {
            stack.push(material);
        }

        while let Some(handle) = stack.pop() {
            if !seen.insert(handle) {
                continue;
            }

            let Some(node) = graph.material(handle) else {
                log::warn!("Shape '{}' references a material not in the graph", shape.name);
                continue;
            };

            collected.push(handle);
            for dependency in node.material_dependencies() {
                stack.push(dependency);
            }
        }
    }

    collected
}
