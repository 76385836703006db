//! Name-based remapping of scene material bindings
//!
//! A mapping table says "every shape using the material named X should use
//! the loaded material named Y instead". The identity scaffold writes such a
//! table mapping every bound material onto itself, ready to be hand-edited.

use std::collections::{HashMap, HashSet};

use crate::io::document::{self, MappingDocument, MappingElement};
use crate::io::loader::LoadedMaterials;
use crate::io::MaterialIoError;
use crate::materials::{MaterialGraph, MaterialHandle};
use crate::scene::Scene;

/// Name-to-name remap table; later inserts for the same key win
pub type MaterialMapping = HashMap<String, String>;

/// Rebind scene shapes onto loaded materials according to `mapping`
///
/// The loaded set is absorbed into `graph` first, so the new bindings live
/// beside the scene's existing materials. A shape is rebound when its current
/// material's name is a key of `mapping` and the mapped name matches a loaded
/// material (first declaration wins when names repeat). Shapes whose material
/// name is not in the table keep their binding; a mapped name matching no
/// loaded material is logged and skipped. Returns the number of rebound
/// shapes.
pub fn apply_material_mapping(
    scene: &mut Scene,
    graph: &mut MaterialGraph,
    loaded: LoadedMaterials,
    mapping: &MaterialMapping,
) -> usize {
    let LoadedMaterials {
        graph: loaded_graph,
        materials,
    } = loaded;
    let translation = graph.merge(loaded_graph);

    let mut by_name: HashMap<&str, MaterialHandle> = HashMap::new();
    for old in &materials {
        let Some(&new) = translation.get(old) else {
            continue;
        };
        let Some(node) = graph.material(new) else {
            continue;
        };
        by_name.entry(node.name.as_str()).or_insert(new);
    }

    let mut rebound = 0;
    for (_, shape) in scene.shapes_mut() {
        let Some(current) = shape.material() else {
            continue;
        };
        let Some(node) = graph.material(current) else {
            continue;
        };
        let Some(target_name) = mapping.get(&node.name) else {
            continue;
        };

        if let Some(&target) = by_name.get(target_name.as_str()) {
            shape.set_material(Some(target));
            rebound += 1;
        } else {
            log::warn!(
                "Mapping target '{target_name}' for material '{}' matches no loaded material",
                node.name
            );
        }
    }

    log::info!("Rebound {rebound} shape material binding(s)");

    rebound
}

/// Write a mapping scaffold with one identity entry per bound material
///
/// Materials are deduplicated by handle in first-seen shape order; each entry
/// maps the material's name onto itself.
///
/// # Errors
/// Returns an error when the document cannot be serialized or written.
pub fn save_identity_mapping(
    path: &str,
    scene: &Scene,
    graph: &MaterialGraph,
) -> Result<(), MaterialIoError> {
    let mut seen = HashSet::new();
    let mut mappings = Vec::new();

    for (_, shape) in scene.shapes() {
        let Some(handle) = shape.material() else {
            continue;
        };
        if !seen.insert(handle) {
            continue;
        }
        let Some(node) = graph.material(handle) else {
            log::warn!("Shape '{}' references a material not in the graph", shape.name);
            continue;
        };
        mappings.push(MappingElement {
            from: node.name.clone(),
            to: node.name.clone(),
        });
    }

    document::write_document(path, &MappingDocument { mappings })
}

/// Read a remap table from a mapping document
///
/// Entries later in the document win over earlier entries with the same
/// `from` name.
///
/// # Errors
/// Returns an error when the file cannot be read or parsed.
pub fn load_material_mapping(path: &str) -> Result<MaterialMapping, MaterialIoError> {
    let document: MappingDocument = document::read_document(path)?;

    let mut mapping = MaterialMapping::new();
    for element in document.mappings {
        mapping.insert(element.from, element.to);
    }

    Ok(mapping)
}
