//! Material document loading and deferred reference resolution
//!
//! Loading is two-phase. Parsing constructs every node and registers it under
//! its declared id before its inputs are read, binding material references
//! immediately when the target already exists and queueing a resolve request
//! when it does not. After the whole document is parsed, the queue is drained
//! in ascending referenced-id order and every remaining edge is wired up; an
//! id no element declared fails the load.

use std::collections::HashMap;

use crate::assets::ImageIo;
use crate::io::document::{self, InputElement, MaterialDocument, MaterialElement};
use crate::io::texture_cache::TextureCache;
use crate::io::writer::MATERIAL_KIND;
use crate::io::MaterialIoError;
use crate::materials::{
    InputValue, MaterialGraph, MaterialHandle, MaterialNode, TextureHandle, UberLayers,
};

/// Result of loading a material document
///
/// The graph owns everything the document declared; `materials` lists the
/// declared nodes in document order.
#[derive(Debug)]
pub struct LoadedMaterials {
    /// Graph owning the loaded nodes and the textures they reference
    pub graph: MaterialGraph,
    /// Declared materials in document order
    pub materials: Vec<MaterialHandle>,
}

/// Edge recorded during parsing whose target id was not yet declared
struct ResolveRequest {
    node: MaterialHandle,
    input: String,
    referenced: u64,
}

struct LoadSession<'a> {
    image_io: &'a dyn ImageIo,
    base_dir: &'a str,
    graph: MaterialGraph,
    nodes_by_id: HashMap<u64, MaterialHandle>,
    textures: TextureCache,
    pending: Vec<ResolveRequest>,
}

pub(crate) fn load_materials(
    path: &str,
    image_io: &dyn ImageIo,
) -> Result<LoadedMaterials, MaterialIoError> {
    let document: MaterialDocument = document::read_document(path)?;

    let mut session = LoadSession {
        image_io,
        base_dir: document::base_dir(path),
        graph: MaterialGraph::new(),
        nodes_by_id: HashMap::new(),
        textures: TextureCache::new(),
        pending: Vec::new(),
    };

    let mut materials = Vec::with_capacity(document.materials.len());
    for element in &document.materials {
        materials.push(session.load_material(element)?);
    }

    session.resolve_pending()?;

    log::info!("Loaded {} material(s) from {path}", materials.len());

    Ok(LoadedMaterials {
        graph: session.graph,
        materials,
    })
}

impl LoadSession<'_> {
    fn load_material(
        &mut self,
        element: &MaterialElement,
    ) -> Result<MaterialHandle, MaterialIoError> {
        if element.kind != MATERIAL_KIND {
            return Err(MaterialIoError::UnsupportedMaterialKind(
                element.kind.clone(),
            ));
        }

        let layers = UberLayers::from_bits(element.layers).ok_or_else(|| {
            MaterialIoError::InvalidLayerMask {
                material: element.name.clone(),
                bits: element.layers,
            }
        })?;

        let mut node = MaterialNode::new(element.name.clone());
        node.thin = element.thin;
        node.link_refraction_ior = element.refraction_link_ior;
        node.emission_doublesided = element.emission_doublesided;
        node.multiscatter = element.sss_multyscatter;
        node.layers = layers;

        // Register under the declared id before the inputs are parsed, so
        // elements later in the document can reference this node and this
        // node can reference earlier ones
        let handle = self.graph.add_material(node);
        if self.nodes_by_id.insert(element.id, handle).is_some() {
            return Err(MaterialIoError::DuplicateMaterialId(element.id));
        }

        for input in &element.inputs {
            self.load_input(handle, input)?;
        }

        Ok(handle)
    }

    fn load_input(
        &mut self,
        handle: MaterialHandle,
        element: &InputElement,
    ) -> Result<(), MaterialIoError> {
        let value = match element.kind.as_str() {
            "float4" => InputValue::Float4(document::parse_float4(&element.value)?),
            "texture" => InputValue::Texture(self.load_texture(&element.value)?),
            "material" => {
                let referenced: u64 = element
                    .value
                    .parse()
                    .map_err(|_| MaterialIoError::MalformedReference(element.value.clone()))?;

                if let Some(&target) = self.nodes_by_id.get(&referenced) {
                    InputValue::Material(target)
                } else {
                    // Keep the input's position now; the real handle is
                    // bound once the whole document is parsed
                    self.pending.push(ResolveRequest {
                        node: handle,
                        input: element.name.clone(),
                        referenced,
                    });
                    InputValue::Material(MaterialHandle::default())
                }
            }
            other => {
                return Err(MaterialIoError::UnsupportedInputType(other.to_string()));
            }
        };

        if let Some(node) = self.graph.material_mut(handle) {
            node.set_input(&element.name, value);
        }

        Ok(())
    }

    /// Return the texture for a document file name, loading it on first use
    ///
    /// Keyed by file name, so inputs with different names referencing the
    /// same file share one texture.
    fn load_texture(&mut self, file_name: &str) -> Result<TextureHandle, MaterialIoError> {
        if let Some(handle) = self.textures.handle_for(file_name) {
            return Ok(handle);
        }

        let texture = self
            .image_io
            .load_image(&format!("{}{file_name}", self.base_dir))?;
        let handle = self.graph.add_texture(texture);
        self.textures.insert(handle, file_name);

        Ok(handle)
    }

    fn resolve_pending(&mut self) -> Result<(), MaterialIoError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        // Deterministic fixup order; requests with equal ids keep arrival
        // order and all of them bind
        self.pending.sort_by_key(|request| request.referenced);

        for request in &self.pending {
            let Some(&target) = self.nodes_by_id.get(&request.referenced) else {
                return Err(MaterialIoError::UnresolvedReference {
                    id: request.referenced,
                    input: request.input.clone(),
                });
            };

            if let Some(node) = self.graph.material_mut(request.node) {
                node.set_input(&request.input, InputValue::Material(target));
            }
        }

        log::debug!(
            "Resolved {} deferred material reference(s)",
            self.pending.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{DiskImageIo, ImageIo, Texture};
    use crate::math::Vec4;

    fn write_fixture(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("materials.ron");
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn load(path: &str) -> Result<LoadedMaterials, MaterialIoError> {
        load_materials(path, &DiskImageIo)
    }

    const PLAIN_FLAGS: &str =
        "refraction_link_ior: false, emission_doublesided: false, sss_multyscatter: false";

    #[test]
    fn test_forward_reference_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "top", id: 7, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: [
                            (name: "base", type: "material", value: "3"),
                        ]),
                        (name: "bottom", id: 3, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: []),
                    ],
                )"#
            ),
        );

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.materials.len(), 2);

        let top = loaded.graph.material(loaded.materials[0]).unwrap();
        assert_eq!(
            top.input("base"),
            Some(&InputValue::Material(loaded.materials[1]))
        );
    }

    #[test]
    fn test_backward_reference_binds_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "bottom", id: 0, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: []),
                        (name: "top", id: 1, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: [
                            (name: "base", type: "material", value: "0"),
                        ]),
                    ],
                )"#
            ),
        );

        let loaded = load(&path).unwrap();
        let top = loaded.graph.material(loaded.materials[1]).unwrap();
        assert_eq!(
            top.input("base"),
            Some(&InputValue::Material(loaded.materials[0]))
        );
    }

    #[test]
    fn test_undeclared_reference_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "lonely", id: 0, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: [
                            (name: "base", type: "material", value: "42"),
                        ]),
                    ],
                )"#
            ),
        );

        let result = load(&path);
        assert!(matches!(
            result,
            Err(MaterialIoError::UnresolvedReference { id: 42, .. })
        ));
    }

    #[test]
    fn test_duplicate_id_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "a", id: 5, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: []),
                        (name: "b", id: 5, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: []),
                    ],
                )"#
            ),
        );

        assert!(matches!(
            load(&path),
            Err(MaterialIoError::DuplicateMaterialId(5))
        ));
    }

    #[test]
    fn test_unsupported_material_kind_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "old", id: 0, type: "blend", {PLAIN_FLAGS}, layers: 16, inputs: []),
                    ],
                )"#
            ),
        );

        assert!(matches!(
            load(&path),
            Err(MaterialIoError::UnsupportedMaterialKind(kind)) if kind == "blend"
        ));
    }

    #[test]
    fn test_unsupported_input_type_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "m", id: 0, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: [
                            (name: "weird", type: "float3", value: "1 2 3"),
                        ]),
                    ],
                )"#
            ),
        );

        assert!(matches!(
            load(&path),
            Err(MaterialIoError::UnsupportedInputType(kind)) if kind == "float3"
        ));
    }

    #[test]
    fn test_unknown_layer_bits_fail_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "m", id: 0, type: "uberv2", {PLAIN_FLAGS}, layers: 4096, inputs: []),
                    ],
                )"#
            ),
        );

        assert!(matches!(
            load(&path),
            Err(MaterialIoError::InvalidLayerMask { bits: 4096, .. })
        ));
    }

    #[test]
    fn test_missing_attribute_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        // No layers attribute
        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "m", id: 0, type: "uberv2", {PLAIN_FLAGS}, inputs: []),
                    ],
                )"#
            ),
        );

        let result = load(&path);
        let Err(MaterialIoError::Parse(message)) = result else {
            panic!("expected a parse error");
        };
        assert!(message.contains("layers"));
    }

    #[test]
    fn test_float4_and_flags_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            r#"(
                materials: [
                    (
                        name: "glass",
                        id: 0,
                        type: "uberv2",
                        thin: true,
                        refraction_link_ior: true,
                        emission_doublesided: false,
                        sss_multyscatter: true,
                        layers: 40,
                        inputs: [
                            (name: "uberv2.refraction.ior", type: "float4", value: "1.5 0 0 0"),
                        ],
                    ),
                ],
            )"#,
        );

        let loaded = load(&path).unwrap();
        let glass = loaded.graph.material(loaded.materials[0]).unwrap();

        assert!(glass.thin);
        assert!(glass.link_refraction_ior);
        assert!(!glass.emission_doublesided);
        assert!(glass.multiscatter);
        assert_eq!(
            glass.layers,
            UberLayers::REFLECTION | UberLayers::REFRACTION
        );
        assert_eq!(
            glass.input("uberv2.refraction.ior"),
            Some(&InputValue::Float4(Vec4::new(1.5, 0.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn test_texture_cache_keyed_by_file_name() {
        let dir = tempfile::tempdir().unwrap();

        let asset_path = dir.path().join("shared.png");
        DiskImageIo
            .save_image(
                asset_path.to_str().unwrap(),
                &Texture::solid_color(2, 2, [9, 9, 9, 255]),
            )
            .unwrap();

        let path = write_fixture(
            &dir,
            &format!(
                r#"(
                    materials: [
                        (name: "m", id: 0, type: "uberv2", {PLAIN_FLAGS}, layers: 16, inputs: [
                            (name: "albedo", type: "texture", value: "shared.png"),
                            (name: "bump", type: "texture", value: "shared.png"),
                        ]),
                    ],
                )"#
            ),
        );

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.graph.texture_count(), 1);

        let m = loaded.graph.material(loaded.materials[0]).unwrap();
        assert_eq!(m.input("albedo"), m.input("bump"));
    }
}
