//! Material document emission
//!
//! Saving runs two passes: every node gets its document identity first, then
//! elements are emitted, so a reference to a node that lands later in the
//! document already has an id to point at.

use std::collections::HashMap;

use slotmap::Key;

use crate::assets::ImageIo;
use crate::io::document::{self, InputElement, MaterialDocument, MaterialElement};
use crate::io::texture_cache::TextureCache;
use crate::io::MaterialIoError;
use crate::materials::{InputValue, MaterialGraph, MaterialHandle, MaterialInput, MaterialNode, TextureHandle};

/// Wire name of the only supported material kind
pub(crate) const MATERIAL_KIND: &str = "uberv2";

/// Per-save state: identity assignments and the textures already written
struct SaveSession<'a> {
    graph: &'a MaterialGraph,
    image_io: &'a dyn ImageIo,
    base_dir: &'a str,
    ids: HashMap<MaterialHandle, u64>,
    textures: TextureCache,
    textures_written: usize,
}

pub(crate) fn save_materials(
    path: &str,
    graph: &MaterialGraph,
    materials: &[MaterialHandle],
    image_io: &dyn ImageIo,
) -> Result<(), MaterialIoError> {
    let mut session = SaveSession {
        graph,
        image_io,
        base_dir: document::base_dir(path),
        ids: HashMap::new(),
        textures: TextureCache::new(),
        textures_written: 0,
    };

    // First pass: assign document identities in emission order, dropping
    // duplicate handles so each node is declared once
    let mut ordered = Vec::new();
    let mut next_id = 0_u64;
    for &handle in materials {
        if session.ids.contains_key(&handle) {
            continue;
        }
        session.ids.insert(handle, next_id);
        next_id += 1;
        ordered.push(handle);
    }

    let mut elements = Vec::with_capacity(ordered.len());
    for handle in ordered {
        let node = graph
            .material(handle)
            .ok_or(MaterialIoError::UnknownMaterial)?;
        elements.push(session.write_material(handle, node)?);
    }

    let material_count = elements.len();
    document::write_document(path, &MaterialDocument { materials: elements })?;

    log::info!(
        "Saved {material_count} material(s) and {} texture asset(s) to {path}",
        session.textures_written
    );

    Ok(())
}

impl SaveSession<'_> {
    fn write_material(
        &mut self,
        handle: MaterialHandle,
        node: &MaterialNode,
    ) -> Result<MaterialElement, MaterialIoError> {
        let mut inputs = Vec::with_capacity(node.inputs().len());
        for input in node.inputs() {
            inputs.push(self.write_input(node, input)?);
        }

        Ok(MaterialElement {
            name: node.name.clone(),
            id: self.ids[&handle],
            kind: MATERIAL_KIND.to_string(),
            thin: node.thin,
            refraction_link_ior: node.link_refraction_ior,
            emission_doublesided: node.emission_doublesided,
            sss_multyscatter: node.multiscatter,
            layers: node.layers.bits(),
            inputs,
        })
    }

    fn write_input(
        &mut self,
        node: &MaterialNode,
        input: &MaterialInput,
    ) -> Result<InputElement, MaterialIoError> {
        let (kind, value) = match &input.value {
            InputValue::Float4(value) => ("float4", document::format_float4(value)),
            InputValue::Texture(handle) => ("texture", self.write_texture(*handle)?),
            InputValue::Material(handle) => {
                // The document must stay self-contained: a reference outside
                // the saved set could never resolve on load
                let id = self.ids.get(handle).ok_or_else(|| {
                    MaterialIoError::UnboundReference {
                        material: node.name.clone(),
                        input: input.name.clone(),
                    }
                })?;
                ("material", id.to_string())
            }
        };

        Ok(InputElement {
            name: input.name.clone(),
            kind: kind.to_string(),
            value,
        })
    }

    /// Emit the file name for a texture input, saving the asset on first use
    fn write_texture(&mut self, handle: TextureHandle) -> Result<String, MaterialIoError> {
        if let Some(name) = self.textures.name_for(handle) {
            return Ok(name.to_string());
        }

        let texture = self
            .graph
            .texture(handle)
            .ok_or(MaterialIoError::UnknownTexture)?;

        let name = format!("{}.png", handle.data().as_ffi());
        self.image_io
            .save_image(&format!("{}{name}", self.base_dir), texture)?;
        self.textures.insert(handle, &name);
        self.textures_written += 1;

        log::debug!("Wrote texture asset {name}");

        Ok(name)
    }
}
