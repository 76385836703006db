//! Arena storage for material nodes and their textures
//!
//! Handles are slotmap keys, so a node reached through several paths is the
//! same node, shared structure survives save and load, and nothing needs
//! reference counting.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::assets::Texture;
use crate::materials::node::MaterialNode;

new_key_type! {
    /// Handle to a material node stored in a [`MaterialGraph`]
    pub struct MaterialHandle;

    /// Handle to a texture stored in a [`MaterialGraph`]
    pub struct TextureHandle;
}

/// Arena holding material nodes and the textures they reference
#[derive(Debug, Default, Clone)]
pub struct MaterialGraph {
    nodes: SlotMap<MaterialHandle, MaterialNode>,
    textures: SlotMap<TextureHandle, Texture>,
}

impl MaterialGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a material node and return its handle
    pub fn add_material(&mut self, node: MaterialNode) -> MaterialHandle {
        self.nodes.insert(node)
    }

    /// Insert a texture and return its handle
    pub fn add_texture(&mut self, texture: Texture) -> TextureHandle {
        self.textures.insert(texture)
    }

    /// Get a material node by handle
    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialNode> {
        self.nodes.get(handle)
    }

    /// Get a mutable material node by handle
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut MaterialNode> {
        self.nodes.get_mut(handle)
    }

    /// Get a texture by handle
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle)
    }

    /// Iterate over all material nodes
    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &MaterialNode)> {
        self.nodes.iter()
    }

    /// Iterate over all textures
    pub fn textures(&self) -> impl Iterator<Item = (TextureHandle, &Texture)> {
        self.textures.iter()
    }

    /// Number of material nodes in the graph
    pub fn material_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of textures in the graph
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Absorb another graph into this one
    ///
    /// Every node and texture of `other` is moved into this arena, and the
    /// references inside the moved nodes are rewritten to the new handles.
    /// Returns the material handle translation for the moved nodes.
    pub fn merge(&mut self, other: MaterialGraph) -> HashMap<MaterialHandle, MaterialHandle> {
        let mut texture_map = HashMap::new();
        for (old, texture) in other.textures {
            texture_map.insert(old, self.textures.insert(texture));
        }

        let mut node_map = HashMap::new();
        let mut moved = Vec::new();
        for (old, node) in other.nodes {
            let new = self.nodes.insert(node);
            node_map.insert(old, new);
            moved.push(new);
        }

        // The moved nodes still reference the source arena; rewrite them
        for handle in moved {
            if let Some(node) = self.nodes.get_mut(handle) {
                node.remap_references(&node_map, &texture_map);
            }
        }

        node_map
    }
}
