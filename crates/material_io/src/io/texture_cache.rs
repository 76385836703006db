//! Session-scoped texture name cache
//!
//! One direction maps texture handles to the file names already written this
//! session, the other maps file names to the handles already loaded. The
//! association is one-to-one within a session: no texture is persisted or
//! read twice, and no two textures share a file name.

use std::collections::HashMap;

use crate::materials::TextureHandle;

/// Bidirectional handle-to-file-name cache for one save or load session
#[derive(Debug, Default)]
pub(crate) struct TextureCache {
    names: HashMap<TextureHandle, String>,
    handles: HashMap<String, TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name already associated with `handle` this session
    pub fn name_for(&self, handle: TextureHandle) -> Option<&str> {
        self.names.get(&handle).map(String::as_str)
    }

    /// Handle already associated with `name` this session
    pub fn handle_for(&self, name: &str) -> Option<TextureHandle> {
        self.handles.get(name).copied()
    }

    /// Record a handle and file name association in both directions
    pub fn insert(&mut self, handle: TextureHandle, name: &str) {
        self.names.insert(handle, name.to_string());
        self.handles.insert(name.to_string(), handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Texture;
    use crate::materials::MaterialGraph;

    #[test]
    fn test_lookup_both_directions() {
        let mut graph = MaterialGraph::new();
        let handle = graph.add_texture(Texture::solid_color(1, 1, [0, 0, 0, 255]));

        let mut cache = TextureCache::new();
        assert!(cache.name_for(handle).is_none());
        assert!(cache.handle_for("wood.png").is_none());

        cache.insert(handle, "wood.png");
        assert_eq!(cache.name_for(handle), Some("wood.png"));
        assert_eq!(cache.handle_for("wood.png"), Some(handle));
    }
}
