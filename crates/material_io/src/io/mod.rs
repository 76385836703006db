//! Material document save and load pipeline
//!
//! The pipeline persists a material graph as a RON document plus the texture
//! assets it references, and reconstructs the graph from such a document.
//! Material-to-material references are stored as document-local integer ids
//! assigned per save; loading builds every node first and wires deferred
//! references in a second pass, so references may point forward or backward
//! within a document.

pub mod collector;
pub mod loader;
pub mod mapper;

mod document;
mod texture_cache;
mod writer;

pub use collector::collect_scene_materials;
pub use loader::LoadedMaterials;
pub use mapper::{
    apply_material_mapping, load_material_mapping, save_identity_mapping, MaterialMapping,
};

use thiserror::Error;

use crate::assets::{AssetError, DiskImageIo, ImageIo};
use crate::materials::{MaterialGraph, MaterialHandle};
use crate::scene::Scene;

/// Errors raised by material document save and load
#[derive(Error, Debug)]
pub enum MaterialIoError {
    /// IO error reading or writing a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Document could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Declared material kind outside the supported set
    #[error("Unsupported material kind: {0}")]
    UnsupportedMaterialKind(String),

    /// Declared input type outside the supported set
    #[error("Unsupported input type: {0}")]
    UnsupportedInputType(String),

    /// Float4 value that is not four decimal numbers
    #[error("Malformed float4 value '{0}'")]
    MalformedFloat4(String),

    /// Material reference value that is not an integer id
    #[error("Malformed material reference '{0}'")]
    MalformedReference(String),

    /// Layer mask with bits outside the known set
    #[error("Material '{material}' has unknown layer bits {bits:#x}")]
    InvalidLayerMask {
        /// Name of the offending material element
        material: String,
        /// Declared layer mask
        bits: u32,
    },

    /// Two material elements declared the same id
    #[error("Duplicate material id {0} in document")]
    DuplicateMaterialId(u64),

    /// A material reference never matched a declared id
    #[error("Material reference to undeclared id {id} (input '{input}')")]
    UnresolvedReference {
        /// Id no element in the document declared
        id: u64,
        /// Input waiting on the reference
        input: String,
    },

    /// An input references a material outside the saved set
    #[error("Material '{material}' input '{input}' references a material outside the saved set")]
    UnboundReference {
        /// Material being written
        material: String,
        /// Offending input
        input: String,
    },

    /// A material handle not present in the graph
    #[error("Material handle is not present in the graph")]
    UnknownMaterial,

    /// A texture handle not present in the graph
    #[error("Texture handle is not present in the graph")]
    UnknownTexture,

    /// Texture asset could not be read or written
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Facade over material document save and load
///
/// Owns the image store used for texture assets. All session state lives in
/// per-call values, so one instance can serve any number of sequential saves
/// and loads without leaking state between them.
pub struct MaterialIo {
    image_io: Box<dyn ImageIo>,
}

impl Default for MaterialIo {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialIo {
    /// Create a facade backed by the disk image store
    pub fn new() -> Self {
        Self::with_image_io(Box::new(DiskImageIo))
    }

    /// Create a facade backed by a custom image store
    pub fn with_image_io(image_io: Box<dyn ImageIo>) -> Self {
        Self { image_io }
    }

    /// Save the given materials as a document at `path`
    ///
    /// Texture assets referenced by the materials are written next to the
    /// document, each distinct texture exactly once per call. Duplicate
    /// handles in `materials` are declared once. Every material reference
    /// must stay within the saved set, so the resulting document is
    /// self-contained.
    ///
    /// # Errors
    /// Fails when a handle is stale, an input references a material outside
    /// the set, a texture asset cannot be written, or the document itself
    /// cannot be serialized or written. A failed save may leave already
    /// written texture assets behind.
    pub fn save_materials(
        &self,
        path: &str,
        graph: &MaterialGraph,
        materials: &[MaterialHandle],
    ) -> Result<(), MaterialIoError> {
        writer::save_materials(path, graph, materials, self.image_io.as_ref())
    }

    /// Collect every material reachable from the scene's shapes and save the
    /// whole set as a document at `path`
    ///
    /// # Errors
    /// Same failure modes as [`Self::save_materials`].
    pub fn save_scene_materials(
        &self,
        path: &str,
        scene: &Scene,
        graph: &MaterialGraph,
    ) -> Result<(), MaterialIoError> {
        let materials = collect_scene_materials(scene, graph);
        self.save_materials(path, graph, &materials)
    }

    /// Load the material document at `path` into a fresh graph
    ///
    /// Texture assets are read relative to the document's directory, each
    /// distinct file exactly once per call. Material references may point
    /// forward or backward within the document; all of them are resolved by
    /// the time this returns.
    ///
    /// # Errors
    /// Fails on unreadable or malformed documents, an unsupported material
    /// kind or input type, malformed values, duplicate or undeclared ids,
    /// unknown layer bits, and texture read failures. There is no partial
    /// success: on error nothing of the document is kept.
    pub fn load_materials(&self, path: &str) -> Result<LoadedMaterials, MaterialIoError> {
        loader::load_materials(path, self.image_io.as_ref())
    }
}
