//! # Material IO
//!
//! Serialization for layered material graphs, with texture deduplication and
//! scene binding support for physically based renderers.
//!
//! ## Features
//!
//! - **Arena Graph Storage**: Materials and textures live in generational arenas
//! - **Document Round Trips**: Human-readable RON documents with session-scoped ids
//! - **Forward References**: Two-phase loading resolves references in any declaration order
//! - **Texture Deduplication**: Shared images are written and loaded once per call
//! - **Scene Binding**: Name-based mappings rebind shape materials in place
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use material_io::prelude::*;
//!
//! fn main() -> Result<(), MaterialIoError> {
//!     let mut graph = MaterialGraph::new();
//!     let gold = graph.add_material(
//!         MaterialNode::new("gold")
//!             .with_layers(UberLayers::REFLECTION)
//!             .with_input(
//!                 "uberv2.reflection.color",
//!                 InputValue::Float4(Vec4::new(1.0, 0.76, 0.33, 1.0)),
//!             ),
//!     );
//!
//!     let mut scene = Scene::new();
//!     scene.add_shape(Shape::new("ring").with_material(gold));
//!
//!     let io = MaterialIo::new();
//!     io.save_scene_materials("assets/ring_materials.ron", &scene, &graph)?;
//!
//!     let loaded = io.load_materials("assets/ring_materials.ron")?;
//!     println!("loaded {} materials", loaded.materials.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod io;
pub mod materials;
pub mod math;
pub mod scene;

pub use io::{MaterialIo, MaterialIoError};

/// Common imports for material pipeline users
pub mod prelude {
    pub use crate::{
        MaterialIo, MaterialIoError,
        assets::{AssetError, DiskImageIo, ImageIo, Texture},
        io::{
            apply_material_mapping, collect_scene_materials, load_material_mapping,
            save_identity_mapping, LoadedMaterials, MaterialMapping,
        },
        materials::{
            InputValue, MaterialGraph, MaterialHandle, MaterialNode, TextureHandle, UberLayers,
        },
        math::Vec4,
        scene::{Scene, Shape, ShapeHandle},
    };
}
