//! Material graph domain model
//!
//! Materials are nodes in an arena-backed graph: a node's inputs may be
//! constants, texture references, or references to other material nodes, so
//! the same node can be shared by many dependents without any cyclic
//! ownership.

pub mod graph;
pub mod node;

pub use graph::{MaterialGraph, MaterialHandle, TextureHandle};
pub use node::{InputValue, MaterialInput, MaterialNode, UberLayers};
