//! Math types shared across the material system
//!
//! Thin aliases over nalgebra so the rest of the crate never names the
//! underlying generic types.

pub use nalgebra::{Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type, the payload of constant material inputs
pub type Vec4 = Vector4<f32>;
