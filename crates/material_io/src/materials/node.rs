//! Material node type and its typed inputs

use std::collections::HashMap;

use bitflags::bitflags;

use crate::materials::graph::{MaterialHandle, TextureHandle};
use crate::math::Vec4;

bitflags! {
    /// Enabled layers of the layered shading model
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UberLayers: u32 {
        /// Emissive layer
        const EMISSION = 0x1;
        /// Transparency layer
        const TRANSPARENCY = 0x2;
        /// Clearcoat layer
        const COATING = 0x4;
        /// Specular reflection layer
        const REFLECTION = 0x8;
        /// Diffuse layer
        const DIFFUSE = 0x10;
        /// Refraction layer
        const REFRACTION = 0x20;
        /// Subsurface scattering layer
        const SSS = 0x40;
        /// Shading normal override layer
        const SHADING_NORMAL = 0x80;
    }
}

/// Value of a single material input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputValue {
    /// Constant four-component value
    Float4(Vec4),
    /// Reference to a texture stored in the owning graph
    Texture(TextureHandle),
    /// Reference to another material node in the owning graph
    Material(MaterialHandle),
}

/// Named input slot on a material node
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialInput {
    /// Input name, unique within its node
    pub name: String,
    /// Current value of the input
    pub value: InputValue,
}

/// A single node of the material graph
///
/// Inputs keep their insertion order, which is also the order they are
/// written to a material document, so repeated saves of an unchanged graph
/// emit inputs in a stable order.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialNode {
    /// Display name; not required to be unique across a graph
    pub name: String,
    /// Whether the surface is treated as thin-walled
    pub thin: bool,
    /// Couple the refraction index of refraction to the reflection one
    pub link_refraction_ior: bool,
    /// Emit from both sides of the emissive layer
    pub emission_doublesided: bool,
    /// Use the multiscatter approximation for subsurface layers
    pub multiscatter: bool,
    /// Enabled shading layers
    pub layers: UberLayers,
    inputs: Vec<MaterialInput>,
}

impl MaterialNode {
    /// Create a node with the given name and a plain diffuse layer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thin: false,
            link_refraction_ior: false,
            emission_doublesided: false,
            multiscatter: false,
            layers: UberLayers::DIFFUSE,
            inputs: Vec::new(),
        }
    }

    /// Set the thin-walled flag (builder style)
    pub fn with_thin(mut self, thin: bool) -> Self {
        self.thin = thin;
        self
    }

    /// Set the enabled layers (builder style)
    pub fn with_layers(mut self, layers: UberLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Set an input (builder style)
    pub fn with_input(mut self, name: &str, value: InputValue) -> Self {
        self.set_input(name, value);
        self
    }

    /// Set the named input, replacing an existing value in place
    ///
    /// A replaced input keeps its original position; a new input is appended.
    pub fn set_input(&mut self, name: &str, value: InputValue) {
        if let Some(input) = self.inputs.iter_mut().find(|input| input.name == name) {
            input.value = value;
        } else {
            self.inputs.push(MaterialInput {
                name: name.to_string(),
                value,
            });
        }
    }

    /// Get the value of the named input, if set
    pub fn input(&self, name: &str) -> Option<&InputValue> {
        self.inputs
            .iter()
            .find(|input| input.name == name)
            .map(|input| &input.value)
    }

    /// All inputs in insertion order
    pub fn inputs(&self) -> &[MaterialInput] {
        &self.inputs
    }

    /// Handles of every material-typed input, in input order
    pub fn material_dependencies(&self) -> impl Iterator<Item = MaterialHandle> + '_ {
        self.inputs.iter().filter_map(|input| match input.value {
            InputValue::Material(handle) => Some(handle),
            _ => None,
        })
    }

    /// Rewrite graph references after the node moved between arenas
    pub(crate) fn remap_references(
        &mut self,
        materials: &HashMap<MaterialHandle, MaterialHandle>,
        textures: &HashMap<TextureHandle, TextureHandle>,
    ) {
        for input in &mut self.inputs {
            match &mut input.value {
                InputValue::Material(handle) => {
                    if let Some(&new) = materials.get(handle) {
                        *handle = new;
                    }
                }
                InputValue::Texture(handle) => {
                    if let Some(&new) = textures.get(handle) {
                        *handle = new;
                    }
                }
                InputValue::Float4(_) => {}
            }
        }
    }
}
