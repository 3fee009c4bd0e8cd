//! Material reference component

/// Thin component binding a node to a material asset by registry name
///
/// Carries no state of its own beyond the reference; the resolved
/// [`Material`](crate::render::Material) lives in the asset registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRef {
    material: String,
}

impl MaterialRef {
    /// Create a reference to the named material
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
        }
    }

    /// The referenced material name
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Point the reference at another material
    pub fn set_material(&mut self, material: impl Into<String>) {
        self.material = material.into();
    }
}
