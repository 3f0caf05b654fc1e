/// Name given to the material every loaded scene starts with.
pub const DEFAULT_MATERIAL_NAME: &str = "(Default)";

/// Phong-style material coefficients. Colors are RGBA.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    /// Ambient (Ka).
    pub ka: [f32; 4],
    /// Diffuse (Kd).
    pub kd: [f32; 4],
    /// Specular (Ks).
    pub ks: [f32; 4],
    /// Emissive (Ke).
    pub ke: [f32; 4],
    /// Shininess exponent (Ns), stored as read.
    pub kn: f32,
}

impl Material {
    /// Zeroed material, as created by `newmtl`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// White material used when a face references no (or an unknown) material.
    pub fn fallback() -> Self {
        Self {
            name: DEFAULT_MATERIAL_NAME.to_string(),
            ka: [1.0; 4],
            kd: [1.0; 4],
            ks: [1.0; 4],
            ke: [0.0, 0.0, 0.0, 1.0],
            kn: 128.0,
        }
    }
}
