//! Spring wire materials and material lookup.
//!
//! The optimizer reads material data through the [`MaterialStore`] trait.
//! A run resolves its material exactly once, before the evolutionary loop
//! starts, so the hot loop never performs a lookup.
//!
//! Units: moduli and stresses in MPa (N/mm²), density in g/cm³.

use crate::error::OptimizeError;
use std::collections::HashMap;

/// Mechanical properties of a spring wire material.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub name: String,
    /// Shear modulus G (MPa)
    pub shear_modulus: f64,
    /// Young's modulus E (MPa)
    pub elastic_modulus: f64,
    /// Density (g/cm³)
    pub density: f64,
    /// Allowable shear stress (MPa)
    pub allowable_stress: f64,
    /// Torsional endurance limit (MPa)
    pub endurance_limit: f64,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        shear_modulus: f64,
        elastic_modulus: f64,
        density: f64,
        allowable_stress: f64,
        endurance_limit: f64,
    ) -> Self {
        Self {
            name: name.into(),
            shear_modulus,
            elastic_modulus,
            density,
            allowable_stress,
            endurance_limit,
        }
    }

    /// Generic spring steel substituted when a material cannot be resolved
    /// under [`MaterialPolicy::Fallback`].
    pub fn fallback() -> Self {
        Self::new("Generic spring steel", 79_000.0, 206_000.0, 7.85, 700.0, 480.0)
    }

    /// Music wire, ASTM A228
    pub fn music_wire() -> Self {
        Self::new("Music wire (A228)", 81_700.0, 206_800.0, 7.85, 1_000.0, 520.0)
    }

    /// Oil-tempered wire, ASTM A229
    pub fn oil_tempered() -> Self {
        Self::new("Oil-tempered (A229)", 77_200.0, 196_500.0, 7.85, 860.0, 450.0)
    }

    /// Chrome-vanadium, ASTM A231
    pub fn chrome_vanadium() -> Self {
        Self::new("Chrome-vanadium (A231)", 77_200.0, 203_400.0, 7.85, 900.0, 480.0)
    }

    /// Chrome-silicon, ASTM A401
    pub fn chrome_silicon() -> Self {
        Self::new("Chrome-silicon (A401)", 77_200.0, 203_400.0, 7.85, 1_050.0, 560.0)
    }

    /// Stainless steel 302, ASTM A313
    pub fn stainless_302() -> Self {
        Self::new("Stainless 302 (A313)", 69_000.0, 193_000.0, 7.92, 720.0, 380.0)
    }

    /// Phosphor bronze, ASTM B159
    pub fn phosphor_bronze() -> Self {
        Self::new("Phosphor bronze (B159)", 41_400.0, 103_400.0, 8.86, 420.0, 210.0)
    }
}

/// Synchronous, read-only material lookup.
pub trait MaterialStore {
    /// Returns the material for `id`, or `None` if the store has no record.
    fn material(&self, id: &str) -> Option<Material>;
}

/// All keys of the built-in library.
pub const MATERIAL_KEYS: &[&str] = &[
    "music_wire",
    "oil_tempered",
    "chrome_vanadium",
    "chrome_silicon",
    "stainless_302",
    "phosphor_bronze",
];

/// In-memory material table. Keys are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// The library of common spring wire materials, keyed by
    /// [`MATERIAL_KEYS`].
    ///
    /// ```
    /// use u_springopt::material::{MaterialLibrary, MaterialStore};
    ///
    /// let library = MaterialLibrary::builtin();
    /// let wire = library.material("Music_Wire").unwrap();
    /// assert_eq!(wire.name, "Music wire (A228)");
    /// ```
    pub fn builtin() -> Self {
        let entries = [
            Material::music_wire(),
            Material::oil_tempered(),
            Material::chrome_vanadium(),
            Material::chrome_silicon(),
            Material::stainless_302(),
            Material::phosphor_bronze(),
        ];
        let mut library = Self::new();
        for (key, material) in MATERIAL_KEYS.iter().zip(entries) {
            library.insert(key, material);
        }
        library
    }

    /// Adds or replaces a material.
    pub fn insert(&mut self, id: &str, material: Material) {
        self.materials.insert(id.to_ascii_lowercase(), material);
    }

    pub fn with_material(mut self, id: &str, material: Material) -> Self {
        self.insert(id, material);
        self
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl MaterialStore for MaterialLibrary {
    fn material(&self, id: &str) -> Option<Material> {
        self.materials.get(&id.to_ascii_lowercase()).cloned()
    }
}

/// What to do when the material identifier is not in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaterialPolicy {
    /// Substitute [`Material::fallback`], log a warning, and report
    /// [`MaterialSource::Fallback`] in the result.
    #[default]
    Fallback,
    /// Fail the run with [`OptimizeError::MissingMaterial`].
    Strict,
}

/// Where the material data used by a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaterialSource {
    /// Resolved from the material store.
    Store,
    /// The identifier was missing; placeholder constants were used.
    Fallback,
}

/// Resolves `id` against `store` according to `policy`.
pub fn resolve<S: MaterialStore + ?Sized>(
    store: &S,
    id: &str,
    policy: MaterialPolicy,
) -> Result<(Material, MaterialSource), OptimizeError> {
    match (store.material(id), policy) {
        (Some(material), _) => Ok((material, MaterialSource::Store)),
        (None, MaterialPolicy::Strict) => Err(OptimizeError::MissingMaterial(id.to_string())),
        (None, MaterialPolicy::Fallback) => {
            tracing::warn!(
                material_id = id,
                "material not found, optimizing against fallback spring steel constants"
            );
            Ok((Material::fallback(), MaterialSource::Fallback))
        }
    }
}
