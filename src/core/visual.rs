//! Visuelle Repräsentation eines POI (Mesh + Material).
//!
//! Meshes und Materialien gehören dem Renderer; der Core hält nur geteilte
//! Referenzen und liest die lokalen Bounds für das Picking.

use std::sync::Arc;

use super::ray::Aabb;

/// RGBA-Farbe, Komponenten in [0, 1].
pub type Color = [f32; 4];

/// Vom Renderer geladenes Mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Ressourcen-Name (z.B. Asset-Pfad)
    pub name: String,
    /// Lokale Bounding-Box
    pub bounds: Aabb,
}

impl Mesh {
    /// Erstellt eine Mesh-Beschreibung.
    pub fn new(name: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Material eines POI.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
}

impl Material {
    /// Erstellt ein Material.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Mesh + Material eines POI.
#[derive(Debug, Clone)]
pub struct PoiVisual {
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
}

impl PoiVisual {
    /// Erstellt eine Repräsentation aus geteilten Ressourcen.
    pub fn new(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self { mesh, material }
    }

    /// Würfel mit halber Kantenlänge `half_extent` in der angegebenen Farbe.
    pub fn cube(half_extent: f32, color: Color) -> Self {
        Self::new(
            Arc::new(Mesh::new("cube", Aabb::cube(half_extent))),
            Arc::new(Material::new("flat", color)),
        )
    }

    /// Setzt die Farbe (CoW: klont das Material nur wenn es geteilt ist).
    pub fn set_color(&mut self, color: Color) {
        Arc::make_mut(&mut self.material).color = color;
    }
}
