//! 3D-Kamera mit geodätischer Position und Perspektiv-Projektion.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use super::lat_lng::LatLngAlt;
use super::ray::Ray;

/// Perspektiv-Parameter der Kamera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    /// Vertikales Sichtfeld in Grad
    pub fov_y_deg: f32,
    /// Near-Plane in Metern
    pub near: f32,
    /// Far-Plane in Metern
    pub far: f32,
}

impl Default for CameraProjection {
    fn default() -> Self {
        Self {
            fov_y_deg: Camera3D::DEFAULT_FOV_Y_DEG,
            near: Camera3D::DEFAULT_NEAR,
            far: Camera3D::DEFAULT_FAR,
        }
    }
}

/// Kamera-Zustand: Position (geodätisch + Render-Space), Orientierung, Projektion.
#[derive(Debug, Clone)]
pub struct Camera3D {
    /// Geodätische Position inkl. Höhe
    pub coords: LatLngAlt,
    /// Position im Render-Space
    pub position: Vec3,
    /// Kamera→Welt-Rotation; geteilt und nach Veröffentlichung unveränderlich
    pub orientation: Arc<Mat4>,
    pub projection: CameraProjection,
    /// Viewport-Größe in Pixeln
    pub viewport_size: Vec2,
}

impl Camera3D {
    /// Standard-Sichtfeld (vertikal) in Grad.
    pub const DEFAULT_FOV_Y_DEG: f32 = 60.0;
    /// Standard-Near-Plane.
    pub const DEFAULT_NEAR: f32 = 0.5;
    /// Standard-Far-Plane.
    pub const DEFAULT_FAR: f32 = 100_000.0;
    /// Standard-Viewport bis zum ersten Resize.
    pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    /// Erstellt eine Kamera im Ursprung, Blick senkrecht nach unten (Norden = oben).
    pub fn new(projection: CameraProjection) -> Self {
        Self {
            coords: LatLngAlt::default(),
            position: Vec3::ZERO,
            orientation: Arc::new(Self::look_down()),
            projection,
            viewport_size: Self::DEFAULT_VIEWPORT,
        }
    }

    /// Orientierung mit Blick nach -Y und Bildschirm-oben nach Norden (-Z).
    pub fn look_down() -> Mat4 {
        Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
    }

    /// Setzt die Viewport-Größe (mindestens 1×1).
    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport_size = size.max(Vec2::ONE);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.viewport_size.x / self.viewport_size.y
    }

    /// Welt→Kamera-Matrix.
    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * *self.orientation).inverse()
    }

    /// OpenGL-Projektionsmatrix (rechtshändig, NDC-z in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.projection.fov_y_deg.to_radians(),
            self.aspect_ratio(),
            self.projection.near,
            self.projection.far,
        )
    }

    /// Konvertiert Screen-Koordinaten (Pixel, Ursprung oben links) in einen Welt-Strahl.
    ///
    /// Die Richtung wird direkt aus Sichtfeld und Orientierung gebildet,
    /// ohne die View-Projektion zu invertieren.
    pub fn screen_ray(&self, screen_pos: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen_pos.x / self.viewport_size.x - 1.0,
            1.0 - 2.0 * screen_pos.y / self.viewport_size.y,
        );
        let tan_half = (self.projection.fov_y_deg.to_radians() * 0.5).tan();
        let dir_camera = Vec3::new(ndc.x * tan_half * self.aspect_ratio(), ndc.y * tan_half, -1.0);
        let dir_world = self.orientation.transform_vector3(dir_camera);
        Ray::new(self.position, dir_world)
    }

    /// Blickrichtung in Weltkoordinaten.
    pub fn forward(&self) -> Vec3 {
        self.orientation.transform_vector3(Vec3::NEG_Z).normalize_or_zero()
    }
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::new(CameraProjection::default())
    }
}
