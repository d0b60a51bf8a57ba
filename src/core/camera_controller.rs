//! Platziert und animiert die Kamera in geodätischen Koordinaten.

use std::sync::Arc;

use glam::Mat4;

use super::animation::{Easing, TranslationAnimation};
use super::camera::{Camera3D, CameraProjection};
use super::geo_frame::GeoFrame;
use super::lat_lng::{LatLng, LatLngAlt};

/// Steuert die eine Kamera einer Szene.
///
/// Es gibt höchstens eine laufende Translation; jede neue Platzierung
/// (sofort oder animiert) ersetzt sie ohne Rückmeldung.
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera3D,
    translation: Option<TranslationAnimation>,
    synced_generation: Option<u64>,
}

impl CameraController {
    /// Erstellt einen Controller mit Standardkamera.
    pub fn new(projection: CameraProjection) -> Self {
        Self {
            camera: Camera3D::new(projection),
            translation: None,
            synced_generation: None,
        }
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }

    /// Laufende Translation, falls vorhanden.
    pub fn animation(&self) -> Option<&TranslationAnimation> {
        self.translation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.translation.is_some()
    }

    /// Platziert die Kamera sofort und bricht eine laufende Translation ab.
    ///
    /// Vorbedingung: Breite in [-90, 90].
    pub fn place_camera(&mut self, frame: &GeoFrame, coords: LatLngAlt) {
        debug_assert!(coords.is_valid(), "Kamera-Ziel ungültig: {coords}");
        if self.translation.take().is_some() {
            log::debug!("Laufende Kamera-Animation abgebrochen");
        }
        self.land(frame, coords);
    }

    /// Platziert die Kamera sofort und behält die aktuelle Höhe bei.
    pub fn place_camera_at(&mut self, frame: &GeoFrame, coords: LatLng) {
        let alt = self.camera.coords.alt;
        self.place_camera(frame, coords.with_alt(alt));
    }

    /// Startet eine Translation von der aktuellen Position zu `coords`.
    ///
    /// `duration` in Sekunden; `<= 0` platziert sofort.
    pub fn place_camera_animated(
        &mut self,
        frame: &GeoFrame,
        coords: LatLngAlt,
        duration: f32,
        easing: Easing,
    ) {
        debug_assert!(coords.is_valid(), "Kamera-Ziel ungültig: {coords}");
        if duration <= 0.0 {
            self.place_camera(frame, coords);
            return;
        }
        log::debug!(
            "Kamera-Animation {} → {} über {:.2}s",
            self.camera.coords,
            coords,
            duration
        );
        self.translation = Some(TranslationAnimation::new(
            self.camera.coords,
            coords,
            duration,
            easing,
        ));
    }

    /// Setzt die Orientierung unabhängig von der Position.
    pub fn orientate_camera(&mut self, rotation: Arc<Mat4>) {
        self.camera.orientation = rotation;
    }

    /// Projiziert die ruhende Kamera nach einem Ursprungswechsel neu.
    ///
    /// Gibt `true` zurück, wenn sich die Render-Position geändert hat.
    pub fn resync(&mut self, frame: &GeoFrame) -> bool {
        if self.synced_generation == Some(frame.generation()) {
            return false;
        }
        let coords = self.camera.coords;
        self.land(frame, coords);
        true
    }

    /// Schreitet die Animation voran und hält die Render-Position synchron zum Ursprung.
    ///
    /// Gibt `true` zurück, wenn sich die Kamera bewegt hat.
    pub fn step(&mut self, dt: f32, frame: &GeoFrame) -> bool {
        let Some(anim) = self.translation.as_mut() else {
            return self.resync(frame);
        };

        anim.advance(dt);
        if anim.is_finished() {
            let target = anim.target();
            self.translation = None;
            self.land(frame, target);
            log::debug!("Kamera-Animation beendet bei {}", target);
        } else {
            let position = anim.sample(frame);
            self.camera.position = position;
            self.camera.coords = frame.compute_coordinates(position);
            self.synced_generation = Some(frame.generation());
        }
        true
    }

    /// Setzt Position, Orientierung und Animation zurück (Projektion bleibt).
    pub fn reset(&mut self) {
        let projection = self.camera.projection;
        let viewport = self.camera.viewport_size;
        self.camera = Camera3D::new(projection);
        self.camera.viewport_size = viewport;
        self.translation = None;
        self.synced_generation = None;
    }

    fn land(&mut self, frame: &GeoFrame, coords: LatLngAlt) {
        self.camera.coords = coords;
        self.camera.position = frame.project(coords);
        self.synced_generation = Some(frame.generation());
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraProjection::default())
    }
}
