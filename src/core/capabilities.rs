//! Fähigkeits-Traits für geo-positionierte Entitäten.
//!
//! Konsumenten (Picking, Szenen-Update) hängen von diesen Traits ab,
//! nicht von einem konkreten Entitätstyp.

use glam::Vec3;

use super::geo_frame::GeoFrame;
use super::lat_lng::LatLngAlt;
use super::ray::Ray;

/// Entität mit geodätischer Position und gecachter Render-Position.
pub trait Positioned {
    /// Geodätische Position (Quelle der Wahrheit).
    fn position(&self) -> LatLngAlt;

    /// Setzt die geodätische Position und markiert die Entität als dirty.
    fn set_position(&mut self, lat: f64, lon: f64, alt: f64);

    /// Zuletzt synchronisierte Render-Position (kann veraltet sein).
    fn render_position(&self) -> Vec3;

    /// `true`, wenn die gecachte Render-Position neu berechnet werden muss.
    fn needs_sync(&self, frame: &GeoFrame) -> bool;

    /// Berechnet die Render-Position aus der geodätischen Position neu.
    fn sync(&mut self, frame: &GeoFrame);
}

/// Entität, die per Strahl ausgewählt werden kann.
pub trait Selectable {
    fn is_selected(&self) -> bool;
    fn select(&mut self);
    fn deselect(&mut self);

    /// Strahlparameter des nächsten Treffers, falls der Strahl trifft.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Prüft, ob ein Strahl (Richtung `ray`, Startpunkt `origin`) trifft.
    fn intersects(&self, ray: Vec3, origin: Vec3) -> bool {
        self.intersect(&Ray::new(origin, ray)).is_some()
    }
}

/// Entität mit Aktiv-Animation und zeitgesteuerten Animationen.
pub trait Animatable {
    /// Startet die Aktiv-Animation (idempotent).
    fn animate(&mut self);
    /// Stoppt die Aktiv-Animation (No-op wenn inaktiv).
    fn deanimate(&mut self);
    fn is_animating(&self) -> bool;

    /// Schreitet alle laufenden Animationen um `dt` Sekunden voran.
    fn update(&mut self, dt: f32, frame: &GeoFrame);
}
