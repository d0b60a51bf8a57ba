//! Point of Interest: geo-positionierte, selektierbare und animierbare Entität.

use glam::{Mat4, Quat, Vec3};

use super::animation::{Easing, RotationAnimation, TranslationAnimation};
use super::capabilities::{Animatable, Positioned, Selectable};
use super::geo_frame::GeoFrame;
use super::lat_lng::{LatLng, LatLngAlt};
use super::ray::Ray;
use super::visual::{Color, PoiVisual};

/// Relative Größenänderung der Aktiv-Animation (Pulsieren).
pub const PULSE_AMPLITUDE: f32 = 0.15;
/// Frequenz der Aktiv-Animation in Hz.
pub const PULSE_FREQUENCY_HZ: f32 = 1.5;

/// Point of Interest.
///
/// Die geodätische Position ist die Quelle der Wahrheit. Die Render-Position
/// wird nur in [`Positioned::sync`] aus ihr abgeleitet; dazwischen ist der
/// Cache ggf. veraltet (`is_dirty()` bzw. `needs_sync()`).
#[derive(Debug, Clone)]
pub struct Poi {
    /// Kann leer sein (anonymer POI)
    sid: String,
    coords: LatLngAlt,
    orientation: Quat,
    dirty: bool,
    translation: Option<TranslationAnimation>,
    rotation: Option<RotationAnimation>,
    visual: PoiVisual,
    selected: bool,
    /// Phase der Aktiv-Animation in Sekunden, `None` wenn inaktiv
    pulse_phase: Option<f32>,
    render_position: Vec3,
    synced_generation: Option<u64>,
}

impl Poi {
    /// Erstellt einen POI bei (0, 0, 0). Ein leerer `sid` erzeugt einen anonymen POI.
    pub fn new(sid: impl Into<String>, visual: PoiVisual) -> Self {
        Self {
            sid: sid.into(),
            coords: LatLngAlt::default(),
            orientation: Quat::IDENTITY,
            dirty: true,
            translation: None,
            rotation: None,
            visual,
            selected: false,
            pulse_phase: None,
            render_position: Vec3::ZERO,
            synced_generation: None,
        }
    }

    /// Builder-Variante: setzt die Startposition.
    pub fn at(mut self, coords: LatLngAlt) -> Self {
        self.set_position(coords.lat, coords.lon, coords.alt);
        self
    }

    /// ID des POI. **Kann leer sein.**
    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn lat(&self) -> f64 {
        self.coords.lat
    }

    pub fn lng(&self) -> f64 {
        self.coords.lon
    }

    pub fn alt(&self) -> f64 {
        self.coords.alt
    }

    /// Setzt die Position ohne Höhe (Höhe = 0).
    pub fn set_lat_lng(&mut self, coords: LatLng) {
        self.set_position(coords.lat, coords.lon, 0.0);
    }

    /// Setzt die Position aus einem Array `[lat, lon, alt]`.
    pub fn set_position_array(&mut self, pos: [f64; 3]) {
        let coords = LatLngAlt::from(pos);
        self.set_position(coords.lat, coords.lon, coords.alt);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Aktuelle Orientierung.
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Setzt die Orientierung aus einer Rotationsmatrix.
    ///
    /// Markiert den POI nicht als dirty; eine laufende Rotation wird verworfen.
    pub fn set_orientation(&mut self, rotation: &Mat4) {
        let (_, rotation, _) = rotation.to_scale_rotation_translation();
        self.orientation = rotation.normalize();
        self.rotation = None;
    }

    /// Setzt die Orientierung aus 16 Floats (spaltenweise).
    pub fn set_orientation_array(&mut self, orientation: &[f32; 16]) {
        self.set_orientation(&Mat4::from_cols_array(orientation));
    }

    pub fn visual(&self) -> &PoiVisual {
        &self.visual
    }

    /// Setzt die Materialfarbe.
    pub fn set_color(&mut self, color: Color) {
        self.visual.set_color(color);
    }

    /// Bewegt den POI animiert zu `coords`; ersetzt eine laufende Translation.
    pub fn translate_to(&mut self, coords: LatLngAlt, duration: f32, easing: Easing) {
        if duration <= 0.0 {
            self.translation = None;
            self.set_position(coords.lat, coords.lon, coords.alt);
            return;
        }
        self.translation = Some(TranslationAnimation::new(
            self.coords,
            coords,
            duration,
            easing,
        ));
    }

    /// Dreht den POI animiert zu `target`; ersetzt eine laufende Rotation.
    pub fn rotate_to(&mut self, target: Quat, duration: f32, easing: Easing) {
        if duration <= 0.0 {
            self.rotation = None;
            self.orientation = target.normalize();
            return;
        }
        self.rotation = Some(RotationAnimation::new(
            self.orientation,
            target,
            duration,
            easing,
        ));
    }

    pub fn is_translating(&self) -> bool {
        self.translation.is_some()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    /// Welt-Transform aus gecachter Render-Position und Orientierung.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.render_position)
    }

    /// Skalierungsfaktor der Aktiv-Animation für den Renderer (1.0 wenn inaktiv).
    pub fn pulse_scale(&self) -> f32 {
        match self.pulse_phase {
            Some(phase) => {
                1.0 + PULSE_AMPLITUDE * (phase * PULSE_FREQUENCY_HZ * std::f32::consts::TAU).sin()
            }
            None => 1.0,
        }
    }
}

impl Positioned for Poi {
    fn position(&self) -> LatLngAlt {
        self.coords
    }

    fn set_position(&mut self, lat: f64, lon: f64, alt: f64) {
        debug_assert!(
            LatLng::new(lat, lon).is_valid(),
            "POI '{}' ausserhalb des gültigen Bereichs: ({lat}, {lon})",
            self.sid
        );
        self.coords = LatLngAlt::new(lat, lon, alt);
        self.dirty = true;
    }

    fn render_position(&self) -> Vec3 {
        self.render_position
    }

    fn needs_sync(&self, frame: &GeoFrame) -> bool {
        self.dirty || self.synced_generation != Some(frame.generation())
    }

    fn sync(&mut self, frame: &GeoFrame) {
        self.render_position = frame.project(self.coords);
        self.synced_generation = Some(frame.generation());
        self.dirty = false;
    }
}

impl Selectable for Poi {
    fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self) {
        self.selected = true;
    }

    fn deselect(&mut self) {
        self.selected = false;
    }

    /// Nutzt den gecachten Transform; ein dirty POI wird an seiner alten Position getroffen.
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_oriented_box(&self.visual.mesh.bounds, &self.transform())
    }
}

impl Animatable for Poi {
    fn animate(&mut self) {
        if self.pulse_phase.is_none() {
            self.pulse_phase = Some(0.0);
        }
    }

    fn deanimate(&mut self) {
        self.pulse_phase = None;
    }

    fn is_animating(&self) -> bool {
        self.pulse_phase.is_some()
    }

    fn update(&mut self, dt: f32, frame: &GeoFrame) {
        if let Some(anim) = self.translation.as_mut() {
            anim.advance(dt);
            self.coords = if anim.is_finished() {
                anim.target()
            } else {
                frame.compute_coordinates(anim.sample(frame))
            };
            self.dirty = true;
            if anim.is_finished() {
                self.translation = None;
            }
        }

        if let Some(anim) = self.rotation.as_mut() {
            anim.advance(dt);
            self.orientation = anim.sample();
            if anim.is_finished() {
                self.rotation = None;
            }
        }

        if let Some(phase) = self.pulse_phase.as_mut() {
            *phase += dt.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn frame() -> GeoFrame {
        let mut frame = GeoFrame::new();
        frame.set_origin(48.8566, 2.3522);
        frame
    }

    fn cube_poi(sid: &str) -> Poi {
        Poi::new(sid, PoiVisual::cube(5.0, [1.0, 0.0, 0.0, 1.0]))
    }

    #[test]
    fn set_position_marks_dirty_and_keeps_geodetic_truth() {
        let frame = frame();
        let mut poi = cube_poi("eiffel");
        poi.sync(&frame);
        assert!(!poi.is_dirty());

        poi.set_position(48.8584, 2.2945, 0.0);

        assert!(poi.is_dirty());
        assert_eq!(poi.position(), LatLngAlt::new(48.8584, 2.2945, 0.0));
        // Cache bleibt bis zum nächsten Sync veraltet
        assert_eq!(poi.render_position(), frame.project(LatLngAlt::default()));
    }

    #[test]
    fn sync_clears_dirty_and_records_generation() {
        let mut frame = frame();
        let mut poi = cube_poi("a").at(LatLngAlt::new(48.86, 2.35, 10.0));
        poi.sync(&frame);
        assert!(!poi.needs_sync(&frame));

        frame.set_origin(48.0, 2.0);
        assert!(!poi.is_dirty());
        assert!(poi.needs_sync(&frame));
    }

    #[test]
    fn set_orientation_does_not_mark_dirty() {
        let frame = frame();
        let mut poi = cube_poi("a");
        poi.sync(&frame);
        poi.set_orientation(&Mat4::from_rotation_y(0.5));
        assert!(!poi.is_dirty());
        assert_relative_eq!(poi.orientation().angle_between(Quat::IDENTITY), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn animate_is_idempotent_and_deanimate_is_noop_when_inactive() {
        let frame = frame();
        let mut poi = cube_poi("a");
        poi.deanimate();
        assert!(!poi.is_animating());

        poi.animate();
        poi.update(0.1, &frame);
        let scale = poi.pulse_scale();
        poi.animate();
        assert_relative_eq!(poi.pulse_scale(), scale);

        poi.deanimate();
        assert!(!poi.is_animating());
        assert_relative_eq!(poi.pulse_scale(), 1.0);
    }

    #[test]
    fn intersects_uses_cached_transform() {
        let frame = frame();
        let mut poi = cube_poi("a").at(LatLngAlt::new(48.8566, 2.3522, 0.0));
        poi.sync(&frame);

        let down = Vec3::NEG_Y;
        assert!(poi.intersects(down, Vec3::new(0.0, 100.0, 0.0)));

        // Neue Position ohne Sync: Picking sieht weiterhin die alte
        poi.set_position(48.87, 2.3522, 0.0);
        assert!(poi.intersects(down, Vec3::new(0.0, 100.0, 0.0)));
        poi.sync(&frame);
        assert!(!poi.intersects(down, Vec3::new(0.0, 100.0, 0.0)));
    }

    #[test]
    fn translate_to_reaches_target_exactly() {
        let frame = frame();
        let target = LatLngAlt::new(48.87, 2.36, 50.0);
        let mut poi = cube_poi("a").at(LatLngAlt::new(48.8566, 2.3522, 0.0));
        poi.translate_to(target, 1.0, Easing::EaseInOut);

        poi.update(0.5, &frame);
        assert!(poi.is_translating());
        assert!(poi.is_dirty());
        assert!(poi.lat() > 48.8566 && poi.lat() < 48.87);

        poi.update(0.5, &frame);
        assert!(!poi.is_translating());
        assert_eq!(poi.position(), target);
    }

    #[test]
    fn new_translation_replaces_running_one() {
        let frame = frame();
        let mut poi = cube_poi("a");
        poi.translate_to(LatLngAlt::new(10.0, 10.0, 0.0), 1.0, Easing::Linear);
        poi.translate_to(LatLngAlt::new(1.0, 1.0, 0.0), 1.0, Easing::Linear);
        poi.update(1.0, &frame);
        assert_eq!(poi.position(), LatLngAlt::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn rotate_to_finishes() {
        let frame = frame();
        let mut poi = cube_poi("a");
        let target = Quat::from_rotation_y(1.2);
        poi.rotate_to(target, 0.3, Easing::Linear);
        poi.update(0.3, &frame);
        assert!(!poi.is_rotating());
        assert_relative_eq!(poi.orientation().angle_between(target), 0.0, epsilon = 1e-4);
    }
}
