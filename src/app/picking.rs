//! Picking: Bildschirmkoordinate → nächster getroffener POI.

use glam::Vec2;

use super::selection::{LastPick, SelectionState};
use crate::core::{Animatable, Camera3D, PoiKey, PoiRegistry, Ray, Selectable};

/// Ergebnis eines Picks inklusive Selektionswechsel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickOutcome {
    /// Getroffener POI (`None` = kein Treffer)
    pub hit: Option<PoiKey>,
    /// Vorher selektierter POI, der abgewählt wurde
    pub deselected: Option<PoiKey>,
    /// Neu selektierter POI
    pub selected: Option<PoiKey>,
    /// Ergebnis des vorherigen Picks wiederverwendet
    pub reused: bool,
}

/// Findet den nächsten Treffer entlang des Strahls.
///
/// Kleinstes nicht-negatives `t` gewinnt; bei Gleichstand gewinnt der
/// zuerst iterierte Kandidat (Registry: Einfüge-Reihenfolge).
pub fn nearest_hit<'a, K, E, I>(candidates: I, ray: &Ray) -> Option<(K, f32)>
where
    K: Clone + 'a,
    E: Selectable + 'a,
    I: IntoIterator<Item = (&'a K, &'a E)>,
{
    let mut best: Option<(K, f32)> = None;
    for (key, entity) in candidates {
        let Some(t) = entity.intersect(ray) else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, best_t)| t < *best_t) {
            best = Some((key.clone(), t));
        }
    }
    best
}

/// Löst Picks auf und verwaltet die Selektion.
#[derive(Debug, Clone, Default)]
pub struct PickingService {
    selection: SelectionState,
}

impl PickingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Schlüssel des selektierten POI.
    pub fn selected(&self) -> Option<&PoiKey> {
        self.selection.selected.as_ref()
    }

    /// Pickt an Bildschirmposition `(screen_x, screen_y)` (Pixel, oben links).
    ///
    /// `revision` ist die Szenen-Revision; bei gleicher Position und
    /// Revision wird das vorherige Ergebnis ohne Seiteneffekte geliefert.
    pub fn pick(
        &mut self,
        registry: &mut PoiRegistry,
        camera: &Camera3D,
        screen_x: i32,
        screen_y: i32,
        revision: u64,
    ) -> PickOutcome {
        if self.selection.is_repeat(screen_x, screen_y, revision) {
            return PickOutcome {
                hit: self.selection.selected.clone(),
                reused: true,
                ..Default::default()
            };
        }

        let ray = camera.screen_ray(Vec2::new(screen_x as f32, screen_y as f32));
        let hit = nearest_hit(registry.iter(), &ray).map(|(key, t)| {
            log::debug!("Pick ({}, {}) trifft '{}' bei t={:.2}", screen_x, screen_y, key.sid(), t);
            key
        });

        let mut outcome = self.apply_selection(registry, hit.clone());
        outcome.hit = hit;
        self.selection.last_pick = Some(LastPick {
            screen_x,
            screen_y,
            revision,
        });
        outcome
    }

    /// Hebt die Selektion auf; gibt den abgewählten Schlüssel zurück.
    pub fn clear_selection(&mut self, registry: &mut PoiRegistry) -> Option<PoiKey> {
        let outcome = self.apply_selection(registry, None);
        self.selection.last_pick = None;
        outcome.deselected
    }

    /// Vergisst einen POI, der aus der Registry entfernt wurde.
    ///
    /// Gibt `true` zurück, wenn er selektiert war.
    pub fn forget(&mut self, key: &PoiKey) -> bool {
        self.selection.last_pick = None;
        if self.selection.selected.as_ref() == Some(key) {
            self.selection.selected = None;
            true
        } else {
            false
        }
    }

    /// Setzt die Selektion zurück, ohne POIs anzufassen (Szenenwechsel).
    pub fn reset(&mut self) {
        self.selection.clear();
    }

    fn apply_selection(&mut self, registry: &mut PoiRegistry, hit: Option<PoiKey>) -> PickOutcome {
        if self.selection.selected == hit {
            return PickOutcome::default();
        }

        let mut outcome = PickOutcome::default();
        if let Some(previous) = self.selection.selected.take() {
            if let Some(poi) = registry.get_by_key_mut(&previous) {
                poi.deselect();
                poi.deanimate();
            }
            outcome.deselected = Some(previous);
        }
        if let Some(key) = hit {
            if let Some(poi) = registry.get_by_key_mut(&key) {
                poi.select();
                poi.animate();
            }
            self.selection.selected = Some(key.clone());
            outcome.selected = Some(key);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeoFrame, LatLngAlt, Poi, PoiVisual, Positioned};

    fn setup() -> (GeoFrame, PoiRegistry, Camera3D) {
        let mut frame = GeoFrame::new();
        frame.set_origin(48.8566, 2.3522);
        let mut camera = Camera3D::default();
        camera.position = frame.compute_position(48.8566, 2.3522, 500.0);
        (frame, PoiRegistry::new(), camera)
    }

    fn add(registry: &mut PoiRegistry, frame: &GeoFrame, sid: &str, alt: f64) {
        let mut poi = Poi::new(sid, PoiVisual::cube(5.0, [1.0; 4]))
            .at(LatLngAlt::new(48.8566, 2.3522, alt));
        poi.sync(frame);
        registry.add_poi(poi);
    }

    #[test]
    fn nearer_poi_wins_regardless_of_insertion_order() {
        let (frame, mut registry, camera) = setup();
        add(&mut registry, &frame, "low", 0.0);
        add(&mut registry, &frame, "high", 200.0);

        let mut picking = PickingService::new();
        let outcome = picking.pick(&mut registry, &camera, 400, 300, 0);

        assert_eq!(outcome.hit, Some(PoiKey::Named("high".into())));
        assert!(registry.get_poi("high").is_some_and(|p| p.is_selected() && p.is_animating()));
        assert!(registry.get_poi("low").is_some_and(|p| !p.is_selected()));
    }

    #[test]
    fn tie_is_broken_by_insertion_order() {
        let (frame, mut registry, camera) = setup();
        add(&mut registry, &frame, "first", 0.0);
        add(&mut registry, &frame, "second", 0.0);

        let ray = camera.screen_ray(Vec2::new(400.0, 300.0));
        let (key, _) = nearest_hit(registry.iter(), &ray).expect("Treffer erwartet");
        assert_eq!(key, PoiKey::Named("first".into()));
    }

    #[test]
    fn miss_clears_previous_selection() {
        let (frame, mut registry, camera) = setup();
        add(&mut registry, &frame, "a", 0.0);
        let mut picking = PickingService::new();
        picking.pick(&mut registry, &camera, 400, 300, 0);

        let outcome = picking.pick(&mut registry, &camera, 5, 5, 0);

        assert_eq!(outcome.hit, None);
        assert_eq!(outcome.deselected, Some(PoiKey::Named("a".into())));
        assert!(picking.selected().is_none());
        assert!(registry.get_poi("a").is_some_and(|p| !p.is_selected() && !p.is_animating()));
    }

    #[test]
    fn repeated_pick_is_reused_until_revision_changes() {
        let (frame, mut registry, camera) = setup();
        add(&mut registry, &frame, "a", 0.0);
        let mut picking = PickingService::new();

        let first = picking.pick(&mut registry, &camera, 400, 300, 7);
        let second = picking.pick(&mut registry, &camera, 400, 300, 7);
        let third = picking.pick(&mut registry, &camera, 400, 300, 8);

        assert!(!first.reused);
        assert!(second.reused);
        assert_eq!(second.hit, first.hit);
        assert!(!third.reused);
        // gleicher Treffer → kein erneuter Selektionswechsel
        assert_eq!(third.selected, None);
        assert_eq!(third.hit, first.hit);
    }
}
