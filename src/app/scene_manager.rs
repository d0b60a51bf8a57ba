//! Szenen-Verwaltung: Frame, POIs, Kamera, Picking und Kacheloberfläche.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use super::callbacks::GeoEngineCallbacks;
use super::picking::{PickOutcome, PickingService};
use crate::core::{
    Animatable, Camera3D, CameraController, Easing, GeoFrame, LatLng, LatLngAlt, Poi, PoiKey,
    PoiRegistry, Positioned, TileDiffuseSink, TileError, TileId, TileMap, TileNotifier,
};
use crate::shared::SceneOptions;

/// Lebenszyklus einer Szene, wie ihn der Host sieht.
pub trait SceneLifecycle {
    /// Bereitet Frame und Kacheloberfläche vor.
    fn init(&mut self);
    /// Gibt alle Szenen-Ressourcen frei.
    fn unload(&mut self);
    /// Ein Frame-Tick; `dt` in Sekunden.
    fn step(&mut self, dt: f32);
}

/// Zustand des Lebenszyklus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Noch nie initialisiert
    Fresh,
    Ready,
    Unloaded,
}

/// Besitzt alle Bestandteile einer Geo-Szene.
///
/// Alle Methoden laufen auf dem Render-Thread; nur der [`TileNotifier`]
/// darf an andere Threads weitergegeben werden.
pub struct GeoSceneManager {
    options: SceneOptions,
    state: SceneState,
    frame: GeoFrame,
    registry: PoiRegistry,
    camera: CameraController,
    picking: PickingService,
    tiles: TileMap,
    callbacks: Option<Box<dyn GeoEngineCallbacks>>,
    diffuse_sink: Option<Box<dyn TileDiffuseSink>>,
    /// Wird bei jeder pick-relevanten Änderung erhöht
    revision: u64,
}

impl GeoSceneManager {
    /// Erstellt eine noch nicht initialisierte Szene.
    pub fn new(options: SceneOptions) -> Self {
        let mut tiles = TileMap::new(options.tile_zoom, options.tile_radius);
        tiles.set_namespace(options.tile_namespace.clone());
        Self {
            camera: CameraController::new(options.camera_projection()),
            options,
            state: SceneState::Fresh,
            frame: GeoFrame::new(),
            registry: PoiRegistry::new(),
            picking: PickingService::new(),
            tiles,
            callbacks: None,
            diffuse_sink: None,
            revision: 0,
        }
    }

    // ── Lebenszyklus ────────────────────────────────────────────────

    /// Initialisiert Frame und Kacheloberfläche.
    ///
    /// Ohne gesetzten Ursprung wird `options.origin` verwendet, sonst (0, 0).
    /// Auf einer bereits bereiten Szene: Warnung, keine Änderung.
    pub fn init(&mut self) {
        if self.state == SceneState::Ready {
            log::warn!("init() auf bereiter Szene ignoriert");
            return;
        }

        if !self.frame.is_anchored() {
            match self.options.origin {
                Some(origin) => self.frame.set_origin(origin.lat, origin.lon),
                None => log::warn!("Kein Ursprung gesetzt, Szene verankert bei (0, 0)"),
            }
        }

        self.state = SceneState::Ready;
        self.rebuild_tiles();

        let origin = self.frame.origin();
        self.camera.place_camera(
            &self.frame,
            origin.with_alt(self.options.camera_default_altitude),
        );
        self.bump_revision();

        log::info!(
            "Szene initialisiert: Ursprung ({:.6}, {:.6}), {} Kacheln",
            origin.lat,
            origin.lon,
            self.tiles.len()
        );
    }

    /// Gibt POIs, Selektion, Kamera und Kacheloberfläche frei.
    ///
    /// Danach weisen Kachel-Meldungen `TileError::SceneUnloaded` zurück,
    /// bis `init()` erneut aufgerufen wird.
    pub fn unload(&mut self) {
        if self.state != SceneState::Ready {
            log::warn!("unload() ohne geladene Szene ({:?})", self.state);
        }
        let poi_count = self.registry.len();
        if let Some(key) = self.picking.selected().cloned() {
            self.notify_deselected(&key);
        }
        self.picking.reset();
        self.registry.remove_all_pois();
        self.camera.reset();
        self.tiles.clear();
        self.frame.reset();
        self.state = SceneState::Unloaded;
        self.bump_revision();
        log::info!("Szene entladen ({} POIs verworfen)", poi_count);
    }

    /// Ein Frame-Tick: Kamera, POI-Animationen, Resync, Kachel-Meldungen.
    pub fn step(&mut self, dt: f32) {
        if self.state != SceneState::Ready {
            return;
        }

        let mut changed = self.camera.step(dt, &self.frame);

        for (_, poi) in self.registry.iter_mut() {
            if poi.is_translating() || poi.is_rotating() {
                changed = true;
            }
            poi.update(dt, &self.frame);
            if poi.needs_sync(&self.frame) {
                poi.sync(&self.frame);
                changed = true;
            }
        }

        if self.tiles.drain_notifications() > 0 {
            self.update_tile_diffuse_maps();
        }

        if changed {
            self.bump_revision();
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SceneState::Ready
    }

    /// Revision der pick-relevanten Szene.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    // ── Koordinaten ─────────────────────────────────────────────────

    pub fn frame(&self) -> &GeoFrame {
        &self.frame
    }

    /// Setzt den Ursprung; eine bereite Szene baut ihre Kacheloberfläche neu auf.
    ///
    /// Die ruhende Kamera wird sofort neu projiziert, alle POIs im nächsten `step()`.
    pub fn set_origin(&mut self, lat: f64, lon: f64) {
        if !LatLng::new(lat, lon).is_valid() {
            log::warn!("Ursprung ausserhalb des gültigen Bereichs: ({lat}, {lon})");
        }
        self.frame.set_origin(lat, lon);
        self.camera.resync(&self.frame);
        if self.is_ready() {
            self.rebuild_tiles();
        }
        self.bump_revision();
    }

    pub fn compute_position(&self, lat: f64, lon: f64, alt: f64) -> Vec3 {
        self.frame.compute_position(lat, lon, alt)
    }

    pub fn compute_coordinates(&self, position: Vec3) -> LatLngAlt {
        self.frame.compute_coordinates(position)
    }

    /// Render-Position des Punkts in `distance` Metern vom Ursprung bei Peilung `bearing`.
    pub fn destination_point(&self, bearing: f64, distance: f64) -> Vec3 {
        self.frame.destination_point(bearing, distance)
    }

    // ── POIs ────────────────────────────────────────────────────────

    /// Registriert einen POI; `false` bei bereits vergebenem `sid`.
    pub fn add_poi(&mut self, poi: Poi) -> bool {
        let sid = poi.sid().to_owned();
        let Some(key) = self.registry.insert(poi) else {
            log::warn!("POI '{}' bereits registriert, ignoriert", sid);
            return false;
        };
        if self.frame.is_anchored() {
            if let Some(poi) = self.registry.get_by_key_mut(&key) {
                poi.sync(&self.frame);
            }
        }
        self.bump_revision();
        log::debug!("POI '{}' hinzugefügt ({} gesamt)", sid, self.registry.len());
        true
    }

    /// Entfernt einen POI; `false`, wenn der `sid` unbekannt ist.
    ///
    /// War der POI selektiert, wird die Selektion aufgehoben.
    pub fn remove_poi(&mut self, sid: &str) -> bool {
        if !self.registry.remove_poi(sid) {
            return false;
        }
        let key = PoiKey::Named(sid.to_owned());
        if self.picking.forget(&key) {
            self.notify_deselected(&key);
        }
        self.bump_revision();
        log::debug!("POI '{}' entfernt", sid);
        true
    }

    pub fn remove_all_pois(&mut self) {
        if let Some(key) = self.picking.selected().cloned() {
            self.picking.forget(&key);
            self.notify_deselected(&key);
        }
        self.picking.reset();
        self.registry.remove_all_pois();
        self.bump_revision();
    }

    pub fn has_poi(&self, sid: &str) -> bool {
        self.registry.has_poi(sid)
    }

    pub fn get_poi(&self, sid: &str) -> Option<&Poi> {
        self.registry.get_poi(sid)
    }

    /// Änderungen an der Position werden im nächsten `step()` übernommen.
    pub fn get_poi_mut(&mut self, sid: &str) -> Option<&mut Poi> {
        self.bump_revision();
        self.registry.get_poi_mut(sid)
    }

    pub fn pois(&self) -> &PoiRegistry {
        &self.registry
    }

    /// Startet eine Translation des POI mit dem konfigurierten Easing.
    pub fn move_poi(&mut self, sid: &str, coords: LatLngAlt, duration: f32) -> bool {
        let easing = self.options.camera_flight_easing;
        let Some(poi) = self.registry.get_poi_mut(sid) else {
            return false;
        };
        poi.translate_to(coords, duration, easing);
        self.bump_revision();
        true
    }

    // ── Kamera ──────────────────────────────────────────────────────

    pub fn camera(&self) -> &Camera3D {
        self.camera.camera()
    }

    pub fn camera_controller(&self) -> &CameraController {
        &self.camera
    }

    pub fn place_camera(&mut self, coords: LatLngAlt) {
        self.camera.place_camera(&self.frame, coords);
        self.bump_revision();
    }

    /// Platziert die Kamera und behält ihre Höhe.
    pub fn place_camera_at(&mut self, coords: LatLng) {
        self.camera.place_camera_at(&self.frame, coords);
        self.bump_revision();
    }

    pub fn place_camera_animated(&mut self, coords: LatLngAlt, duration: f32, easing: Easing) {
        self.camera
            .place_camera_animated(&self.frame, coords, duration, easing);
        self.bump_revision();
    }

    /// Kameraflug mit Dauer und Easing aus den Optionen.
    pub fn fly_camera_to(&mut self, coords: LatLngAlt) {
        let duration = self.options.camera_flight_duration;
        let easing = self.options.camera_flight_easing;
        self.place_camera_animated(coords, duration, easing);
    }

    pub fn orientate_camera(&mut self, rotation: Arc<Mat4>) {
        self.camera.orientate_camera(rotation);
        self.bump_revision();
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.camera.camera_mut().set_viewport_size(size);
        self.bump_revision();
    }

    // ── Picking ─────────────────────────────────────────────────────

    /// Pickt den nächsten POI unter der Bildschirmposition und selektiert ihn.
    ///
    /// Kein Treffer hebt die Selektion auf.
    pub fn pick(&mut self, screen_x: i32, screen_y: i32) -> Option<&Poi> {
        if !self.is_ready() {
            log::warn!("pick() ohne geladene Szene");
            return None;
        }
        let outcome = self.picking.pick(
            &mut self.registry,
            self.camera.camera(),
            screen_x,
            screen_y,
            self.revision,
        );
        self.report_selection(&outcome);
        let key = outcome.hit?;
        self.registry.get_by_key(&key)
    }

    pub fn selected(&self) -> Option<&Poi> {
        self.picking
            .selected()
            .and_then(|key| self.registry.get_by_key(key))
    }

    /// `sid` des selektierten POI (leer bei anonymen POIs).
    pub fn selected_sid(&self) -> Option<&str> {
        self.picking.selected().map(PoiKey::sid)
    }

    pub fn clear_selection(&mut self) {
        if let Some(key) = self.picking.clear_selection(&mut self.registry) {
            self.notify_deselected(&key);
        }
    }

    // ── Kacheln & Host ──────────────────────────────────────────────

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    /// Griff für Kachel-Loader auf anderen Threads.
    pub fn tile_notifier(&self) -> TileNotifier {
        self.tiles.notifier()
    }

    /// Meldet eine verfügbare Kachel; angewendet wird im nächsten `step()`.
    pub fn notify_tile_available(&self, x: i32, y: i32, z: u8) -> Result<(), TileError> {
        self.tiles.notifier().notify_tile_available(x, y, z)
    }

    pub fn set_tile_namespace(&mut self, namespace: impl Into<String>) {
        self.tiles.set_namespace(namespace);
    }

    pub fn set_callbacks(&mut self, callbacks: Box<dyn GeoEngineCallbacks>) {
        self.callbacks = Some(callbacks);
    }

    pub fn set_tile_diffuse_sink(&mut self, sink: Box<dyn TileDiffuseSink>) {
        self.diffuse_sink = Some(sink);
    }

    /// Reicht ausstehende Diffuse-Maps an den Renderer weiter.
    ///
    /// Ohne registrierten Sink bleiben die Kacheln ausstehend.
    pub fn update_tile_diffuse_maps(&mut self) -> Vec<TileId> {
        let Some(sink) = self.diffuse_sink.as_deref_mut() else {
            return Vec::new();
        };
        let refreshed = self.tiles.update_tile_diffuse_maps(sink);
        if let Some(callbacks) = self.callbacks.as_deref() {
            for id in &refreshed {
                callbacks.on_tile_refreshed(*id);
            }
        }
        if !refreshed.is_empty() {
            log::debug!("{} Kachel-Texturen aktualisiert", refreshed.len());
        }
        refreshed
    }

    // ── intern ──────────────────────────────────────────────────────

    fn rebuild_tiles(&mut self) {
        let created = self.tiles.rebuild(&self.frame);
        let Some(callbacks) = self.callbacks.as_deref() else {
            return;
        };
        for id in created {
            callbacks.on_tile_requested(id, &self.tiles.tile_path(id));
        }
    }

    fn report_selection(&self, outcome: &PickOutcome) {
        if let Some(key) = &outcome.deselected {
            self.notify_deselected(key);
        }
        if let (Some(key), Some(callbacks)) = (&outcome.selected, self.callbacks.as_deref()) {
            callbacks.on_poi_selected(key.sid());
        }
    }

    fn notify_deselected(&self, key: &PoiKey) {
        if let Some(callbacks) = self.callbacks.as_deref() {
            callbacks.on_poi_deselected(key.sid());
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for GeoSceneManager {
    fn default() -> Self {
        Self::new(SceneOptions::default())
    }
}

impl SceneLifecycle for GeoSceneManager {
    fn init(&mut self) {
        GeoSceneManager::init(self);
    }

    fn unload(&mut self) {
        GeoSceneManager::unload(self);
    }

    fn step(&mut self, dt: f32) {
        GeoSceneManager::step(self, dt);
    }
}
