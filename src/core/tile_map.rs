//! Kachel-Oberfläche um den Ursprung und Übergabe von Kachel-Benachrichtigungen.
//!
//! Das Laden/Dekodieren der Kacheln übernimmt ein externer Loader. Der Core
//! kennt nur das Kachelraster (Slippy-Map-Koordinaten `x/y/z`), nimmt
//! Verfügbarkeitsmeldungen thread-sicher entgegen und reicht die
//! Diffuse-Map-Aktualisierung während `step()` an den Renderer weiter.

use std::collections::{HashSet, VecDeque};
use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

use glam::Vec3;
use indexmap::IndexMap;

use super::geo_frame::GeoFrame;
use super::lat_lng::LatLng;

/// Höchste unterstützte Zoomstufe.
pub const MAX_TILE_ZOOM: u8 = 22;
/// Breitengrenze der Web-Mercator-Kacheln.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Kachel-Koordinate im Quadtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl TileId {
    pub const fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Kachel, die eine geodätische Position enthält.
    pub fn containing(coords: LatLng, z: u8) -> Self {
        let n = tiles_per_axis(z);
        let lat = coords.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let x = ((coords.lon + 180.0) / 360.0 * n as f64).floor() as i32;
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n as f64).floor() as i32;
        Self::new(x.clamp(0, n - 1), y.clamp(0, n - 1), z)
    }

    /// Nordwest-Ecke der Kachel.
    pub fn north_west(&self) -> LatLng {
        corner(self.x, self.y, self.z)
    }

    /// Südost-Ecke der Kachel.
    pub fn south_east(&self) -> LatLng {
        corner(self.x + 1, self.y + 1, self.z)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

fn tiles_per_axis(z: u8) -> i32 {
    1 << z.min(MAX_TILE_ZOOM)
}

fn corner(x: i32, y: i32, z: u8) -> LatLng {
    let n = tiles_per_axis(z) as f64;
    let lon = x as f64 / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees();
    LatLng::new(lat, lon)
}

/// Fehler an der Kachel-Schnittstelle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    #[error("Kachel {0} ist auf der aktuellen Oberfläche unbekannt")]
    UnknownTile(TileId),
    #[error("Keine Szene geladen")]
    SceneUnloaded,
    #[error("Kachel-Warteschlange nicht verfügbar (Mutex vergiftet)")]
    InboxPoisoned,
}

/// Zustand der Diffuse-Map einer Kachel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffuseState {
    /// Noch kein Bild verfügbar
    Missing,
    /// Bild gemeldet, Upload steht aus
    Pending,
    /// Bild an den Renderer übergeben
    Ready,
}

/// Eine Kachel der Oberfläche mit ihren Render-Space-Ecken.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    /// Ecken NW, NO, SO, SW im Render-Space
    pub corners: [Vec3; 4],
    pub diffuse: DiffuseState,
}

/// Empfänger der Diffuse-Map-Aktualisierungen auf Renderer-Seite.
pub trait TileDiffuseSink {
    /// Die Kachel hat ein neues Bild unter `image_path`.
    fn update_diffuse_map(&mut self, tile: &Tile, image_path: &str);
}

#[derive(Debug, Default)]
struct TileInbox {
    open: bool,
    known: HashSet<TileId>,
    pending: VecDeque<TileId>,
}

/// Thread-sicherer Griff für Kachel-Loader.
///
/// Darf aus beliebigen Threads aufgerufen werden; die Meldungen werden erst
/// im nächsten `step()` auf dem Render-Thread angewendet.
#[derive(Debug, Clone)]
pub struct TileNotifier {
    inbox: Arc<Mutex<TileInbox>>,
}

impl TileNotifier {
    /// Meldet, dass das Bild der Kachel `(x, y, z)` verfügbar ist.
    pub fn notify_tile_available(&self, x: i32, y: i32, z: u8) -> Result<(), TileError> {
        let id = TileId::new(x, y, z);
        let mut inbox = self.inbox.lock().map_err(|_| TileError::InboxPoisoned)?;
        if !inbox.open {
            return Err(TileError::SceneUnloaded);
        }
        if !inbox.known.contains(&id) {
            return Err(TileError::UnknownTile(id));
        }
        inbox.pending.push_back(id);
        Ok(())
    }
}

/// Kachelraster um den Ursprung.
#[derive(Debug)]
pub struct TileMap {
    zoom: u8,
    radius: u32,
    namespace: String,
    tiles: IndexMap<TileId, Tile>,
    inbox: Arc<Mutex<TileInbox>>,
}

impl TileMap {
    /// Erstellt eine leere Oberfläche; `radius` Kacheln um die Ursprungskachel.
    pub fn new(zoom: u8, radius: u32) -> Self {
        Self {
            zoom: zoom.min(MAX_TILE_ZOOM),
            radius,
            namespace: String::new(),
            tiles: IndexMap::new(),
            inbox: Arc::new(Mutex::new(TileInbox::default())),
        }
    }

    /// Griff für asynchrone Loader.
    pub fn notifier(&self) -> TileNotifier {
        TileNotifier {
            inbox: Arc::clone(&self.inbox),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Setzt den Namensraum, unter dem der Loader die Kachelbilder ablegt.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    /// Pfad des Kachelbilds: `<namespace>/<z>/<x>/<y>.png`.
    pub fn tile_path(&self, id: TileId) -> String {
        format!("{}/{}.png", self.namespace, id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Baut das Raster um den Ursprung neu auf und gibt die neuen Kacheln zurück.
    ///
    /// Bereits bekannte Kacheln behalten ihren Diffuse-Zustand; nur die Ecken
    /// werden neu projiziert.
    pub fn rebuild(&mut self, frame: &GeoFrame) -> Vec<TileId> {
        let center = TileId::containing(frame.origin(), self.zoom);
        let n = tiles_per_axis(self.zoom);
        let r = self.radius as i32;

        let mut wanted = Vec::new();
        for dy in -r..=r {
            let y = center.y + dy;
            if !(0..n).contains(&y) {
                continue;
            }
            for dx in -r..=r {
                let x = (center.x + dx).rem_euclid(n);
                let id = TileId::new(x, y, self.zoom);
                if !wanted.contains(&id) {
                    wanted.push(id);
                }
            }
        }

        let mut tiles = IndexMap::with_capacity(wanted.len());
        let mut created = Vec::new();
        for id in wanted {
            let diffuse = match self.tiles.get(&id) {
                Some(tile) => tile.diffuse,
                None => {
                    created.push(id);
                    DiffuseState::Missing
                }
            };
            tiles.insert(
                id,
                Tile {
                    id,
                    corners: project_corners(frame, id),
                    diffuse,
                },
            );
        }
        self.tiles = tiles;
        self.publish(true);

        log::debug!(
            "Kachelraster um {} neu aufgebaut: {} Kacheln, {} neu",
            center,
            self.tiles.len(),
            created.len()
        );
        created
    }

    /// Übernimmt alle wartenden Meldungen; gibt die Anzahl markierter Kacheln zurück.
    pub fn drain_notifications(&mut self) -> usize {
        let pending: Vec<TileId> = {
            let Ok(mut inbox) = self.inbox.lock() else {
                log::error!("Kachel-Warteschlange vergiftet, Meldungen verworfen");
                return 0;
            };
            inbox.pending.drain(..).collect()
        };

        let mut marked = 0;
        for id in pending {
            // Kachel kann seit der Meldung durch einen Ursprungswechsel entfallen sein
            if let Some(tile) = self.tiles.get_mut(&id) {
                tile.diffuse = DiffuseState::Pending;
                marked += 1;
            }
        }
        marked
    }

    /// Reicht alle ausstehenden Diffuse-Maps an den Renderer weiter.
    pub fn update_tile_diffuse_maps(&mut self, sink: &mut dyn TileDiffuseSink) -> Vec<TileId> {
        let refreshed: Vec<TileId> = self
            .tiles
            .values()
            .filter(|tile| tile.diffuse == DiffuseState::Pending)
            .map(|tile| tile.id)
            .collect();
        for &id in &refreshed {
            let path = self.tile_path(id);
            if let Some(tile) = self.tiles.get_mut(&id) {
                sink.update_diffuse_map(tile, &path);
                tile.diffuse = DiffuseState::Ready;
            }
        }
        refreshed
    }

    /// Verwirft alle Kacheln und schließt die Warteschlange.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.publish(false);
    }

    fn publish(&self, open: bool) {
        let Ok(mut inbox) = self.inbox.lock() else {
            log::error!("Kachel-Warteschlange vergiftet, Raster nicht veröffentlicht");
            return;
        };
        inbox.open = open;
        inbox.known = self.tiles.keys().copied().collect();
        inbox.pending.retain(|id| self.tiles.contains_key(id));
    }
}

fn project_corners(frame: &GeoFrame, id: TileId) -> [Vec3; 4] {
    let nw = id.north_west();
    let se = id.south_east();
    [
        frame.compute_position(nw.lat, nw.lon, 0.0),
        frame.compute_position(nw.lat, se.lon, 0.0),
        frame.compute_position(se.lat, se.lon, 0.0),
        frame.compute_position(se.lat, nw.lon, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        paths: Vec<String>,
    }

    impl TileDiffuseSink for RecordingSink {
        fn update_diffuse_map(&mut self, _tile: &Tile, image_path: &str) {
            self.paths.push(image_path.to_owned());
        }
    }

    fn paris_map() -> (GeoFrame, TileMap) {
        let mut frame = GeoFrame::new();
        frame.set_origin(48.8566, 2.3522);
        let mut map = TileMap::new(16, 1);
        map.set_namespace("tiles");
        map.rebuild(&frame);
        (frame, map)
    }

    #[test]
    fn containing_tile_matches_known_slippy_coordinates() {
        // Paris, Zoom 16
        let id = TileId::containing(LatLng::new(48.8566, 2.3522), 16);
        assert_eq!(id, TileId::new(33196, 22546, 16));
        let nw = id.north_west();
        let se = id.south_east();
        assert!(nw.lat > 48.8566 && se.lat < 48.8566);
        assert!(nw.lon < 2.3522 && se.lon > 2.3522);
    }

    #[test]
    fn rebuild_creates_grid_around_origin() {
        let (_, map) = paris_map();
        assert_eq!(map.len(), 9);
        assert!(map.get(TileId::new(33196, 22546, 16)).is_some());
    }

    #[test]
    fn origin_tile_corners_surround_render_zero() {
        let (_, map) = paris_map();
        let tile = map.get(TileId::new(33196, 22546, 16)).expect("Kachel erwartet");
        let [nw, _, se, _] = tile.corners;
        assert!(nw.x < 0.0 && se.x > 0.0);
        assert!(nw.z < 0.0 && se.z > 0.0);
    }

    #[test]
    fn unknown_tile_is_rejected() {
        let (_, map) = paris_map();
        let notifier = map.notifier();
        assert_eq!(
            notifier.notify_tile_available(1, 1, 16),
            Err(TileError::UnknownTile(TileId::new(1, 1, 16)))
        );
    }

    #[test]
    fn notification_is_applied_on_drain_and_forwarded_once() {
        let (_, mut map) = paris_map();
        let notifier = map.notifier();
        notifier
            .notify_tile_available(33196, 22546, 16)
            .expect("Kachel sollte bekannt sein");

        let tile = map.get(TileId::new(33196, 22546, 16)).expect("Kachel erwartet");
        assert_eq!(tile.diffuse, DiffuseState::Missing);

        assert_eq!(map.drain_notifications(), 1);
        let mut sink = RecordingSink::default();
        let refreshed = map.update_tile_diffuse_maps(&mut sink);

        assert_eq!(refreshed, vec![TileId::new(33196, 22546, 16)]);
        assert_eq!(sink.paths, vec!["tiles/16/33196/22546.png".to_owned()]);
        assert!(map.update_tile_diffuse_maps(&mut sink).is_empty());
    }

    #[test]
    fn forwarded_path_follows_tile_path() {
        let (_, mut map) = paris_map();
        map.set_namespace("cache/osm");
        let id = TileId::new(33196, 22546, 16);
        map.notifier()
            .notify_tile_available(id.x, id.y, id.z)
            .expect("Kachel sollte bekannt sein");
        map.drain_notifications();

        let mut sink = RecordingSink::default();
        map.update_tile_diffuse_maps(&mut sink);

        assert_eq!(sink.paths, vec![map.tile_path(id)]);
        assert_eq!(sink.paths[0], "cache/osm/16/33196/22546.png");
    }

    #[test]
    fn notifier_works_from_other_thread() {
        let (_, mut map) = paris_map();
        let notifier = map.notifier();
        let handle = std::thread::spawn(move || notifier.notify_tile_available(33197, 22546, 16));
        assert!(handle.join().expect("Thread-Panik").is_ok());
        assert_eq!(map.drain_notifications(), 1);
    }

    #[test]
    fn cleared_map_reports_unloaded() {
        let (_, mut map) = paris_map();
        let notifier = map.notifier();
        map.clear();
        assert_eq!(
            notifier.notify_tile_available(33196, 22546, 16),
            Err(TileError::SceneUnloaded)
        );
    }

    #[test]
    fn rebuild_keeps_diffuse_state_of_surviving_tiles() {
        let (mut frame, mut map) = paris_map();
        map.notifier()
            .notify_tile_available(33197, 22546, 16)
            .expect("Kachel sollte bekannt sein");
        map.drain_notifications();
        map.update_tile_diffuse_maps(&mut RecordingSink::default());

        // Ursprung eine Kachel nach Osten
        let shifted = TileId::new(33197, 22546, 16);
        let nw = shifted.north_west();
        let se = shifted.south_east();
        frame.set_origin((nw.lat + se.lat) / 2.0, (nw.lon + se.lon) / 2.0);
        let created = map.rebuild(&frame);

        assert_eq!(created.len(), 3);
        let tile = map.get(shifted).expect("Kachel erwartet");
        assert_eq!(tile.diffuse, DiffuseState::Ready);
    }
}
