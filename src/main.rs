//! Geo POI Scene: Headless-Treiber.
//!
//! Lädt die Optionen, legt die Start-POIs an, fliegt die Kamera zum ersten
//! POI und pickt anschließend die Bildschirmmitte.

use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use geo_poi_scene::{
    GeoEngineCallbacks, GeoSceneManager, LatLng, SceneCommand, SceneController, SceneOptions,
    Tile, TileDiffuseSink, TileId,
};

/// Ursprung, falls die Optionen keinen vorgeben (Paris).
const FALLBACK_ORIGIN: LatLng = LatLng::new(48.8566, 2.3522);
/// Simulierte Frame-Dauer (60 Hz).
const FRAME_DT: f32 = 1.0 / 60.0;
/// Obergrenze der simulierten Frames.
const MAX_FRAMES: u32 = 60 * 30;

fn main() -> anyhow::Result<()> {
    AppRunner::run()
}

struct AppRunner;

impl AppRunner {
    fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Geo POI Scene v{} startet...", env!("CARGO_PKG_VERSION"));

        let config_path = std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(SceneOptions::config_path);
        let options = SceneOptions::load_from_file(&config_path);
        let origin = options.origin.unwrap_or(FALLBACK_ORIGIN);
        let seeds = options.pois.clone();
        let altitude = options.camera_default_altitude;

        let mut scene = GeoSceneManager::new(options);
        scene.set_callbacks(Box::new(LoggingCallbacks));
        scene.set_tile_diffuse_sink(Box::new(LoggingSink::default()));

        let mut controller = SceneController::new();
        controller.handle_commands(
            &mut scene,
            [SceneCommand::SetOrigin { origin }, SceneCommand::Init],
        )?;
        controller
            .handle_commands(
                &mut scene,
                seeds
                    .iter()
                    .cloned()
                    .map(|spec| SceneCommand::AddPoi { spec }),
            )
            .context("Start-POIs konnten nicht angelegt werden")?;

        Self::spawn_tile_loader(&scene)?;

        if let Some(first) = seeds.first() {
            let coords = first.coords().lat_lng().with_alt(first.alt + altitude);
            controller.handle_command(
                &mut scene,
                SceneCommand::FlyCamera {
                    coords,
                    duration: None,
                    easing: None,
                },
            )?;
        }

        let mut frames = 0;
        while frames < MAX_FRAMES {
            controller.handle_command(&mut scene, SceneCommand::Step { dt: FRAME_DT })?;
            frames += 1;
            if !scene.camera_controller().is_animating() {
                break;
            }
        }
        // Nachzügler-Meldungen des Loaders übernehmen
        controller.handle_command(&mut scene, SceneCommand::Step { dt: FRAME_DT })?;
        log::info!(
            "{} Frames simuliert, Kamera bei {}",
            frames,
            scene.camera().coords
        );

        let viewport = scene.camera().viewport_size;
        let (center_x, center_y) = ((viewport.x / 2.0) as i32, (viewport.y / 2.0) as i32);
        match scene.pick(center_x, center_y) {
            Some(poi) => log::info!(
                "Bildschirmmitte trifft POI '{}' bei ({:.6}, {:.6})",
                poi.sid(),
                poi.lat(),
                poi.lng()
            ),
            None => log::info!("Bildschirmmitte trifft keinen POI"),
        }

        controller.handle_command(&mut scene, SceneCommand::Unload)?;
        log::info!(
            "{} Commands ausgeführt",
            controller.command_log().len()
        );
        Ok(())
    }

    /// Simuliert einen Kachel-Loader auf einem eigenen Thread.
    fn spawn_tile_loader(scene: &GeoSceneManager) -> anyhow::Result<()> {
        let notifier = scene.tile_notifier();
        let ids: Vec<TileId> = scene.tiles().tiles().map(|tile| tile.id).collect();
        let handle = thread::spawn(move || {
            for id in ids {
                if let Err(e) = notifier.notify_tile_available(id.x, id.y, id.z) {
                    log::warn!("Kachel {} nicht gemeldet: {}", id, e);
                }
            }
        });
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("Kachel-Loader-Thread abgestürzt"))
    }
}

/// Protokolliert alle Szenen-Ereignisse.
struct LoggingCallbacks;

impl GeoEngineCallbacks for LoggingCallbacks {
    fn on_tile_requested(&self, tile: TileId, image_path: &str) {
        log::debug!("Kachel {} angefordert → {}", tile, image_path);
    }

    fn on_tile_refreshed(&self, tile: TileId) {
        log::debug!("Kachel {} aktualisiert", tile);
    }

    fn on_poi_selected(&self, sid: &str) {
        log::info!("POI '{}' selektiert", sid);
    }

    fn on_poi_deselected(&self, sid: &str) {
        log::info!("POI '{}' deselektiert", sid);
    }
}

/// Zählt Diffuse-Map-Aktualisierungen anstelle eines GPU-Uploads.
#[derive(Default)]
struct LoggingSink {
    uploads: usize,
}

impl TileDiffuseSink for LoggingSink {
    fn update_diffuse_map(&mut self, tile: &Tile, image_path: &str) {
        self.uploads += 1;
        log::debug!(
            "Diffuse-Map #{} für Kachel {} aus {}",
            self.uploads,
            tile.id,
            image_path
        );
    }
}
