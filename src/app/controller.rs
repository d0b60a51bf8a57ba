//! Scene Controller für zentrale Command-Verarbeitung.

use anyhow::{bail, Context};

use super::{CommandLog, GeoSceneManager, SceneCommand};

/// Führt Commands auf einer [`GeoSceneManager`]-Instanz aus.
///
/// Fachliche Fehlschläge (doppelter `sid`, unbekannter POI) werden hier
/// zu `anyhow`-Fehlern; die Szene selbst meldet sie nur als `bool`.
#[derive(Debug, Default)]
pub struct SceneController {
    command_log: CommandLog,
}

impl SceneController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.command_log
    }

    /// Führt alle Commands nacheinander aus; bricht beim ersten Fehler ab.
    pub fn handle_commands(
        &mut self,
        scene: &mut GeoSceneManager,
        commands: impl IntoIterator<Item = SceneCommand>,
    ) -> anyhow::Result<()> {
        for command in commands {
            self.handle_command(scene, command)?;
        }
        Ok(())
    }

    /// Führt einen mutierenden Command aus.
    pub fn handle_command(
        &mut self,
        scene: &mut GeoSceneManager,
        command: SceneCommand,
    ) -> anyhow::Result<()> {
        self.command_log.record(&command);

        match command {
            // === Lebenszyklus ===
            SceneCommand::Init => scene.init(),
            SceneCommand::Unload => scene.unload(),
            SceneCommand::Step { dt } => scene.step(dt),
            SceneCommand::SetOrigin { origin } => {
                if !origin.is_valid() {
                    bail!("Ungültiger Ursprung: ({}, {})", origin.lat, origin.lon);
                }
                scene.set_origin(origin.lat, origin.lon);
            }

            // === POIs ===
            SceneCommand::AddPoi { spec } => {
                if !spec.coords().is_valid() {
                    bail!("POI '{}' hat ungültige Koordinaten: {}", spec.sid, spec.coords());
                }
                let poi = spec.build(scene.options());
                if !scene.add_poi(poi) {
                    bail!("POI '{}' existiert bereits", spec.sid);
                }
            }
            SceneCommand::RemovePoi { sid } => {
                if !scene.remove_poi(&sid) {
                    bail!("POI '{}' nicht gefunden", sid);
                }
            }
            SceneCommand::RemoveAllPois => scene.remove_all_pois(),
            SceneCommand::MovePoi {
                sid,
                coords,
                duration,
            } => {
                if !scene.move_poi(&sid, coords, duration) {
                    bail!("POI '{}' nicht gefunden", sid);
                }
            }
            SceneCommand::SetPoiColor { sid, color } => {
                scene
                    .get_poi_mut(&sid)
                    .with_context(|| format!("POI '{sid}' nicht gefunden"))?
                    .set_color(color);
            }

            // === Kamera & Viewport ===
            SceneCommand::PlaceCamera { coords } => {
                if !coords.is_valid() {
                    bail!("Ungültiges Kamera-Ziel: {}", coords);
                }
                scene.place_camera(coords);
            }
            SceneCommand::FlyCamera {
                coords,
                duration,
                easing,
            } => {
                if !coords.is_valid() {
                    bail!("Ungültiges Kamera-Ziel: {}", coords);
                }
                let duration = duration.unwrap_or(scene.options().camera_flight_duration);
                let easing = easing.unwrap_or(scene.options().camera_flight_easing);
                scene.place_camera_animated(coords, duration, easing);
            }
            SceneCommand::OrientateCamera { rotation } => scene.orientate_camera(rotation),
            SceneCommand::SetViewportSize { size } => scene.set_viewport_size(size),

            // === Selektion ===
            SceneCommand::Pick { screen_x, screen_y } => {
                match scene.pick(screen_x, screen_y) {
                    Some(poi) => log::debug!("Pick ({screen_x}, {screen_y}): '{}'", poi.sid()),
                    None => log::debug!("Pick ({screen_x}, {screen_y}): kein Treffer"),
                }
            }
            SceneCommand::ClearSelection => scene.clear_selection(),

            // === Kacheln ===
            SceneCommand::SetTileNamespace { namespace } => scene.set_tile_namespace(namespace),
        }

        Ok(())
    }
}
