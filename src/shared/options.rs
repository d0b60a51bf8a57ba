//! Zentrale Konfiguration der Geo-Szene.
//!
//! `SceneOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::{
    CameraProjection, Color, Easing, LatLng, LatLngAlt, Poi, PoiVisual, Positioned,
};

// ── Kamera ──────────────────────────────────────────────────────────

/// Vertikales Sichtfeld in Grad.
pub const CAMERA_FOV_Y_DEG: f32 = 60.0;
/// Near-Plane in Metern.
pub const CAMERA_NEAR: f32 = 0.5;
/// Far-Plane in Metern.
pub const CAMERA_FAR: f32 = 100_000.0;
/// Starthöhe der Kamera über dem Ursprung in Metern.
pub const CAMERA_DEFAULT_ALTITUDE: f64 = 1_500.0;
/// Standarddauer eines Kameraflugs in Sekunden.
pub const CAMERA_FLIGHT_DURATION: f32 = 2.0;

// ── Kacheln ─────────────────────────────────────────────────────────

/// Zoomstufe des Kachelrasters.
pub const TILE_ZOOM: u8 = 16;
/// Anzahl Kacheln um die Ursprungskachel (je Richtung).
pub const TILE_RADIUS: u32 = 2;

// ── POIs ────────────────────────────────────────────────────────────

/// Halbe Kantenlänge des Standard-POI-Würfels in Metern.
pub const POI_SIZE_WORLD: f32 = 10.0;
/// Standard-Farbe von POIs (RGBA: Orange).
pub const POI_COLOR_DEFAULT: Color = [1.0, 0.55, 0.0, 1.0];

/// Beschreibung eines POI in der Konfiguration (`[[pois]]`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoiSpec {
    /// ID; leer = anonymer POI
    #[serde(default)]
    pub sid: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt: f64,
    /// Eigene Farbe (sonst `poi_color_default`)
    #[serde(default)]
    pub color: Option<Color>,
    /// Eigene halbe Kantenlänge (sonst `poi_size_world`)
    #[serde(default)]
    pub size: Option<f32>,
}

impl PoiSpec {
    /// Erstellt eine Beschreibung ohne eigene Farbe/Größe.
    pub fn new(sid: impl Into<String>, coords: LatLngAlt) -> Self {
        Self {
            sid: sid.into(),
            lat: coords.lat,
            lon: coords.lon,
            alt: coords.alt,
            color: None,
            size: None,
        }
    }

    pub fn coords(&self) -> LatLngAlt {
        LatLngAlt::new(self.lat, self.lon, self.alt)
    }

    /// Erzeugt den POI mit Würfel-Repräsentation.
    pub fn build(&self, options: &SceneOptions) -> Poi {
        let visual = PoiVisual::cube(
            self.size.unwrap_or(options.poi_size_world),
            self.color.unwrap_or(options.poi_color_default),
        );
        let mut poi = Poi::new(self.sid.clone(), visual);
        poi.set_position(self.lat, self.lon, self.alt);
        poi
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Szenen-Optionen.
/// Wird als `geo_poi_scene.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneOptions {
    // ── Kamera ──────────────────────────────────────────────────
    /// Vertikales Sichtfeld in Grad
    pub camera_fov_y_deg: f32,
    /// Near-Plane in Metern
    pub camera_near: f32,
    /// Far-Plane in Metern
    pub camera_far: f32,
    /// Starthöhe der Kamera in Metern
    pub camera_default_altitude: f64,
    /// Dauer eines Kameraflugs in Sekunden
    pub camera_flight_duration: f32,
    /// Easing eines Kameraflugs
    #[serde(default)]
    pub camera_flight_easing: Easing,

    // ── Kacheln ─────────────────────────────────────────────────
    /// Zoomstufe des Kachelrasters
    pub tile_zoom: u8,
    /// Kacheln um die Ursprungskachel (je Richtung)
    pub tile_radius: u32,
    /// Namensraum (Verzeichnis) der Kachelbilder
    #[serde(default)]
    pub tile_namespace: String,

    // ── POIs ────────────────────────────────────────────────────
    /// Halbe Kantenlänge des POI-Würfels in Metern
    pub poi_size_world: f32,
    /// Standard-Farbe von POIs
    pub poi_color_default: Color,

    // ── Ursprung & Start-POIs ─────────────────────────────────
    /// Ursprung der Render-Welt; ohne Angabe muss der Host ihn setzen
    #[serde(default)]
    pub origin: Option<LatLng>,
    /// POIs, die beim Start angelegt werden
    #[serde(default)]
    pub pois: Vec<PoiSpec>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            camera_fov_y_deg: CAMERA_FOV_Y_DEG,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
            camera_default_altitude: CAMERA_DEFAULT_ALTITUDE,
            camera_flight_duration: CAMERA_FLIGHT_DURATION,
            camera_flight_easing: Easing::EaseInOut,

            tile_zoom: TILE_ZOOM,
            tile_radius: TILE_RADIUS,
            tile_namespace: String::from("tiles"),

            poi_size_world: POI_SIZE_WORLD,
            poi_color_default: POI_COLOR_DEFAULT,

            origin: None,
            pois: Vec::new(),
        }
    }
}

impl SceneOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("geo_poi_scene"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("geo_poi_scene.toml")
    }

    /// Projektionsparameter der Kamera.
    pub fn camera_projection(&self) -> CameraProjection {
        CameraProjection {
            fov_y_deg: self.camera_fov_y_deg,
            near: self.camera_near,
            far: self.camera_far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip_keeps_pois_and_origin() {
        let mut options = SceneOptions::default();
        options.origin = Some(LatLng::new(48.8566, 2.3522));
        options.pois.push(PoiSpec::new("eiffel", LatLngAlt::new(48.8584, 2.2945, 0.0)));

        let text = toml::to_string_pretty(&options).expect("Serialisierung fehlgeschlagen");
        let parsed: SceneOptions = toml::from_str(&text).expect("Parsen fehlgeschlagen");

        assert_eq!(parsed.origin, options.origin);
        assert_eq!(parsed.pois, options.pois);
    }

    #[test]
    fn minimal_poi_entry_uses_defaults() {
        let text = r#"
            camera_fov_y_deg = 45.0
            camera_near = 1.0
            camera_far = 5000.0
            camera_default_altitude = 800.0
            camera_flight_duration = 3.0
            tile_zoom = 15
            tile_radius = 1
            poi_size_world = 4.0
            poi_color_default = [1.0, 1.0, 1.0, 1.0]

            [[pois]]
            sid = "louvre"
            lat = 48.8606
            lon = 2.3376
        "#;
        let options: SceneOptions = toml::from_str(text).expect("Parsen fehlgeschlagen");

        assert!(options.origin.is_none());
        assert!(matches!(options.camera_flight_easing, Easing::Linear));
        let poi = options.pois[0].build(&options);
        assert_eq!(poi.sid(), "louvre");
        assert_eq!(poi.alt(), 0.0);
        assert_eq!(poi.visual().material.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let options = SceneOptions::load_from_file(std::path::Path::new(
            "/nonexistent/geo_poi_scene.toml",
        ));
        assert_eq!(options.tile_zoom, TILE_ZOOM);
    }
}
