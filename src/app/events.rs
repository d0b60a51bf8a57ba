//! SceneCommand-Enum für den Command-Datenfluss.

use std::sync::Arc;

use glam::{Mat4, Vec2};

use crate::core::{Easing, LatLng, LatLngAlt};
use crate::shared::PoiSpec;

/// Commands sind mutierende Schritte, die zentral über den
/// [`SceneController`](super::SceneController) ausgeführt werden.
#[derive(Debug, Clone)]
pub enum SceneCommand {
    /// Szene initialisieren
    Init,
    /// Szene entladen
    Unload,
    /// Frame-Tick mit `dt` in Sekunden
    Step { dt: f32 },
    /// Ursprung der Render-Welt setzen
    SetOrigin { origin: LatLng },

    /// POI aus Beschreibung anlegen
    AddPoi { spec: PoiSpec },
    /// POI entfernen
    RemovePoi { sid: String },
    /// Alle POIs entfernen
    RemoveAllPois,
    /// POI animiert verschieben
    MovePoi {
        sid: String,
        coords: LatLngAlt,
        duration: f32,
    },
    /// Farbe eines POI ändern
    SetPoiColor { sid: String, color: [f32; 4] },

    /// Kamera sofort platzieren
    PlaceCamera { coords: LatLngAlt },
    /// Kamera animiert bewegen (`None` = Optionen-Werte)
    FlyCamera {
        coords: LatLngAlt,
        duration: Option<f32>,
        easing: Option<Easing>,
    },
    /// Kamera-Orientierung setzen
    OrientateCamera { rotation: Arc<Mat4> },
    /// Viewport-Größe in Pixeln setzen
    SetViewportSize { size: Vec2 },

    /// POI an Bildschirmposition picken
    Pick { screen_x: i32, screen_y: i32 },
    /// Selektion aufheben
    ClearSelection,

    /// Namensraum der Kachelbilder setzen
    SetTileNamespace { namespace: String },
}
