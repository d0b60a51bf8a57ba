//! Rückruf-Schnittstelle zur externen Kachel-/Netzwerk-Schicht.

use crate::core::TileId;

/// Ereignisse, die die Szene an den Host meldet.
///
/// Alle Methoden haben leere Standard-Implementierungen; der Host
/// überschreibt nur, was er braucht.
pub trait GeoEngineCallbacks {
    /// Eine Kachel wird benötigt; der Loader soll das Bild unter `image_path` ablegen.
    fn on_tile_requested(&self, _tile: TileId, _image_path: &str) {}

    /// Die Diffuse-Map einer Kachel wurde an den Renderer übergeben.
    fn on_tile_refreshed(&self, _tile: TileId) {}

    /// Ein POI wurde per Picking selektiert (`sid` leer bei anonymen POIs).
    fn on_poi_selected(&self, _sid: &str) {}

    /// Ein POI wurde deselektiert oder mitsamt Selektion entfernt.
    fn on_poi_deselected(&self, _sid: &str) {}
}
