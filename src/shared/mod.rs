//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Konfiguration, die zwischen `app` und dem Binary geteilt wird.

pub mod options;

pub use options::{PoiSpec, SceneOptions};
pub use options::{CAMERA_DEFAULT_ALTITUDE, CAMERA_FLIGHT_DURATION, TILE_RADIUS, TILE_ZOOM};
