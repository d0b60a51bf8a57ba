//! Geo POI Scene Library.
//! Geo-verankerte 3D-Szene mit POIs, Kamera, Picking und Kacheloberfläche.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    GeoEngineCallbacks, GeoSceneManager, SceneCommand, SceneController, SceneLifecycle,
    SceneState,
};
pub use core::{
    Animatable, Camera3D, CameraController, Easing, GeoFrame, LatLng, LatLngAlt, Poi, PoiKey,
    PoiRegistry, PoiVisual, Positioned, Ray, Selectable,
};
pub use core::{Tile, TileDiffuseSink, TileError, TileId, TileMap, TileNotifier};
pub use shared::{PoiSpec, SceneOptions};
