//! Core-Domänentypen: Koordinaten-Frame, POIs, Registry, Kamera, Kacheln.

pub mod animation;
pub mod camera;
pub mod camera_controller;
pub mod capabilities;
pub mod geo_frame;
pub mod lat_lng;
pub mod poi;
pub mod poi_registry;
pub mod ray;
pub mod tile_map;
pub mod visual;

pub use animation::{Easing, RotationAnimation, TranslationAnimation};
pub use camera::{Camera3D, CameraProjection};
pub use camera_controller::CameraController;
pub use capabilities::{Animatable, Positioned, Selectable};
pub use geo_frame::{destination_from, inverse, GeoFrame, Geodesic, EARTH_RADIUS_M};
pub use lat_lng::{LatLng, LatLngAlt};
pub use poi::Poi;
pub use poi_registry::{PoiKey, PoiRegistry};
pub use ray::{Aabb, Ray};
pub use tile_map::{
    DiffuseState, Tile, TileDiffuseSink, TileError, TileId, TileMap, TileNotifier,
};
pub use visual::{Color, Material, Mesh, PoiVisual};
