//! Application-Layer: Szenen-Verwaltung, Picking, Controller und Events.

pub mod callbacks;
pub mod command_log;
pub mod controller;
pub mod events;
pub mod picking;
pub mod scene_manager;
pub mod selection;

pub use callbacks::GeoEngineCallbacks;
pub use command_log::CommandLog;
pub use controller::SceneController;
pub use events::SceneCommand;
pub use picking::{nearest_hit, PickOutcome, PickingService};
pub use scene_manager::{GeoSceneManager, SceneLifecycle, SceneState};
pub use selection::{LastPick, SelectionState};
