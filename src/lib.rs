pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod types;
pub mod ui;

pub use error::{BuildError, BuildReport, LoadError};
pub use scene::{RenderableId, RenderableLibrary, Scene, SceneState, ViewState};
pub use session::ViewerSession;
pub use types::{ColorChannel, Label, ObjectClass, Point, TrailId};
