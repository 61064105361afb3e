pub mod graph;
pub mod library;
pub mod state;
pub mod view;

pub use graph::{RenderableId, Scene, SceneOp};
pub use library::{FrameRenderables, RenderableLibrary};
pub use state::{desired, AppliedState, SceneState, TickReport};
pub use view::{resolve_channel, ColorToggles, TrailToggle, ViewSnapshot, ViewState};
