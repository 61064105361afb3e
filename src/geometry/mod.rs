pub mod extract;
pub mod frame;
pub mod labels;
pub mod trails;

pub use extract::{extract_frame_trails, label_contains};
pub use frame::{ColoredPointSet, FrameBuild, FrameBuilder, FramePointSets, UNIFORM_COLOR};
pub use labels::{LabelBox, LabelBuilder, LABEL_OPACITY};
pub use trails::{TrailBuilder, TrailPointSet, TRAIL_COLOR};
