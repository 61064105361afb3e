use glam::{Mat4, Quat, Vec3};

use crate::error::BuildError;
use crate::math::sensor_to_scene;
use crate::types::{BoxInstance, Label, ObjectClass, Rgb};

/// Label boxes are drawn translucent
pub const LABEL_OPACITY: f32 = 0.5;

/// Oriented bounding box of one labeled object, scene coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBox {
    pub id: String,
    pub class: ObjectClass,
    pub center: Vec3,
    /// Full edge lengths along the box's local axes
    pub extents: Vec3,
    /// Rotation about the scene's vertical axis, radians
    pub yaw: f32,
}

impl LabelBox {
    pub fn color(&self) -> Rgb {
        self.class.color()
    }

    /// Maps the unit cube centered at the origin onto this box
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.extents,
            Quat::from_rotation_y(self.yaw),
            self.center,
        )
    }

    pub fn to_instance(&self) -> BoxInstance {
        let [r, g, b] = self.color();
        BoxInstance {
            model: self.model_matrix().to_cols_array_2d(),
            color: [r, g, b, LABEL_OPACITY],
        }
    }
}

/// Builds the label boxes of a frame
pub struct LabelBuilder;

impl LabelBuilder {
    /// One box per label. A label with an unknown class produces no box and
    /// an [`BuildError::UnknownClass`]; the rest of the frame still builds.
    pub fn build(frame: usize, labels: &[Label]) -> (Vec<LabelBox>, Vec<BuildError>) {
        let mut boxes = Vec::with_capacity(labels.len());
        let mut errors = Vec::new();

        for label in labels {
            match Self::build_one(label) {
                Some(label_box) => boxes.push(label_box),
                None => errors.push(BuildError::UnknownClass {
                    frame,
                    label: label.id.clone(),
                    class: label.object_class.clone(),
                }),
            }
        }

        (boxes, errors)
    }

    fn build_one(label: &Label) -> Option<LabelBox> {
        let class = ObjectClass::parse(&label.object_class)?;
        Some(LabelBox {
            id: label.id.clone(),
            class,
            // Box rests on based_z, so its center sits half a height above
            center: sensor_to_scene(
                label.center_x,
                label.center_y,
                label.based_z + label.size_z / 2.0,
            ),
            extents: sensor_to_scene(label.size_x, label.size_y, label.size_z),
            yaw: label.yaw_angle,
        })
    }
}
