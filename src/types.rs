use std::fmt;

use serde::Deserialize;

/// Linear RGB triple, components nominally in [0, 1]
pub type Rgb = [f32; 3];

/// Single lidar return in sensor coordinates (z up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Reflectivity, typically in [0, 0.4]
    pub intensity: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self { x, y, z, intensity }
    }

    pub const fn from_row(row: [f32; 4]) -> Self {
        Self::new(row[0], row[1], row[2], row[3])
    }

    /// Radial distance from the sensor in the horizontal plane
    pub fn horizontal_distance(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.intensity.is_finite()
    }
}

/// Scalar-to-color mode applied to a frame's points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ColorChannel {
    Height,
    Distance,
    Reflection,
    #[default]
    Uniform,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 4] = [
        ColorChannel::Height,
        ColorChannel::Distance,
        ColorChannel::Reflection,
        ColorChannel::Uniform,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ColorChannel::Height => "height",
            ColorChannel::Distance => "distance",
            ColorChannel::Reflection => "reflection",
            ColorChannel::Uniform => "uniform",
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Annotated object class of a label box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Car,
    Pedestrian,
    Cyclist,
    Sign,
}

impl ObjectClass {
    /// Parse the dataset's class code (`CAR`, `PED`, `CYC`, `SIGN`)
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "CAR" => Some(ObjectClass::Car),
            "PED" => Some(ObjectClass::Pedestrian),
            "CYC" => Some(ObjectClass::Cyclist),
            "SIGN" => Some(ObjectClass::Sign),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            ObjectClass::Car => "CAR",
            ObjectClass::Pedestrian => "PED",
            ObjectClass::Cyclist => "CYC",
            ObjectClass::Sign => "SIGN",
        }
    }

    /// Fixed display color for the class
    pub const fn color(self) -> Rgb {
        match self {
            ObjectClass::Car => [1.0, 0.0, 0.0],
            ObjectClass::Pedestrian => [0.0, 1.0, 0.0],
            ObjectClass::Cyclist => [0.0, 0.0, 1.0],
            ObjectClass::Sign => [1.0, 1.0, 0.0],
        }
    }
}

/// Label record as stored in the per-frame label files
///
/// `object_class` stays a raw string until the label is built so that an
/// unknown class is reported against the label instead of failing the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub id: String,
    pub center_x: f32,
    pub center_y: f32,
    pub based_z: f32,
    pub size_x: f32,
    pub size_y: f32,
    pub size_z: f32,
    pub yaw_angle: f32,
    pub object_class: String,
}

impl Label {
    /// Name of the first geometry field that is NaN or infinite
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("center_x", self.center_x),
            ("center_y", self.center_y),
            ("based_z", self.based_z),
            ("size_x", self.size_x),
            ("size_y", self.size_y),
            ("size_z", self.size_z),
            ("yaw_angle", self.yaw_angle),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }
}

/// Stable identifier of a tracked object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailId(String);

impl TrailId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrailId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for TrailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Historical position of a tracked object, sensor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrailPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One frame's trail snapshot, in file order. An empty list means the
/// object was not tracked in that frame.
pub type FrameTrails = Vec<(TrailId, Vec<TrailPosition>)>;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Per-instance data for one label box
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoxInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}
