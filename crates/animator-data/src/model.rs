use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            "ellipse" | "oval" => Ok(ShapeKind::Ellipse),
            other => Err(format!("unknown shape kind '{}'", other)),
        }
    }
}

/// A keyframe state exactly as written in a document.
///
/// Values are kept signed so that out-of-range input (negative sizes,
/// colours above 255) survives parsing and can be reported by the model.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSpec {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl StateSpec {
    pub fn new(x: i32, y: i32, w: i32, h: i32, r: i32, g: i32, b: i32) -> Self {
        Self { x, y, w, h, r, g, b }
    }

    pub fn to_array(&self) -> [i32; 7] {
        [self.x, self.y, self.w, self.h, self.r, self.g, self.b]
    }

    pub fn from_array(v: [i32; 7]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5], v[6])
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShapeSpec {
    pub id: String,
    pub kind: ShapeKind,
}

/// A motion of one shape from `start` at `start_tick` to `end` at `end_tick`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MotionSpec {
    pub shape: String,
    pub start_tick: u32,
    pub start: StateSpec,
    pub end_tick: u32,
    pub end: StateSpec,
    /// Easing of the segment, `None` means linear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AnimationDoc {
    #[serde(default)]
    pub canvas: Option<CanvasSpec>,
    #[serde(default)]
    pub shapes: Vec<ShapeSpec>,
    #[serde(default)]
    pub motions: Vec<MotionSpec>,
}

impl AnimationDoc {
    pub fn from_json(src: &str) -> serde_json::Result<Self> {
        serde_json::from_str(src)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
