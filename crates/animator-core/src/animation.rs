//! # Tweening
//!
//! Keyframe types and the interpolation between them.
//!
//! A shape's appearance at any tick is derived from the two keyframes that
//! bracket it. Every component is interpolated independently, using the
//! easing of the keyframe the segment runs towards.

use animator_data::StateSpec;
use keyframe::EasingFunction;
use std::fmt;
use std::str::FromStr;

use crate::error::AnimatorError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingFunction for EasingType {
    fn y(&self, x: f64) -> f64 {
        match self {
            EasingType::Linear => keyframe::functions::Linear.y(x),
            EasingType::EaseIn => keyframe::functions::EaseIn.y(x),
            EasingType::EaseOut => keyframe::functions::EaseOut.y(x),
            EasingType::EaseInOut => keyframe::functions::EaseInOut.y(x),
        }
    }
}

impl EasingType {
    /// Eases a progress value. The endpoints are exact.
    pub fn eval(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else if x >= 1.0 {
            1.0
        } else {
            self.y(x)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EasingType::Linear => "linear",
            EasingType::EaseIn => "ease_in",
            EasingType::EaseOut => "ease_out",
            EasingType::EaseInOut => "ease_in_out",
        }
    }

    /// Cubic bezier fitted to the sine curve of [`EasingType::eval`], in SVG
    /// `keySplines` order. Stays within 0.001 of `eval` over `0..=1`.
    pub fn control_points(&self) -> Option<[f64; 4]> {
        match self {
            EasingType::Linear => None,
            EasingType::EaseIn => Some([0.36, 0.0, 0.67, 0.48]),
            EasingType::EaseOut => Some([0.33, 0.52, 0.64, 1.0]),
            EasingType::EaseInOut => Some([0.364, 0.0, 0.636, 1.0]),
        }
    }
}

impl FromStr for EasingType {
    type Err = AnimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(EasingType::Linear),
            "ease_in" => Ok(EasingType::EaseIn),
            "ease_out" => Ok(EasingType::EaseOut),
            "ease_in_out" => Ok(EasingType::EaseInOut),
            other => Err(AnimatorError::UnknownEasing(other.to_string())),
        }
    }
}

impl fmt::Display for EasingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Interpolatable: Sized + Clone {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS/SVG functional notation, e.g. `rgb(255,0,0)`.
    pub fn rgb(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Interpolatable for Color {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| (a as f64).lerp(&(b as f64), t).round().clamp(0.0, 255.0) as u8;
        Color {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

/// Position (top-left of the bounding box), size and colour of a shape.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ShapeState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl ShapeState {
    pub fn new(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
        }
    }

    /// Rounds every component back to the integer form used by documents.
    pub fn to_spec(&self) -> StateSpec {
        StateSpec::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
            self.color.r as i32,
            self.color.g as i32,
            self.color.b as i32,
        )
    }
}

impl TryFrom<&StateSpec> for ShapeState {
    type Error = AnimatorError;

    fn try_from(spec: &StateSpec) -> Result<Self, Self::Error> {
        if spec.w < 0 || spec.h < 0 {
            return Err(AnimatorError::InvalidState(format!(
                "size {}x{} is negative",
                spec.w, spec.h
            )));
        }
        let channel = |name: &str, v: i32| {
            u8::try_from(v).map_err(|_| {
                AnimatorError::InvalidState(format!("{} component {} is outside 0..=255", name, v))
            })
        };
        Ok(ShapeState {
            x: spec.x as f64,
            y: spec.y as f64,
            width: spec.w as f64,
            height: spec.h as f64,
            color: Color::new(
                channel("red", spec.r)?,
                channel("green", spec.g)?,
                channel("blue", spec.b)?,
            ),
        })
    }
}

impl Interpolatable for ShapeState {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        ShapeState {
            x: self.x.lerp(&other.x, t),
            y: self.y.lerp(&other.y, t),
            width: self.width.lerp(&other.width, t),
            height: self.height.lerp(&other.height, t),
            color: self.color.lerp(&other.color, t),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub tick: u32,
    pub state: ShapeState,
    /// Easing of the segment that ends at this keyframe.
    pub easing: EasingType,
}

impl Keyframe {
    pub fn new(tick: u32, state: ShapeState) -> Self {
        Self {
            tick,
            state,
            easing: EasingType::Linear,
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }
}

/// State at `tick` on the segment from `from` to `to`.
pub fn tween(from: &Keyframe, to: &Keyframe, tick: u32) -> ShapeState {
    if to.tick <= from.tick {
        return to.state;
    }
    let span = (to.tick - from.tick) as f64;
    let progress = (tick as f64 - from.tick as f64) / span;
    from.state.lerp(&to.state, to.easing.eval(progress))
}
