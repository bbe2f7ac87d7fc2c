//! # animator-core
//!
//! Keyframe tweening for 2D shape animations, and everything that presents
//! or edits the result.
//!
//! ## Modules
//! - [`animation`]: keyframes, easing and interpolation.
//! - [`model`]: the `AnimatorModel` (canvas, shapes, keyframes).
//! - [`views`]: text, SVG and rasterised output.
//! - [`playback`]: the periodic clock driving interactive playback.
//! - [`edit`]: the interactive edit session.
//! - [`scripting`]: Rhai API for authoring animations.
//! - [`loader`]: reading animations from disk.

pub mod animation;
pub mod edit;
pub mod error;
pub mod loader;
pub mod model;
pub mod playback;
pub mod scripting;
pub mod views;

pub use animation::{Color, EasingType, Keyframe, ShapeState};
pub use error::{AnimatorError, Result};
pub use model::{AnimatorModel, Canvas, RenderedShape, Shape};
pub use views::{View, ViewKind};
