//! # animator-data
//!
//! Plain data structures for keyframe shape animations, plus the
//! line-oriented text format they are usually authored in.
//!
//! Nothing in this crate validates animation semantics (overlapping
//! motions, colour ranges, ...). That is the job of `animator-core`, which
//! builds its model from an [`AnimationDoc`].

pub mod model;
pub mod text;

pub use model::{AnimationDoc, CanvasSpec, MotionSpec, ShapeKind, ShapeSpec, StateSpec};
pub use text::{parse_text, write_text, ParseError};
