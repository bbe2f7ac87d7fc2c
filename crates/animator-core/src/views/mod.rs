//! # Views
//!
//! Ways of presenting an [`AnimatorModel`].
//!
//! - [`TextView`]: canonical textual description.
//! - [`SvgView`]: a self-playing SVG document.
//! - [`VisualView`]: rasterised playback frames (animated GIF or PNG files).
//!
//! The interactive edit view lives in [`crate::edit`], since it is driven
//! by commands rather than rendered in one pass.

mod svg;
mod text;
mod visual;

pub use svg::{frame_svg, SvgView};
pub use text::TextView;
pub use visual::{render_frame, VisualOutput, VisualView};

use std::fmt;
use std::str::FromStr;

use crate::error::{AnimatorError, Result};
use crate::model::AnimatorModel;

pub trait View {
    fn render(&mut self, model: &AnimatorModel) -> Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Text,
    Svg,
    Visual,
    Edit,
}

impl FromStr for ViewKind {
    type Err = AnimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ViewKind::Text),
            "svg" => Ok(ViewKind::Svg),
            "visual" => Ok(ViewKind::Visual),
            "edit" => Ok(ViewKind::Edit),
            other => Err(AnimatorError::UnknownView(other.to_string())),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewKind::Text => "text",
            ViewKind::Svg => "svg",
            ViewKind::Visual => "visual",
            ViewKind::Edit => "edit",
        })
    }
}

/// Milliseconds from the start of playback to `tick` at `speed` ticks per second.
pub fn tick_to_ms(tick: u32, speed: u32) -> f64 {
    tick as f64 * 1000.0 / speed as f64
}

/// Formats a number with at most two decimals and no trailing zeros.
pub(crate) fn fmt_num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
