use thiserror::Error;

/// Errors raised by the model, the views and the scripting layer.
#[derive(Debug, Error)]
pub enum AnimatorError {
    #[error("shape '{0}' already exists")]
    DuplicateShape(String),

    #[error("no shape named '{0}'")]
    UnknownShape(String),

    #[error("invalid shape id '{0}': ids must be non-empty and contain no whitespace")]
    InvalidShapeId(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("motion of '{shape}' ends at tick {end} before it starts at tick {start}")]
    InvertedMotion { shape: String, start: u32, end: u32 },

    #[error("motion of '{shape}' disagrees with the existing keyframe at tick {tick}")]
    Conflict { shape: String, tick: u32 },

    #[error("motion of '{shape}' from {start} to {end} overlaps the keyframe at tick {tick}")]
    Overlap {
        shape: String,
        start: u32,
        end: u32,
        tick: u32,
    },

    #[error("shape '{shape}' already has a keyframe at tick {tick}")]
    DuplicateKeyframe { shape: String, tick: u32 },

    #[error("shape '{shape}' has no keyframe at tick {tick}")]
    MissingKeyframe { shape: String, tick: u32 },

    #[error("unknown easing '{0}'")]
    UnknownEasing(String),

    #[error("unknown view '{0}' (expected text, svg, visual or edit)")]
    UnknownView(String),

    #[error("speed must be at least one tick per second")]
    InvalidSpeed,

    #[error("failed to render frame {tick}: {message}")]
    Render { tick: u32, message: String },

    #[error("script error: {0}")]
    Script(String),

    #[error(transparent)]
    Parse(#[from] animator_data::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnimatorError>;
