//! # Scripting
//!
//! Animations can be authored as Rhai scripts. The script's final
//! expression must be the animation it built:
//!
//! ```rhai
//! let anim = animation();
//! anim.canvas(0, 0, 400, 300);
//! let r = anim.shape("R", "rectangle");
//! r.motion(1, [10, 10, 50, 50, 255, 0, 0], 20, [300, 10, 50, 50, 0, 0, 255]);
//! r.ease(20, "ease_in_out");
//! anim
//! ```

pub mod api;
pub mod types;

use rhai::Engine;
use tracing::debug;

use crate::error::{AnimatorError, Result};
use crate::model::AnimatorModel;
pub use types::{AnimationHandle, ShapeHandle};

/// Registers the full animation API on `engine`.
pub fn register_rhai_api(engine: &mut Engine) {
    api::register(engine);
}

/// Evaluates `source` and returns the model it built.
pub fn run_script(source: &str) -> Result<AnimatorModel> {
    let mut engine = Engine::new();
    register_rhai_api(&mut engine);

    let handle = engine
        .eval::<AnimationHandle>(source)
        .map_err(|e| AnimatorError::Script(e.to_string()))?;
    let model = handle
        .model
        .lock()
        .map_err(|_| AnimatorError::Script("model lock poisoned".to_string()))?
        .clone();

    debug!(shapes = model.shapes().len(), "script built model");
    Ok(model)
}
