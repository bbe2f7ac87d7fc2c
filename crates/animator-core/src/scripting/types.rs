//! # Scripting Types
//!
//! Handle types for Rhai scripting integration.
//!
//! ## Responsibilities
//! - **AnimationHandle**: Wrapper around the `AnimatorModel` being built
//! - **ShapeHandle**: Reference to one shape of that model
//! - **Handle Validation**: Shared helpers for lock/stale-handle safety

use crate::model::AnimatorModel;
use rhai::EvalAltResult;
use std::sync::{Arc, Mutex, MutexGuard};

/// Wrapper around `AnimatorModel` for Rhai scripting.
#[derive(Clone)]
pub struct AnimationHandle {
    pub model: Arc<Mutex<AnimatorModel>>,
}

/// Handle to a specific shape in the model.
#[derive(Clone)]
pub struct ShapeHandle {
    pub model: Arc<Mutex<AnimatorModel>>,
    pub id: String,
}

impl AnimationHandle {
    pub fn new() -> Self {
        Self {
            model: Arc::new(Mutex::new(AnimatorModel::default())),
        }
    }

    pub fn lock_model(&self) -> Result<MutexGuard<'_, AnimatorModel>, Box<EvalAltResult>> {
        self.model.lock().map_err(|_| "Model lock poisoned".into())
    }
}

impl Default for AnimationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeHandle {
    pub fn lock_model(&self) -> Result<MutexGuard<'_, AnimatorModel>, Box<EvalAltResult>> {
        self.model.lock().map_err(|_| "Model lock poisoned".into())
    }

    pub fn ensure_alive(&self, model: &AnimatorModel) -> Result<(), Box<EvalAltResult>> {
        if model.shape(&self.id).is_some() {
            Ok(())
        } else {
            Err(format!("ShapeHandle '{}' is stale (shape was removed)", self.id).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationHandle, ShapeHandle};
    use animator_data::ShapeKind;

    #[test]
    fn ensure_alive_detects_removed_shapes() {
        let anim = AnimationHandle::new();
        anim.model
            .lock()
            .unwrap()
            .add_shape("R", ShapeKind::Rectangle)
            .unwrap();

        let handle = ShapeHandle {
            model: anim.model.clone(),
            id: "R".to_string(),
        };

        {
            let m = anim.model.lock().unwrap();
            assert!(handle.ensure_alive(&m).is_ok());
        }

        anim.model.lock().unwrap().remove_shape("R").unwrap();

        let m = anim.model.lock().unwrap();
        assert!(handle.ensure_alive(&m).is_err());
    }
}
