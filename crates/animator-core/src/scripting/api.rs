//! # Animation API
//!
//! Rhai functions for building animations.
//!
//! ## Responsibilities
//! - **Construction**: `animation()`, `canvas`, `shape`, `remove_shape`
//! - **Keyframes**: `motion`, `keyframe`, `ease`
//! - **Inspection**: `last_tick`, `ids`, shape `id` getter
//! - **Safety Guards**: stale-handle checks and range-checked integers

use animator_data::{ShapeKind, StateSpec};
use rhai::{Array, Dynamic, Engine, EvalAltResult};

use super::types::{AnimationHandle, ShapeHandle};
use crate::animation::EasingType;
use crate::model::Canvas;

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

fn to_i32(what: &str, v: i64) -> ScriptResult<i32> {
    i32::try_from(v).map_err(|_| format!("{} {} is out of range", what, v).into())
}

fn to_u32(what: &str, v: i64) -> ScriptResult<u32> {
    u32::try_from(v).map_err(|_| format!("{} {} must be a non-negative 32-bit integer", what, v).into())
}

/// Reads `[x, y, w, h, r, g, b]`.
fn to_state(values: Array) -> ScriptResult<StateSpec> {
    if values.len() != 7 {
        return Err(format!(
            "a state needs 7 integers [x, y, w, h, r, g, b], found {}",
            values.len()
        )
        .into());
    }
    let mut out = [0i32; 7];
    for (slot, v) in out.iter_mut().zip(values) {
        let n = v
            .as_int()
            .map_err(|t| format!("state values must be integers, found {}", t))?;
        *slot = to_i32("state value", n)?;
    }
    Ok(StateSpec::from_array(out))
}

/// Register animation-building Rhai functions.
pub fn register(engine: &mut Engine) {
    engine.register_type_with_name::<AnimationHandle>("Animation");
    engine.register_type_with_name::<ShapeHandle>("Shape");

    engine.register_fn("animation", AnimationHandle::new);

    engine.register_fn(
        "canvas",
        |anim: &mut AnimationHandle, x: i64, y: i64, w: i64, h: i64| -> ScriptResult<()> {
            let canvas = Canvas {
                x: to_i32("canvas x", x)?,
                y: to_i32("canvas y", y)?,
                width: to_u32("canvas width", w)?,
                height: to_u32("canvas height", h)?,
            };
            if canvas.width == 0 || canvas.height == 0 {
                return Err("canvas must have a positive width and height".into());
            }
            anim.lock_model()?.set_canvas(canvas);
            Ok(())
        },
    );

    engine.register_fn(
        "shape",
        |anim: &mut AnimationHandle, id: &str, kind: &str| -> ScriptResult<ShapeHandle> {
            let kind: ShapeKind = kind.parse::<ShapeKind>()?;
            anim.lock_model()?
                .add_shape(id, kind)
                .map_err(|e| e.to_string())?;
            Ok(ShapeHandle {
                model: anim.model.clone(),
                id: id.to_string(),
            })
        },
    );

    engine.register_fn(
        "remove_shape",
        |anim: &mut AnimationHandle, id: &str| -> ScriptResult<()> {
            anim.lock_model()?
                .remove_shape(id)
                .map_err(|e| e.to_string())?;
            Ok(())
        },
    );

    engine.register_fn("last_tick", |anim: &mut AnimationHandle| -> ScriptResult<i64> {
        Ok(anim.lock_model()?.last_tick() as i64)
    });

    engine.register_fn("ids", |anim: &mut AnimationHandle| -> ScriptResult<Array> {
        Ok(anim
            .lock_model()?
            .ids()
            .into_iter()
            .map(Dynamic::from)
            .collect())
    });

    engine.register_get("id", |shape: &mut ShapeHandle| shape.id.clone());

    engine.register_fn(
        "motion",
        |shape: &mut ShapeHandle, t1: i64, from: Array, t2: i64, to: Array| -> ScriptResult<ShapeHandle> {
            let (t1, t2) = (to_u32("tick", t1)?, to_u32("tick", t2)?);
            let (from, to) = (to_state(from)?, to_state(to)?);
            let mut m = shape.lock_model()?;
            shape.ensure_alive(&m)?;
            m.add_motion(&shape.id, t1, &from, t2, &to, EasingType::Linear)
                .map_err(|e| e.to_string())?;
            Ok(shape.clone())
        },
    );

    engine.register_fn(
        "keyframe",
        |shape: &mut ShapeHandle, tick: i64, state: Array| -> ScriptResult<ShapeHandle> {
            let tick = to_u32("tick", tick)?;
            let state = to_state(state)?;
            let mut m = shape.lock_model()?;
            shape.ensure_alive(&m)?;
            m.add_keyframe(&shape.id, tick, &state, EasingType::Linear)
                .map_err(|e| e.to_string())?;
            Ok(shape.clone())
        },
    );

    engine.register_fn(
        "ease",
        |shape: &mut ShapeHandle, tick: i64, easing: &str| -> ScriptResult<ShapeHandle> {
            let tick = to_u32("tick", tick)?;
            let easing: EasingType = easing.parse().map_err(|e: crate::AnimatorError| e.to_string())?;
            let mut m = shape.lock_model()?;
            shape.ensure_alive(&m)?;
            m.set_easing(&shape.id, tick, easing)
                .map_err(|e| e.to_string())?;
            Ok(shape.clone())
        },
    );
}
