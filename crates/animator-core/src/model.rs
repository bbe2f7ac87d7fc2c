//! # Animator Model
//!
//! Canvas plus an ordered set of shapes, each carrying its keyframes.
//!
//! ## Responsibilities
//! - **Shape Storage**: shapes keep their declaration order, which is also
//!   their paint order (later shapes are drawn on top).
//! - **Keyframe Storage**: at most one keyframe per tick, kept sorted.
//! - **Motion Validation**: motions must agree with keyframes they touch and
//!   must not swallow an existing keyframe.
//! - **Tweening**: `tween(tick)` resolves every visible shape at a tick.

use animator_data::{AnimationDoc, CanvasSpec, MotionSpec, ShapeKind, ShapeSpec, StateSpec};
use std::collections::BTreeMap;
use tracing::debug;

use crate::animation::{tween, EasingType, Keyframe, ShapeState};
use crate::error::{AnimatorError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 500,
            height: 500,
        }
    }
}

impl TryFrom<&CanvasSpec> for Canvas {
    type Error = AnimatorError;

    fn try_from(spec: &CanvasSpec) -> Result<Self> {
        if spec.width == 0 || spec.height == 0 {
            return Err(AnimatorError::InvalidCanvas(format!(
                "{}x{} has no area",
                spec.width, spec.height
            )));
        }
        Ok(Canvas {
            x: spec.x,
            y: spec.y,
            width: spec.width,
            height: spec.height,
        })
    }
}

impl From<Canvas> for CanvasSpec {
    fn from(c: Canvas) -> Self {
        CanvasSpec {
            x: c.x,
            y: c.y,
            width: c.width,
            height: c.height,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Shape {
    pub id: String,
    pub kind: ShapeKind,
    keyframes: BTreeMap<u32, Keyframe>,
}

impl Shape {
    fn new(id: String, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            keyframes: BTreeMap::new(),
        }
    }

    pub fn keyframes(&self) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.values()
    }

    pub fn keyframe(&self, tick: u32) -> Option<&Keyframe> {
        self.keyframes.get(&tick)
    }

    pub fn first_tick(&self) -> Option<u32> {
        self.keyframes.keys().next().copied()
    }

    pub fn last_tick(&self) -> Option<u32> {
        self.keyframes.keys().next_back().copied()
    }

    /// State at `tick`, or `None` before the first keyframe.
    ///
    /// After the last keyframe the final state is held.
    pub fn state_at(&self, tick: u32) -> Option<ShapeState> {
        let before = self.keyframes.range(..=tick).next_back().map(|(_, k)| k)?;
        match self.keyframes.range(tick..).next() {
            Some((_, after)) => Some(tween(before, after, tick)),
            None => Some(before.state),
        }
    }
}

/// A shape resolved at one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedShape {
    pub id: String,
    pub kind: ShapeKind,
    pub state: ShapeState,
}

#[derive(Clone, Debug, Default)]
pub struct AnimatorModel {
    canvas: Canvas,
    shapes: Vec<Shape>,
}

impl AnimatorModel {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            shapes: Vec::new(),
        }
    }

    /// Builds a model from a parsed document, validating every motion.
    pub fn from_doc(doc: &AnimationDoc) -> Result<Self> {
        let canvas = match &doc.canvas {
            Some(spec) => Canvas::try_from(spec)?,
            None => Canvas::default(),
        };
        let mut model = Self::new(canvas);

        for shape in &doc.shapes {
            model.add_shape(&shape.id, shape.kind)?;
        }
        for m in &doc.motions {
            let easing = match &m.easing {
                Some(name) => name.parse::<EasingType>()?,
                None => EasingType::Linear,
            };
            model.add_motion(&m.shape, m.start_tick, &m.start, m.end_tick, &m.end, easing)?;
        }

        debug!(
            shapes = model.shapes.len(),
            last_tick = model.last_tick(),
            "built model from document"
        );
        Ok(model)
    }

    /// Describes the model as a document: one motion per consecutive keyframe pair.
    pub fn to_doc(&self) -> AnimationDoc {
        let mut doc = AnimationDoc {
            canvas: Some(self.canvas.into()),
            shapes: Vec::with_capacity(self.shapes.len()),
            motions: Vec::new(),
        };

        for shape in &self.shapes {
            doc.shapes.push(ShapeSpec {
                id: shape.id.clone(),
                kind: shape.kind,
            });

            // The first keyframe has no incoming segment, so a lone keyframe or
            // a non-linear easing on the first one is written as a zero-length
            // motion ahead of the segments.
            let frames: Vec<&Keyframe> = shape.keyframes().collect();
            if let Some(first) = frames.first() {
                if frames.len() == 1 || first.easing != EasingType::Linear {
                    doc.motions.push(motion_spec(&shape.id, first, first));
                }
            }
            for pair in frames.windows(2) {
                doc.motions.push(motion_spec(&shape.id, pair[0], pair[1]));
            }
        }

        doc
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn shape_mut(&mut self, id: &str) -> Result<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AnimatorError::UnknownShape(id.to_string()))
    }

    /// Shape ids in declaration order.
    pub fn ids(&self) -> Vec<String> {
        self.shapes.iter().map(|s| s.id.clone()).collect()
    }

    pub fn keyframes(&self, id: &str) -> Result<Vec<Keyframe>> {
        self.shape(id)
            .map(|s| s.keyframes().copied().collect())
            .ok_or_else(|| AnimatorError::UnknownShape(id.to_string()))
    }

    pub fn add_shape(&mut self, id: &str, kind: ShapeKind) -> Result<()> {
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(AnimatorError::InvalidShapeId(id.to_string()));
        }
        if self.shape(id).is_some() {
            return Err(AnimatorError::DuplicateShape(id.to_string()));
        }
        debug!(id, %kind, "add shape");
        self.shapes.push(Shape::new(id.to_string(), kind));
        Ok(())
    }

    pub fn remove_shape(&mut self, id: &str) -> Result<()> {
        let idx = self
            .shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AnimatorError::UnknownShape(id.to_string()))?;
        debug!(id, "remove shape");
        self.shapes.remove(idx);
        Ok(())
    }

    /// Adds the motion `start@t1 -> end@t2` as a pair of keyframes.
    pub fn add_motion(
        &mut self,
        id: &str,
        t1: u32,
        start: &StateSpec,
        t2: u32,
        end: &StateSpec,
        easing: EasingType,
    ) -> Result<()> {
        if t2 < t1 {
            return Err(AnimatorError::InvertedMotion {
                shape: id.to_string(),
                start: t1,
                end: t2,
            });
        }
        let start = ShapeState::try_from(start)?;
        let end = ShapeState::try_from(end)?;
        if t1 == t2 && start != end {
            return Err(AnimatorError::Conflict {
                shape: id.to_string(),
                tick: t1,
            });
        }
        let shape = self.shape_mut(id)?;

        for (tick, state) in [(t1, &start), (t2, &end)] {
            if let Some(existing) = shape.keyframes.get(&tick) {
                if existing.state != *state {
                    return Err(AnimatorError::Conflict {
                        shape: id.to_string(),
                        tick,
                    });
                }
            }
        }
        if t2 > t1 {
            if let Some((&tick, _)) = shape.keyframes.range(t1 + 1..t2).next() {
                return Err(AnimatorError::Overlap {
                    shape: id.to_string(),
                    start: t1,
                    end: t2,
                    tick,
                });
            }
        }

        if t1 == t2 {
            // A single keyframe; an existing one keeps its easing.
            shape
                .keyframes
                .entry(t1)
                .or_insert_with(|| Keyframe::new(t1, start).with_easing(easing));
        } else {
            shape
                .keyframes
                .entry(t1)
                .or_insert_with(|| Keyframe::new(t1, start));
            shape
                .keyframes
                .insert(t2, Keyframe::new(t2, end).with_easing(easing));
        }

        debug!(id, t1, t2, %easing, "add motion");
        Ok(())
    }

    pub fn add_keyframe(
        &mut self,
        id: &str,
        tick: u32,
        state: &StateSpec,
        easing: EasingType,
    ) -> Result<()> {
        let state = ShapeState::try_from(state)?;
        let shape = self.shape_mut(id)?;
        if shape.keyframes.contains_key(&tick) {
            return Err(AnimatorError::DuplicateKeyframe {
                shape: id.to_string(),
                tick,
            });
        }
        shape
            .keyframes
            .insert(tick, Keyframe::new(tick, state).with_easing(easing));
        debug!(id, tick, "add keyframe");
        Ok(())
    }

    pub fn remove_keyframe(&mut self, id: &str, tick: u32) -> Result<Keyframe> {
        let shape = self.shape_mut(id)?;
        let removed = shape
            .keyframes
            .remove(&tick)
            .ok_or_else(|| AnimatorError::MissingKeyframe {
                shape: id.to_string(),
                tick,
            })?;
        debug!(id, tick, "remove keyframe");
        Ok(removed)
    }

    /// Replaces the state of an existing keyframe. Invalid input leaves it untouched.
    pub fn modify_keyframe(&mut self, id: &str, tick: u32, state: &StateSpec) -> Result<()> {
        let state = ShapeState::try_from(state)?;
        let shape = self.shape_mut(id)?;
        let frame = shape
            .keyframes
            .get_mut(&tick)
            .ok_or_else(|| AnimatorError::MissingKeyframe {
                shape: id.to_string(),
                tick,
            })?;
        frame.state = state;
        debug!(id, tick, "modify keyframe");
        Ok(())
    }

    pub fn set_easing(&mut self, id: &str, tick: u32, easing: EasingType) -> Result<()> {
        let shape = self.shape_mut(id)?;
        let frame = shape
            .keyframes
            .get_mut(&tick)
            .ok_or_else(|| AnimatorError::MissingKeyframe {
                shape: id.to_string(),
                tick,
            })?;
        frame.easing = easing;
        Ok(())
    }

    /// Every shape visible at `tick`, in paint order.
    pub fn tween(&self, tick: u32) -> Vec<RenderedShape> {
        self.shapes
            .iter()
            .filter_map(|shape| {
                shape.state_at(tick).map(|state| RenderedShape {
                    id: shape.id.clone(),
                    kind: shape.kind,
                    state,
                })
            })
            .collect()
    }

    /// Greatest keyframe tick over all shapes, 0 when there is none.
    pub fn last_tick(&self) -> u32 {
        self.shapes
            .iter()
            .filter_map(Shape::last_tick)
            .max()
            .unwrap_or(0)
    }

    pub fn is_animation_done(&self, tick: u32) -> bool {
        tick > self.last_tick()
    }
}

fn motion_spec(id: &str, from: &Keyframe, to: &Keyframe) -> MotionSpec {
    MotionSpec {
        shape: id.to_string(),
        start_tick: from.tick,
        start: from.state.to_spec(),
        end_tick: to.tick,
        end: to.state.to_spec(),
        easing: match to.easing {
            EasingType::Linear => None,
            other => Some(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(x: i32) -> StateSpec {
        StateSpec::new(x, 0, 10, 10, 255, 0, 0)
    }

    fn model_with_r() -> AnimatorModel {
        let mut m = AnimatorModel::default();
        m.add_shape("R", ShapeKind::Rectangle).unwrap();
        m
    }

    #[test]
    fn contiguous_motions_share_endpoints() {
        let mut m = model_with_r();
        m.add_motion("R", 1, &red(0), 10, &red(90), EasingType::Linear).unwrap();
        m.add_motion("R", 10, &red(90), 20, &red(0), EasingType::Linear).unwrap();
        assert_eq!(m.keyframes("R").unwrap().len(), 3);
        assert_eq!(m.last_tick(), 20);
    }

    #[test]
    fn mismatched_endpoint_is_a_conflict() {
        let mut m = model_with_r();
        m.add_motion("R", 1, &red(0), 10, &red(90), EasingType::Linear).unwrap();
        let err = m
            .add_motion("R", 10, &red(50), 20, &red(0), EasingType::Linear)
            .unwrap_err();
        assert!(matches!(err, AnimatorError::Conflict { tick: 10, .. }));
    }

    #[test]
    fn motion_may_not_swallow_keyframes() {
        let mut m = model_with_r();
        m.add_motion("R", 5, &red(0), 8, &red(30), EasingType::Linear).unwrap();
        let err = m
            .add_motion("R", 1, &red(0), 20, &red(0), EasingType::Linear)
            .unwrap_err();
        assert!(matches!(err, AnimatorError::Overlap { tick: 5, .. }));
    }

    #[test]
    fn zero_length_motion_must_not_change_state() {
        let mut m = model_with_r();
        let blue = StateSpec::new(99, 0, 10, 10, 0, 0, 255);
        let err = m
            .add_motion("R", 5, &red(0), 5, &blue, EasingType::Linear)
            .unwrap_err();
        assert!(matches!(err, AnimatorError::Conflict { tick: 5, .. }));
        assert!(m.keyframes("R").unwrap().is_empty());

        m.add_motion("R", 5, &red(0), 5, &red(0), EasingType::EaseIn).unwrap();
        let frames = m.keyframes("R").unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].easing, EasingType::EaseIn);
    }

    #[test]
    fn first_keyframe_easing_survives_the_document() {
        let mut m = model_with_r();
        m.add_motion("R", 1, &red(0), 1, &red(0), EasingType::EaseOut).unwrap();
        m.add_motion("R", 1, &red(0), 10, &red(50), EasingType::Linear).unwrap();
        m.add_shape("lone", ShapeKind::Ellipse).unwrap();
        m.add_keyframe("lone", 3, &red(1), EasingType::EaseInOut).unwrap();

        let doc = m.to_doc();
        assert_eq!(doc.motions.len(), 3);
        assert_eq!(doc.motions[0].end_tick, 1);
        assert_eq!(doc.motions[0].easing.as_deref(), Some("ease_out"));

        let rebuilt = AnimatorModel::from_doc(&doc).unwrap();
        assert_eq!(rebuilt.keyframes("R").unwrap(), m.keyframes("R").unwrap());
        assert_eq!(rebuilt.keyframes("lone").unwrap()[0].easing, EasingType::EaseInOut);
    }

    #[test]
    fn inverted_motion_rejected() {
        let mut m = model_with_r();
        assert!(matches!(
            m.add_motion("R", 9, &red(0), 3, &red(0), EasingType::Linear),
            Err(AnimatorError::InvertedMotion { .. })
        ));
    }

    #[test]
    fn shape_ids_are_validated() {
        let mut m = model_with_r();
        assert!(matches!(
            m.add_shape("R", ShapeKind::Ellipse),
            Err(AnimatorError::DuplicateShape(_))
        ));
        assert!(matches!(
            m.add_shape("two words", ShapeKind::Ellipse),
            Err(AnimatorError::InvalidShapeId(_))
        ));
        assert!(matches!(
            m.add_shape("", ShapeKind::Ellipse),
            Err(AnimatorError::InvalidShapeId(_))
        ));
    }

    #[test]
    fn tween_hides_before_first_and_holds_after_last() {
        let mut m = model_with_r();
        m.add_motion("R", 5, &red(0), 15, &red(100), EasingType::Linear).unwrap();

        assert!(m.tween(4).is_empty());
        assert_eq!(m.tween(10)[0].state.x, 50.0);
        assert_eq!(m.tween(15)[0].state.x, 100.0);
        assert_eq!(m.tween(40)[0].state.x, 100.0);
    }

    #[test]
    fn tween_keeps_declaration_order_and_skips_empty_shapes() {
        let mut m = model_with_r();
        m.add_shape("E", ShapeKind::Ellipse).unwrap();
        m.add_shape("empty", ShapeKind::Ellipse).unwrap();
        m.add_keyframe("E", 1, &red(3), EasingType::Linear).unwrap();
        m.add_keyframe("R", 1, &red(4), EasingType::Linear).unwrap();

        let ids: Vec<String> = m.tween(1).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["R", "E"]);
    }

    #[test]
    fn keyframe_editing() {
        let mut m = model_with_r();
        m.add_keyframe("R", 3, &red(0), EasingType::Linear).unwrap();
        assert!(matches!(
            m.add_keyframe("R", 3, &red(1), EasingType::Linear),
            Err(AnimatorError::DuplicateKeyframe { .. })
        ));

        let bad = StateSpec::new(0, 0, 10, 10, 300, 0, 0);
        assert!(m.modify_keyframe("R", 3, &bad).is_err());
        assert_eq!(m.keyframes("R").unwrap()[0].state.x, 0.0);

        m.modify_keyframe("R", 3, &red(7)).unwrap();
        assert_eq!(m.keyframes("R").unwrap()[0].state.x, 7.0);

        m.remove_keyframe("R", 3).unwrap();
        assert!(matches!(
            m.remove_keyframe("R", 3),
            Err(AnimatorError::MissingKeyframe { .. })
        ));
    }

    #[test]
    fn to_doc_emits_one_motion_per_segment() {
        let mut m = model_with_r();
        m.add_shape("S", ShapeKind::Ellipse).unwrap();
        m.add_motion("R", 1, &red(0), 10, &red(90), EasingType::Linear).unwrap();
        m.add_motion("R", 10, &red(90), 20, &red(0), EasingType::EaseOut).unwrap();
        m.add_keyframe("S", 4, &red(1), EasingType::Linear).unwrap();

        let doc = m.to_doc();
        assert_eq!(doc.motions.len(), 3);
        assert_eq!(doc.motions[1].easing.as_deref(), Some("ease_out"));
        assert_eq!(doc.motions[2].start_tick, 4);
        assert_eq!(doc.motions[2].end_tick, 4);

        let rebuilt = AnimatorModel::from_doc(&doc).unwrap();
        assert_eq!(rebuilt.to_doc(), doc);
    }

    #[test]
    fn removing_a_shape_shortens_the_animation() {
        let mut m = model_with_r();
        m.add_shape("late", ShapeKind::Ellipse).unwrap();
        m.add_keyframe("R", 2, &red(0), EasingType::Linear).unwrap();
        m.add_keyframe("late", 50, &red(0), EasingType::Linear).unwrap();
        assert!(!m.is_animation_done(50));

        m.remove_shape("late").unwrap();
        assert_eq!(m.ids(), vec!["R"]);
        assert!(m.is_animation_done(3));
    }

    #[test]
    fn empty_canvas_rejected() {
        let doc = AnimationDoc {
            canvas: Some(CanvasSpec { x: 0, y: 0, width: 0, height: 10 }),
            ..Default::default()
        };
        assert!(matches!(
            AnimatorModel::from_doc(&doc),
            Err(AnimatorError::InvalidCanvas(_))
        ));
    }
}
