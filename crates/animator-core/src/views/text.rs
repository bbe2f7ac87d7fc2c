use animator_data::write_text;
use std::io::Write;
use tracing::info;

use super::View;
use crate::error::Result;
use crate::model::AnimatorModel;

/// Writes the canonical text description of a model.
pub struct TextView<W: Write> {
    out: W,
}

impl<W: Write> TextView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for TextView<W> {
    fn render(&mut self, model: &AnimatorModel) -> Result<()> {
        let text = write_text(&model.to_doc());
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        info!(shapes = model.shapes().len(), "wrote text description");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::EasingType;
    use animator_data::{ShapeKind, StateSpec};

    #[test]
    fn describes_canvas_shapes_and_motions() {
        let mut model = AnimatorModel::default();
        model.add_shape("R", ShapeKind::Rectangle).unwrap();
        model.add_shape("C", ShapeKind::Ellipse).unwrap();
        let a = StateSpec::new(200, 200, 50, 100, 255, 0, 0);
        let b = StateSpec::new(300, 300, 50, 100, 255, 0, 0);
        model.add_motion("R", 1, &a, 10, &b, EasingType::Linear).unwrap();

        let mut view = TextView::new(Vec::new());
        view.render(&model).unwrap();
        let text = String::from_utf8(view.into_inner()).unwrap();

        assert_eq!(
            text,
            "canvas 0 0 500 500\n\
             shape R rectangle\n\
             shape C ellipse\n\
             motion R 1 200 200 50 100 255 0 0  10 300 300 50 100 255 0 0\n"
        );
    }
}
