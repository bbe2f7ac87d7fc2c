//! # SVG View
//!
//! Two outputs share the element writers here:
//! - [`SvgView`] writes a self-playing document where every keyframe
//!   segment becomes a set of `<animate>` elements.
//! - [`frame_svg`] writes a static picture of one tick, which the visual
//!   view rasterises and the edit session uses as its preview.

use animator_data::ShapeKind;
use std::fmt::Write as _;
use std::io::Write;
use tracing::info;

use super::{fmt_num, tick_to_ms, View};
use crate::animation::{Color, EasingType, Keyframe, ShapeState};
use crate::error::{AnimatorError, Result};
use crate::model::{AnimatorModel, Canvas, RenderedShape, Shape};

pub struct SvgView<W: Write> {
    out: W,
    speed: u32,
}

impl<W: Write> SvgView<W> {
    /// `speed` is the playback rate in ticks per second.
    pub fn new(out: W, speed: u32) -> Result<Self> {
        if speed == 0 {
            return Err(AnimatorError::InvalidSpeed);
        }
        Ok(Self { out, speed })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for SvgView<W> {
    fn render(&mut self, model: &AnimatorModel) -> Result<()> {
        let mut doc = open_svg(model.canvas());
        for shape in model.shapes() {
            write_animated_shape(&mut doc, shape, self.speed);
        }
        doc.push_str("</svg>\n");

        self.out.write_all(doc.as_bytes())?;
        self.out.flush()?;
        info!(
            shapes = model.shapes().len(),
            speed = self.speed,
            "wrote svg animation"
        );
        Ok(())
    }
}

/// A static SVG picture of `shapes` on `canvas`, painted over `background`.
pub fn frame_svg(canvas: Canvas, shapes: &[RenderedShape], background: Option<Color>) -> String {
    let mut doc = open_svg(canvas);
    if let Some(bg) = background {
        let _ = writeln!(
            doc,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" />",
            canvas.x,
            canvas.y,
            canvas.width,
            canvas.height,
            bg.rgb()
        );
    }
    for shape in shapes {
        let _ = write!(doc, "<{} id=\"{}\"", tag(shape.kind), escape(&shape.id));
        write_geometry(&mut doc, shape.kind, &shape.state);
        doc.push_str(" />\n");
    }
    doc.push_str("</svg>\n");
    doc
}

fn open_svg(canvas: Canvas) -> String {
    format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"{x} {y} {w} {h}\" version=\"1.1\" \
         xmlns=\"http://www.w3.org/2000/svg\">\n",
        x = canvas.x,
        y = canvas.y,
        w = canvas.width,
        h = canvas.height
    )
}

fn tag(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Rectangle => "rect",
        ShapeKind::Ellipse => "ellipse",
    }
}

/// SVG attributes describing the shape's bounds. Ellipses are centred in
/// their bounding box.
fn geometry(kind: ShapeKind, s: &ShapeState) -> [(&'static str, f64); 4] {
    match kind {
        ShapeKind::Rectangle => [
            ("x", s.x),
            ("y", s.y),
            ("width", s.width),
            ("height", s.height),
        ],
        ShapeKind::Ellipse => [
            ("cx", s.x + s.width / 2.0),
            ("cy", s.y + s.height / 2.0),
            ("rx", s.width / 2.0),
            ("ry", s.height / 2.0),
        ],
    }
}

fn write_geometry(doc: &mut String, kind: ShapeKind, s: &ShapeState) {
    for (name, value) in geometry(kind, s) {
        let _ = write!(doc, " {}=\"{}\"", name, fmt_num(value));
    }
    let _ = write!(doc, " fill=\"{}\"", s.color.rgb());
}

fn write_animated_shape(doc: &mut String, shape: &Shape, speed: u32) {
    let frames: Vec<&Keyframe> = shape.keyframes().collect();
    let Some(first) = frames.first() else {
        return;
    };

    let _ = write!(doc, "<{} id=\"{}\"", tag(shape.kind), escape(&shape.id));
    write_geometry(doc, shape.kind, &first.state);
    doc.push_str(" visibility=\"hidden\">\n");
    let _ = writeln!(
        doc,
        "  <set attributeName=\"visibility\" to=\"visible\" begin=\"{}ms\" fill=\"freeze\" />",
        fmt_num(tick_to_ms(first.tick, speed))
    );

    for pair in frames.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let begin = fmt_num(tick_to_ms(from.tick, speed));
        let dur = fmt_num(tick_to_ms(to.tick - from.tick, speed));
        let timing = spline_attrs(to.easing);

        let before = geometry(shape.kind, &from.state);
        let after = geometry(shape.kind, &to.state);
        for ((name, a), (_, b)) in before.iter().zip(after.iter()) {
            if fmt_num(*a) != fmt_num(*b) {
                let _ = writeln!(
                    doc,
                    "  <animate attributeType=\"xml\" begin=\"{}ms\" dur=\"{}ms\" attributeName=\"{}\" from=\"{}\" to=\"{}\"{} fill=\"freeze\" />",
                    begin, dur, name, fmt_num(*a), fmt_num(*b), timing
                );
            }
        }
        if from.state.color != to.state.color {
            let _ = writeln!(
                doc,
                "  <animate attributeType=\"xml\" begin=\"{}ms\" dur=\"{}ms\" attributeName=\"fill\" from=\"{}\" to=\"{}\"{} fill=\"freeze\" />",
                begin, dur, from.state.color.rgb(), to.state.color.rgb(), timing
            );
        }
    }

    let _ = writeln!(doc, "</{}>", tag(shape.kind));
}

fn spline_attrs(easing: EasingType) -> String {
    match easing.control_points() {
        Some([a, b, c, d]) => format!(
            " calcMode=\"spline\" keyTimes=\"0;1\" keySplines=\"{} {} {} {}\"",
            a, b, c, d
        ),
        None => String::new(),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use animator_data::StateSpec;

    fn render(model: &AnimatorModel, speed: u32) -> String {
        let mut view = SvgView::new(Vec::new(), speed).unwrap();
        view.render(model).unwrap();
        String::from_utf8(view.into_inner()).unwrap()
    }

    fn sliding_rect() -> AnimatorModel {
        let mut model = AnimatorModel::new(Canvas {
            x: 200,
            y: 70,
            width: 360,
            height: 360,
        });
        model.add_shape("R", ShapeKind::Rectangle).unwrap();
        model
            .add_motion(
                "R",
                1,
                &StateSpec::new(200, 200, 50, 100, 255, 0, 0),
                10,
                &StateSpec::new(300, 200, 50, 100, 0, 0, 255),
                EasingType::Linear,
            )
            .unwrap();
        model
    }

    #[test]
    fn header_uses_canvas_as_view_box() {
        let svg = render(&sliding_rect(), 1);
        assert!(svg.starts_with(
            "<svg width=\"360\" height=\"360\" viewBox=\"200 70 360 360\" version=\"1.1\""
        ));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn animates_only_changing_attributes() {
        let svg = render(&sliding_rect(), 2);
        assert!(svg.contains("<rect id=\"R\" x=\"200\" y=\"200\" width=\"50\" height=\"100\" fill=\"rgb(255,0,0)\" visibility=\"hidden\">"));
        assert!(svg.contains("<set attributeName=\"visibility\" to=\"visible\" begin=\"500ms\""));
        assert!(svg.contains("begin=\"500ms\" dur=\"4500ms\" attributeName=\"x\" from=\"200\" to=\"300\""));
        assert!(svg.contains("attributeName=\"fill\" from=\"rgb(255,0,0)\" to=\"rgb(0,0,255)\""));
        assert!(!svg.contains("attributeName=\"y\""));
        assert!(!svg.contains("attributeName=\"width\""));
    }

    #[test]
    fn ellipses_are_centred_in_their_bounds() {
        let mut model = AnimatorModel::default();
        model.add_shape("O", ShapeKind::Ellipse).unwrap();
        model
            .add_keyframe("O", 2, &StateSpec::new(10, 20, 40, 30, 0, 0, 0), EasingType::Linear)
            .unwrap();
        let svg = render(&model, 1);
        assert!(svg.contains("<ellipse id=\"O\" cx=\"30\" cy=\"35\" rx=\"20\" ry=\"15\""));
        assert!(svg.contains("</ellipse>"));
    }

    #[test]
    fn eased_segments_use_splines() {
        let mut model = sliding_rect();
        model.set_easing("R", 10, EasingType::EaseInOut).unwrap();
        let svg = render(&model, 1);
        assert!(svg.contains("calcMode=\"spline\" keyTimes=\"0;1\" keySplines=\"0.364 0 0.636 1\""));
    }

    #[test]
    fn shapes_without_keyframes_are_skipped() {
        let mut model = AnimatorModel::default();
        model.add_shape("ghost", ShapeKind::Rectangle).unwrap();
        assert!(!render(&model, 1).contains("ghost"));
    }

    #[test]
    fn zero_speed_rejected() {
        assert!(matches!(
            SvgView::new(Vec::new(), 0),
            Err(AnimatorError::InvalidSpeed)
        ));
    }

    #[test]
    fn frame_svg_draws_background_and_escapes_ids() {
        let shapes = vec![RenderedShape {
            id: "a<b".into(),
            kind: ShapeKind::Rectangle,
            state: ShapeState::new(1.5, 2.0, 3.0, 4.0, Color::new(1, 2, 3)),
        }];
        let canvas = Canvas::default();
        let svg = frame_svg(canvas, &shapes, Some(Color::WHITE));
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"500\" height=\"500\" fill=\"rgb(255,255,255)\" />"));
        assert!(svg.contains("<rect id=\"a&lt;b\" x=\"1.5\" y=\"2\" width=\"3\" height=\"4\" fill=\"rgb(1,2,3)\" />"));
    }
}
