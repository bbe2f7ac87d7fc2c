//! # Text Format
//!
//! Reader and writer for the line-oriented animation format:
//!
//! ```text
//! canvas 200 70 360 360
//! shape R rectangle
//! motion R 1 200 200 50 100 255 0 0  10 300 300 50 100 255 0 0
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A motion line may
//! carry one trailing token naming the easing of that segment.

use crate::model::{AnimationDoc, CanvasSpec, MotionSpec, ShapeSpec, StateSpec};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parses a whole document.
pub fn parse_text(src: &str) -> Result<AnimationDoc, ParseError> {
    let mut doc = AnimationDoc::default();

    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "canvas" => doc.canvas = Some(parse_canvas(line_no, &tokens[1..])?),
            "shape" => doc.shapes.push(parse_shape(line_no, &tokens[1..])?),
            "motion" => doc.motions.push(parse_motion(line_no, &tokens[1..])?),
            other => {
                return Err(ParseError::new(
                    line_no,
                    format!("unknown directive '{}'", other),
                ))
            }
        }
    }

    Ok(doc)
}

fn expect_count(line: usize, directive: &str, args: &[&str], expected: &[usize]) -> Result<(), ParseError> {
    if expected.contains(&args.len()) {
        Ok(())
    } else {
        Err(ParseError::new(
            line,
            format!(
                "'{}' expects {} arguments, found {}",
                directive,
                expected
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(" or "),
                args.len()
            ),
        ))
    }
}

fn number<T: std::str::FromStr>(line: usize, what: &str, token: &str) -> Result<T, ParseError> {
    token
        .parse::<T>()
        .map_err(|_| ParseError::new(line, format!("invalid {} '{}'", what, token)))
}

fn parse_canvas(line: usize, args: &[&str]) -> Result<CanvasSpec, ParseError> {
    expect_count(line, "canvas", args, &[4])?;
    Ok(CanvasSpec {
        x: number(line, "canvas x", args[0])?,
        y: number(line, "canvas y", args[1])?,
        width: number(line, "canvas width", args[2])?,
        height: number(line, "canvas height", args[3])?,
    })
}

fn parse_shape(line: usize, args: &[&str]) -> Result<ShapeSpec, ParseError> {
    expect_count(line, "shape", args, &[2])?;
    let kind = args[1].parse().map_err(|e: String| ParseError::new(line, e))?;
    Ok(ShapeSpec {
        id: args[0].to_string(),
        kind,
    })
}

fn parse_state(line: usize, args: &[&str]) -> Result<StateSpec, ParseError> {
    const FIELDS: [&str; 7] = ["x", "y", "width", "height", "red", "green", "blue"];
    let mut values = [0i32; 7];
    for (slot, (field, token)) in values.iter_mut().zip(FIELDS.iter().zip(args)) {
        *slot = number(line, field, token)?;
    }
    Ok(StateSpec::from_array(values))
}

fn parse_motion(line: usize, args: &[&str]) -> Result<MotionSpec, ParseError> {
    expect_count(line, "motion", args, &[17, 18])?;
    Ok(MotionSpec {
        shape: args[0].to_string(),
        start_tick: number(line, "start tick", args[1])?,
        start: parse_state(line, &args[2..9])?,
        end_tick: number(line, "end tick", args[9])?,
        end: parse_state(line, &args[10..17])?,
        easing: args.get(17).map(|s| s.to_string()),
    })
}

/// Writes the canonical text form of `doc`.
pub fn write_text(doc: &AnimationDoc) -> String {
    let mut out = String::new();

    if let Some(c) = &doc.canvas {
        let _ = writeln!(out, "canvas {} {} {} {}", c.x, c.y, c.width, c.height);
    }
    for shape in &doc.shapes {
        let _ = writeln!(out, "shape {} {}", shape.id, shape.kind);
    }
    for m in &doc.motions {
        let _ = write!(
            out,
            "motion {} {} {}  {} {}",
            m.shape,
            m.start_tick,
            join_state(&m.start),
            m.end_tick,
            join_state(&m.end)
        );
        if let Some(easing) = &m.easing {
            let _ = write!(out, " {}", easing);
        }
        out.push('\n');
    }

    out
}

fn join_state(s: &StateSpec) -> String {
    s.to_array()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
