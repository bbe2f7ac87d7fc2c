//! # Visual View
//!
//! Plays the animation offline: each tick from 1 to the last keyframe is
//! drawn as a static SVG frame, rasterised with resvg in parallel chunks, and
//! streamed into an animated GIF or a directory of PNG files.

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{frame_svg, View};
use crate::animation::Color;
use crate::error::{AnimatorError, Result};
use crate::model::AnimatorModel;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisualOutput {
    /// One animated GIF. `looping` repeats it forever.
    Gif { path: PathBuf, looping: bool },
    /// `frame_0001.png`, `frame_0002.png`, ... inside `dir`.
    PngFrames { dir: PathBuf },
}

pub struct VisualView {
    output: VisualOutput,
    speed: u32,
    background: Color,
    chunk_frames: usize,
}

impl VisualView {
    pub fn new(output: VisualOutput, speed: u32) -> Result<Self> {
        if speed == 0 {
            return Err(AnimatorError::InvalidSpeed);
        }
        Ok(Self {
            output,
            speed,
            background: Color::WHITE,
            chunk_frames: rayon::current_num_threads() * 2,
        })
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Number of frames rasterised in parallel before they are written out.
    /// Bounds memory to one chunk of frames regardless of the animation length.
    pub fn with_chunk_frames(mut self, frames: usize) -> Self {
        self.chunk_frames = frames.max(1);
        self
    }

    /// Rasterises ticks `1..=last_tick` chunk by chunk, handing each frame to
    /// `emit` in tick order.
    fn render_chunks<F>(&self, model: &AnimatorModel, mut emit: F) -> Result<u32>
    where
        F: FnMut(u32, RgbaImage) -> Result<()>,
    {
        let last = model.last_tick().max(1);
        let chunk = u32::try_from(self.chunk_frames).unwrap_or(u32::MAX).max(1);
        let background = self.background;

        let mut start = 1u32;
        loop {
            let end = start.saturating_add(chunk - 1).min(last);
            let frames = (start..=end)
                .into_par_iter()
                .map(|tick| render_frame(model, tick, background))
                .collect::<Result<Vec<_>>>()?;
            debug!(start, end, "rasterised frames");
            for (tick, img) in (start..=end).zip(frames) {
                emit(tick, img)?;
            }
            if end >= last {
                return Ok(last);
            }
            start = end + 1;
        }
    }

    fn write_gif(&self, model: &AnimatorModel, path: &Path, looping: bool) -> Result<u32> {
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = GifEncoder::new_with_speed(file, 10);
        if looping {
            encoder.set_repeat(Repeat::Infinite)?;
        }
        let delay = Delay::from_numer_denom_ms(1000, self.speed);
        self.render_chunks(model, |_, img| {
            encoder.encode_frame(Frame::from_parts(img, 0, 0, delay))?;
            Ok(())
        })
    }
}

impl View for VisualView {
    fn render(&mut self, model: &AnimatorModel) -> Result<()> {
        match &self.output {
            VisualOutput::Gif { path, looping } => {
                let ticks = self.write_gif(model, path, *looping)?;
                info!(path = %path.display(), ticks, "wrote animated gif");
            }
            VisualOutput::PngFrames { dir } => {
                fs::create_dir_all(dir)?;
                let ticks = self.render_chunks(model, |tick, img| {
                    img.save(dir.join(format!("frame_{:04}.png", tick)))?;
                    Ok(())
                })?;
                info!(dir = %dir.display(), ticks, "wrote png frames");
            }
        }
        Ok(())
    }
}

/// Rasterises the model at `tick`. The canvas origin maps to pixel (0, 0).
pub fn render_frame(model: &AnimatorModel, tick: u32, background: Color) -> Result<RgbaImage> {
    let canvas = model.canvas();
    let svg = frame_svg(canvas, &model.tween(tick), Some(background));
    let render_err = |message: String| AnimatorError::Render { tick, message };

    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
        .map_err(|e| render_err(e.to_string()))?;
    let mut pixmap = tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| render_err(format!("cannot allocate {}x{} pixmap", canvas.width, canvas.height)))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(canvas.width, canvas.height, rgba)
        .ok_or_else(|| render_err("pixel buffer size mismatch".to_string()))
}
