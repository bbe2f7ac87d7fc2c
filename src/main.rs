//! # shape-animator
//!
//! Loads a keyframe animation and presents it through one of four views:
//! - `text`: the canonical text description
//! - `svg`: a self-animating SVG document
//! - `visual`: rasterised playback as an animated GIF or PNG frames
//! - `edit`: an interactive terminal session for editing keyframes

mod config;

use animator_core::edit::{run_interactive, EditSession};
use animator_core::loader::load_model;
use animator_core::views::{SvgView, TextView, VisualOutput, VisualView};
use animator_core::{AnimatorModel, View, ViewKind};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

use config::{AnimatorConfig, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AnimatorConfig::try_from(Cli::parse())?;
    run(&config)
}

fn run(config: &AnimatorConfig) -> Result<()> {
    let model = load_model(&config.input)
        .with_context(|| format!("Failed to load animation from {}", config.input.display()))?;

    match config.view {
        ViewKind::Text => {
            let out = open_output(config.out.as_deref())?;
            let mut view = TextView::new(out);
            view.render(&model).context("Failed to write text view")?;
            view.into_inner().flush()?;
        }
        ViewKind::Svg => {
            let out = open_output(config.out.as_deref())?;
            let mut view = SvgView::new(out, config.speed)?;
            view.render(&model).context("Failed to write SVG view")?;
            view.into_inner().flush()?;
        }
        ViewKind::Visual => render_visual(config, &model)?,
        ViewKind::Edit => {
            let mut session = EditSession::new(model, config.speed)?;
            session.playback_mut().set_looping(config.looping);
            let stdin = io::BufReader::new(io::stdin());
            let session = run_interactive(session, stdin, io::stdout(), config.preview.clone())
                .context("Edit session failed")?;
            info!(shapes = session.model().shapes().len(), "edit session ended");
        }
    }
    Ok(())
}

fn render_visual(config: &AnimatorConfig, model: &AnimatorModel) -> Result<()> {
    let path = config
        .out
        .clone()
        .context("the visual view needs --out")?;
    let output = if config.frames_dir {
        VisualOutput::PngFrames { dir: path }
    } else {
        VisualOutput::Gif {
            path,
            looping: config.looping,
        }
    };
    let mut view = VisualView::new(output, config.speed)?;
    view.render(model).context("Failed to render frames")?;
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Failed to create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}
