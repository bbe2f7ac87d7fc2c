//! Command-line options and the resolved run configuration.

use animator_core::ViewKind;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shape-animator")]
#[command(about = "Keyframe animator for 2D shapes")]
#[command(version)]
pub struct Cli {
    /// Animation to load (.json, .rhai, or the text format)
    #[arg(short, long = "in", value_name = "FILE")]
    pub input: PathBuf,

    /// How to present the animation: text, svg, visual or edit
    #[arg(short, long, env = "ANIMATOR_VIEW", default_value = "text")]
    pub view: ViewKind,

    /// Output file. Defaults to stdout for text and svg; required for visual
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Playback speed in ticks per second
    #[arg(short, long, env = "ANIMATOR_SPEED", default_value_t = 1)]
    pub speed: u32,

    /// Loop playback (repeat the GIF forever in visual mode)
    #[arg(long = "loop")]
    pub looping: bool,

    /// Write visual output as numbered PNG frames into the --out directory
    #[arg(long)]
    pub frames_dir: bool,

    /// In edit mode, keep the current frame written to this SVG file
    #[arg(long, value_name = "PATH")]
    pub preview: Option<PathBuf>,
}

/// Everything the controller needs to run, validated.
#[derive(Debug, Clone)]
pub struct AnimatorConfig {
    pub input: PathBuf,
    pub view: ViewKind,
    pub out: Option<PathBuf>,
    pub speed: u32,
    pub looping: bool,
    pub frames_dir: bool,
    pub preview: Option<PathBuf>,
}

impl TryFrom<Cli> for AnimatorConfig {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        if cli.speed == 0 {
            bail!("--speed must be a positive number of ticks per second");
        }
        if cli.view == ViewKind::Visual && cli.out.is_none() {
            bail!("the visual view needs --out (a .gif file, or a directory with --frames-dir)");
        }
        if cli.frames_dir && cli.view != ViewKind::Visual {
            bail!("--frames-dir only applies to the visual view");
        }
        if cli.preview.is_some() && cli.view != ViewKind::Edit {
            bail!("--preview only applies to the edit view");
        }
        Ok(Self {
            input: cli.input,
            view: cli.view,
            out: cli.out,
            speed: cli.speed,
            looping: cli.looping,
            frames_dir: cli.frames_dir,
            preview: cli.preview,
        })
    }
}
