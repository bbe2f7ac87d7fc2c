//! # Loader
//!
//! Turns an input file into an `AnimatorModel`.
//!
//! The format is picked from the extension: `.json` documents, `.rhai`
//! scripts, and the line-oriented text format for everything else.

use animator_data::{parse_text, AnimationDoc};
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::model::AnimatorModel;
use crate::scripting::run_script;

/// Source of animation files. Swappable so tests need not touch the disk.
pub trait SourceLoader {
    fn load_string(&self, path: &Path) -> Result<String>;
}

pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Text,
    Json,
    Script,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => InputFormat::Json,
            Some("rhai") => InputFormat::Script,
            _ => InputFormat::Text,
        }
    }
}

pub fn parse_model(src: &str, format: InputFormat) -> Result<AnimatorModel> {
    match format {
        InputFormat::Text => AnimatorModel::from_doc(&parse_text(src)?),
        InputFormat::Json => AnimatorModel::from_doc(&AnimationDoc::from_json(src)?),
        InputFormat::Script => run_script(src),
    }
}

pub fn load_model_with(loader: &dyn SourceLoader, path: &Path) -> Result<AnimatorModel> {
    let format = InputFormat::from_path(path);
    let src = loader.load_string(path)?;
    let model = parse_model(&src, format)?;
    info!(
        path = %path.display(),
        ?format,
        shapes = model.shapes().len(),
        last_tick = model.last_tick(),
        "loaded animation"
    );
    Ok(model)
}

pub fn load_model(path: &Path) -> Result<AnimatorModel> {
    load_model_with(&FsLoader, path)
}
