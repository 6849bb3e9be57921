//! Window a decoded slice and write preview images

use crate::commands::print_json;
use crate::config::PipelineConfig;
use crate::input::SliceInput;
use anyhow::{Context as _, Result};
use clap::Args;
use ich_windowing::{original_preview, prepare_slice, processed_preview, PreparedSlice, WindowSpec};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Args)]
pub struct WindowCommand {
    /// Decoded slice JSON: {"pixels": [[...]], "intercept", "slope", "photometric_interpretation"}
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Pipeline configuration (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the preview PNGs
    #[arg(long, default_value = "./outputs")]
    output_dir: PathBuf,

    /// Identifier used in preview file names (defaults to the input file stem)
    #[arg(long)]
    id: Option<String>,

    /// Skip writing preview images
    #[arg(long, default_value = "false")]
    no_previews: bool,
}

/// Summary printed after windowing
#[derive(Debug, Serialize)]
pub struct WindowSummary {
    pub id: String,
    pub original_dims: [usize; 2],
    pub resized_dims: [usize; 2],
    pub windows: Vec<WindowSpec>,
    pub value_range: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_preview: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_preview: Option<PathBuf>,
}

impl WindowCommand {
    pub fn execute(self) -> Result<()> {
        let start = Instant::now();

        let config = PipelineConfig::load(self.config.as_deref())?;
        let grid = SliceInput::load(&self.input)?.into_grid()?;
        debug!("Loaded slice {:?} from {}", grid.dim(), self.input.display());

        let prepared = prepare_slice(&grid, &config.preprocess).context("Preprocessing failed")?;

        let id = self.id.clone().unwrap_or_else(|| slice_id(&self.input));
        let mut summary = summarize(&id, &prepared, &config);

        if !self.no_previews {
            std::fs::create_dir_all(&self.output_dir).with_context(|| {
                format!("Failed to create output directory: {}", self.output_dir.display())
            })?;

            let (original_path, processed_path) = preview_paths(&self.output_dir, &id);
            original_preview(&grid)
                .save(&original_path)
                .with_context(|| format!("Failed to write {}", original_path.display()))?;
            processed_preview(&prepared.stacked)
                .save(&processed_path)
                .with_context(|| format!("Failed to write {}", processed_path.display()))?;

            summary.original_preview = Some(original_path);
            summary.processed_preview = Some(processed_path);
        }

        info!("Windowed {} in {:.2}ms", id, start.elapsed().as_secs_f64() * 1000.0);
        print_json(&summary)
    }
}

fn slice_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slice".to_string())
}

fn preview_paths(dir: &Path, id: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{}_original.png", id)),
        dir.join(format!("{}_processed.png", id)),
    )
}

fn summarize(id: &str, prepared: &PreparedSlice, config: &PipelineConfig) -> WindowSummary {
    let (orig_h, orig_w) = prepared.stacked.dim();
    let (out_h, out_w) = prepared.resized.dim();
    let (min, max) = prepared.resized.value_range();

    WindowSummary {
        id: id.to_string(),
        original_dims: [orig_h, orig_w],
        resized_dims: [out_h, out_w],
        windows: config.preprocess.windows.to_vec(),
        value_range: [min, max],
        original_preview: None,
        processed_preview: None,
    }
}
