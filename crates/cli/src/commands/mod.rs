pub mod combine;
#[cfg(feature = "onnx")]
pub mod predict;
pub mod presets;
pub mod window;

use anyhow::{Context as _, Result};
use serde::Serialize;

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
