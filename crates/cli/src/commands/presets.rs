//! List the window presets

use anyhow::Result;
use ich_windowing::{CANONICAL_WINDOWS, MODEL_INPUT_SIZE};

pub fn list_presets() -> Result<()> {
    println!("Window presets (channel order):\n");

    for (channel, spec) in ["R", "G", "B"].iter().zip(CANONICAL_WINDOWS.iter()) {
        let (lower, upper) = spec.bounds();
        println!("  {} {}", channel, spec.name);
        println!("    level: {} HU, width: {} HU", spec.level, spec.width);
        println!("    range: [{}, {}] HU", lower, upper);
        println!();
    }

    println!("Model input size: {}x{}", MODEL_INPUT_SIZE, MODEL_INPUT_SIZE);
    Ok(())
}
