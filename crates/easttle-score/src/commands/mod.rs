//! Command implementations.

use std::io::Read;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use easttle_score_core::config::Config;
use owo_colors::OwoColorize;

pub mod analyze;
pub mod assess;
pub mod chart;
pub mod convert;
pub mod expectations;
pub mod history;
pub mod info;
pub mod rubric;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Check the size before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Read from `file`, or from stdin when it is absent or `-`.
pub fn read_input(file: Option<&Utf8Path>, max_bytes: Option<usize>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_str() != "-" => read_input_file(path, max_bytes),
        _ => read_stdin(max_bytes),
    }
}

/// Bytes to read from stdin: one past the limit is enough to detect overflow.
fn stdin_cap(max_bytes: Option<usize>) -> u64 {
    max_bytes.map_or(u64::MAX, |max| {
        u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1)
    })
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let cap = stdin_cap(max_bytes);
    let mut content = String::new();
    std::io::stdin()
        .lock()
        .take(cap)
        .read_to_string(&mut content)
        .context("failed to read stdin")?;
    if let Some(max) = max_bytes
        && content.len() > max
    {
        anyhow::bail!("input too large: stdin exceeds {max} bytes");
    }
    Ok(content)
}

/// Directory holding history and the custom chart.
pub fn data_dir(config: &Config) -> anyhow::Result<Utf8PathBuf> {
    config
        .resolve_data_dir()
        .context("failed to locate data directory")
}

/// Color a 0–8 category score: green for strengths, yellow for growth areas.
pub(crate) fn paint_score(score: u8) -> String {
    let text = format!("{score}/8");
    if score >= 6 {
        text.green().to_string()
    } else if score <= 3 {
        text.yellow().to_string()
    } else {
        text
    }
}
