//! Plain-text digest rendering.
//!
//! The rendered text is what the separate delivery script forwards as a
//! message, so it stays short and free of markup.

use crate::models::Digest;
use crate::utils::upcase;
use itertools::Itertools;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Render a digest as numbered plain text.
///
/// ```text
/// Morning digest - 2025-03-10
///
/// 1. Fed Chair signals rate cut coming in March
///    Sources: Bloomberg, CNBC (score 5.44)
/// ```
pub fn render(digest: &Digest) -> String {
    let mut out = format!("{} digest - {}\n\n", upcase(&digest.edition), digest.local_date);

    if digest.items.is_empty() {
        out.push_str("No headlines this time.\n");
        return out;
    }

    for (i, entry) in digest.items.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n   Sources: {} (score {:.2})\n",
            i + 1,
            entry.headline,
            entry.sources.iter().join(", "),
            entry.score
        ));
    }
    out
}

/// Render `digest` and write it to `path`, replacing the previous run's file.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn write_digest(digest: &Digest, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    fs::write(path, render(digest)).await?;
    info!(items = digest.items.len(), "Wrote digest");
    Ok(())
}
