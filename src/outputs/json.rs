//! JSON output of the digest.
//!
//! Files are organized by date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```
//!
//! A second run in the same edition overwrites the earlier file.

use crate::models::Digest;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the JSON file for `digest` under `json_output_dir`.
pub fn output_path(digest: &Digest, json_output_dir: impl AsRef<Path>) -> PathBuf {
    json_output_dir
        .as_ref()
        .join(&digest.local_date)
        .join(format!("{}.json", digest.edition))
}

/// Write a [`Digest`] to `{json_output_dir}/{date}/{edition}.json`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.as_ref().display()))]
pub async fn write_digest(
    digest: &Digest,
    json_output_dir: impl AsRef<Path>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;
    let path = output_path(digest, &json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON digest");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DigestEntry;
    use chrono::{TimeZone, Utc};

    fn digest() -> Digest {
        Digest {
            generated_at: Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap(),
            local_date: "2025-03-10".to_string(),
            edition: "evening".to_string(),
            items: vec![DigestEntry {
                headline: "Bitcoin hits record high".to_string(),
                sources: vec!["CNBC".to_string(), "WSJ".to_string()],
                score: 4.65,
            }],
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(&digest(), "/srv/json"),
            PathBuf::from("/srv/json/2025-03-10/evening.json")
        );
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = std::env::temp_dir().join(format!("headline_digest_json_{}", std::process::id()));
        let path = write_digest(&digest(), &dir).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["edition"], "evening");
        assert_eq!(value["localDate"], "2025-03-10");
        assert_eq!(value["items"][0]["sources"][1], "WSJ");
        assert!(value["generatedAt"].is_string());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
