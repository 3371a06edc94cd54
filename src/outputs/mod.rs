//! Output generation for the digest.
//!
//! # Submodules
//!
//! - [`digest`]: Renders the plain-text digest picked up by the delivery script
//! - [`json`]: Writes the same digest as JSON, organised by date and edition
//!
//! # Output Structure
//!
//! ```text
//! digest.txt                 # latest digest, overwritten every run
//!
//! json_output_dir/
//! ├── 2025-05-06/
//! │   ├── morning.json
//! │   ├── afternoon.json
//! │   └── evening.json
//! ```

pub mod digest;
pub mod json;

use crate::models::{Digest, DigestEntry, ScoredItem};
use chrono::{DateTime, Local, Utc};

/// Assemble the [`Digest`] for a ranked list produced at `generated_at`.
pub fn build_digest(ranked: &[ScoredItem], generated_at: DateTime<Utc>, edition: String) -> Digest {
    Digest {
        generated_at,
        local_date: generated_at.with_timezone(&Local).date_naive().to_string(),
        edition,
        items: ranked.iter().map(DigestEntry::from).collect(),
    }
}
