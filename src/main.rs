//! # mfdoc
//!
//! Validates a construction-document filename against the canonical ICON
//! and SPEC grammars, enforces MasterFormat section rules, and uploads the
//! file to S3 with derived tags.
//!
//! ## Usage
//!
//! ```bash
//! mfdoc path/to/ICON-102000-FURN.svg --bucket acme-docs
//! mfdoc path/to/USA-CA-037-1-238110-102000-CABINET-STORAGE-ACME.pdf \
//!     --bucket acme-docs --mf-map schema/mf_section_map.csv --dry-run
//! ```
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success (including `--dry-run`) |
//! | 2 | File not found |
//! | 3 | Filename matches neither grammar |
//! | 4 | Remote write failed |
//! | 5 | Type disallowed for its MF section |
//!
//! A rule table that exists but cannot be parsed aborts through the generic
//! error path (exit 1).

use std::path::PathBuf;

use clap::Parser;

use mfdocs::s3::S3Target;
use mfdocs::upload::{run_upload, UploadError, UploadRequest};

/// Validate a construction-document filename, enforce MasterFormat section
/// rules, and upload the file to S3 with derived tags.
#[derive(Parser)]
#[command(
    name = "mfdoc",
    about = "Validate name, enforce MasterFormat rules, upload to S3 with tags",
    version
)]
struct Cli {
    /// Path to the file to upload (its name must be canonical).
    file: PathBuf,

    /// Destination S3 bucket.
    #[arg(long)]
    bucket: String,

    /// Path to the MasterFormat section rule table (CSV). Sections absent
    /// from the table carry no type restriction.
    #[arg(long, default_value = "schema/mf_section_map.csv")]
    mf_map: PathBuf,

    /// Validate and print the preview only — skip the S3 write.
    #[arg(long)]
    dry_run: bool,

    /// AWS region of the destination bucket.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    region: String,

    /// Custom S3 endpoint (MinIO, LocalStack). Standard AWS addressing
    /// when unset.
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let request = UploadRequest {
        file: cli.file,
        target: S3Target {
            bucket: cli.bucket,
            region: cli.region,
            endpoint_url: cli.endpoint_url,
        },
        mf_map: cli.mf_map,
        dry_run: cli.dry_run,
    };

    if let Err(e) = run_upload(&request).await {
        match e.downcast_ref::<UploadError>() {
            Some(failure) => {
                eprintln!("ERROR: {}", failure);
                std::process::exit(failure.exit_code());
            }
            None => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}
