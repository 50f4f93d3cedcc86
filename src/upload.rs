//! Upload orchestration.
//!
//! Sequences a single run: rule-table load → file existence check →
//! classification → policy check → key/tag derivation → preview → S3 write.
//! Every failure is terminal; each validation stage maps to its own process
//! exit code via [`UploadError`]. A rule table that exists but cannot be
//! parsed propagates as a plain error outside that taxonomy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::destination;
use crate::patterns;
use crate::rules;
use crate::s3::{self, S3Target};

/// One upload run's inputs, assembled from the CLI.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Path to the file whose name must be canonical.
    pub file: PathBuf,
    /// Destination bucket and addressing.
    pub target: S3Target,
    /// Path to the MasterFormat section rule table.
    pub mf_map: PathBuf,
    /// Stop after printing the preview.
    pub dry_run: bool,
}

/// Terminal failures of an upload run, each with a distinct exit code.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("filename does not match ICON or SPEC patterns: {0}")]
    UnrecognizedName(String),

    #[error("type '{type_slug}' not allowed for MF section {mf_sec} (allowed: {allowed:?})")]
    TypeNotAllowed {
        type_slug: String,
        mf_sec: String,
        allowed: Vec<String>,
    },

    #[error("upload failed: {cause}")]
    UploadFailed { cause: anyhow::Error },
}

impl UploadError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            UploadError::FileNotFound(_) => 2,
            UploadError::UnrecognizedName(_) => 3,
            UploadError::UploadFailed { .. } => 4,
            UploadError::TypeNotAllowed { .. } => 5,
        }
    }
}

/// Run one validation-and-upload sequence.
///
/// Prints the preview (destination key and tag string) on stdout once
/// validation passes; with `dry_run` set, stops there. Otherwise reads the file and performs the remote write, attaching
/// the tag string and — for `.pdf` names, case-insensitively — an
/// `application/pdf` content-type override.
pub async fn run_upload(request: &UploadRequest) -> Result<()> {
    let rule_table = rules::load_rule_table(&request.mf_map)?;

    if !request.file.is_file() {
        return Err(UploadError::FileNotFound(request.file.clone()).into());
    }

    let name = request
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let tags = patterns::classify(&name)
        .ok_or_else(|| UploadError::UnrecognizedName(name.clone()))?;

    rules::check_type_allowed(&rule_table, &tags).map_err(|v| UploadError::TypeNotAllowed {
        type_slug: v.type_slug,
        mf_sec: v.mf_sec,
        allowed: v.allowed,
    })?;

    let key = destination::object_key(&tags, &name);
    let tag_str = destination::tag_string(&tags);

    println!("✔ Valid filename & MF check passed");
    println!("  s3 key: s3://{}/{}", request.target.bucket, key);
    println!("  tags:   {}", tag_str);

    if request.dry_run {
        return Ok(());
    }

    let body = std::fs::read(&request.file)
        .with_context(|| format!("Failed to read {}", request.file.display()))?;

    s3::put_object(
        &request.target,
        &key,
        body,
        &tag_str,
        pdf_content_type(&name),
    )
    .await
    .map_err(|cause| UploadError::UploadFailed { cause })?;

    println!("✔ Uploaded");
    Ok(())
}

/// `.pdf` names (any case) get an explicit content type; everything else
/// relies on the bucket's defaults.
fn pdf_content_type(name: &str) -> Option<&'static str> {
    name.to_lowercase()
        .ends_with(".pdf")
        .then_some("application/pdf")
}
