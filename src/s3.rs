//! S3 object upload.
//!
//! Issues a single `PutObject` against the S3 REST API with AWS Signature
//! V4 authentication. Supports custom endpoints for S3-compatible services
//! (MinIO, LocalStack) via path-style addressing; standard AWS buckets use
//! virtual-hosted addressing.
//!
//! Signing uses only pure-Rust dependencies (`hmac`, `sha2`) — no C
//! library dependencies.
//!
//! Credentials are read from environment variables:
//! - `AWS_ACCESS_KEY_ID` — required
//! - `AWS_SECRET_ACCESS_KEY` — required
//! - `AWS_SESSION_TOKEN` — optional (temporary credentials / IAM roles)
//!
//! The tag string travels in the `x-amz-tagging` header and an optional
//! content-type override is sent (and signed) alongside it. No other object
//! properties are set, and a failed write is not retried.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Destination bucket and addressing settings for an upload.
#[derive(Debug, Clone)]
pub struct S3Target {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services. When set, requests use
    /// path-style addressing and keep the endpoint's scheme.
    pub endpoint_url: Option<String>,
}

/// AWS credentials loaded from environment variables.
struct AwsCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl AwsCredentials {
    fn from_env() -> Result<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .context("AWS_ACCESS_KEY_ID environment variable not set")?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .context("AWS_SECRET_ACCESS_KEY environment variable not set")?;
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }
}

/// Host, request URL, and canonical URI for one object.
struct Addressing {
    host: String,
    url: String,
    canonical_uri: String,
}

fn addressing(target: &S3Target, encoded_key: &str) -> Addressing {
    match &target.endpoint_url {
        Some(endpoint) => {
            let scheme = if endpoint.starts_with("http://") {
                "http"
            } else {
                "https"
            };
            let host = endpoint
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .to_string();
            let canonical_uri = format!("/{}/{}", target.bucket, encoded_key);
            let url = format!("{}://{}{}", scheme, host, canonical_uri);
            Addressing {
                host,
                url,
                canonical_uri,
            }
        }
        None => {
            let host = format!("{}.s3.{}.amazonaws.com", target.bucket, target.region);
            let canonical_uri = format!("/{}", encoded_key);
            let url = format!("https://{}{}", host, canonical_uri);
            Addressing {
                host,
                url,
                canonical_uri,
            }
        }
    }
}

/// Upload one object with a signed PUT.
///
/// `tagging` is attached verbatim as the `x-amz-tagging` header;
/// `content_type` is sent as `Content-Type` when given. Both participate in
/// the signed header set.
///
/// # Errors
///
/// Returns an error if credentials are missing, the request cannot be sent,
/// or S3 answers with a non-success status (the status and a response body
/// excerpt are included in the message).
pub async fn put_object(
    target: &S3Target,
    key: &str,
    body: Vec<u8>,
    tagging: &str,
    content_type: Option<&str>,
) -> Result<()> {
    let creds = AwsCredentials::from_env()?;

    let encoded_key = key.split('/').map(uri_encode).collect::<Vec<_>>().join("/");
    let addr = addressing(target, &encoded_key);

    let now = Utc::now();
    let date_stamp = now.format("%Y%m%d").to_string();
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

    let payload_hash = hex_sha256(&body);

    let mut headers = vec![
        ("host".to_string(), addr.host.clone()),
        ("x-amz-content-sha256".to_string(), payload_hash.clone()),
        ("x-amz-date".to_string(), amz_date.clone()),
        ("x-amz-tagging".to_string(), tagging.to_string()),
    ];
    if let Some(ct) = content_type {
        headers.push(("content-type".to_string(), ct.to_string()));
    }
    if let Some(ref token) = creds.session_token {
        headers.push(("x-amz-security-token".to_string(), token.clone()));
    }
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    let signed_headers: String = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect();

    let canonical_request = format!(
        "PUT\n{}\n\n{}\n{}\n{}",
        addr.canonical_uri, canonical_headers, signed_headers, payload_hash
    );

    let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, target.region);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        credential_scope,
        hex_sha256(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(
        &creds.secret_access_key,
        &date_stamp,
        &target.region,
        "s3",
    );
    let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
        creds.access_key_id, credential_scope, signed_headers, signature
    );

    let client = reqwest::Client::new();
    let mut req = client
        .put(&addr.url)
        .header("Authorization", &authorization)
        .header("x-amz-content-sha256", &payload_hash)
        .header("x-amz-date", &amz_date)
        .header("x-amz-tagging", tagging);
    if let Some(ct) = content_type {
        req = req.header("Content-Type", ct);
    }
    if let Some(ref token) = creds.session_token {
        req = req.header("x-amz-security-token", token);
    }

    let resp = req.body(body).send().await.map_err(|e| {
        anyhow::anyhow!("Failed to put s3://{}/{}: {}", target.bucket, key, e)
    })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!(
            "S3 PutObject failed (HTTP {}): {}",
            status,
            body.chars().take(500).collect::<String>()
        );
    }

    Ok(())
}

/// Hex-encoded SHA-256 of data.
fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn hex_hmac_sha256(key: &[u8], data: &[u8]) -> String {
    hex::encode(hmac_sha256(key, data))
}

/// Derive the SigV4 signing key chain:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, dateStamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
fn derive_signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(
        format!("AWS4{}", secret_key).as_bytes(),
        date_stamp.as_bytes(),
    );
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// RFC 3986 URI encoding for canonical requests. Leaves unreserved
/// characters (`A-Z a-z 0-9 - _ . ~`) untouched.
fn uri_encode(s: &str) -> String {
    let mut result = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}
