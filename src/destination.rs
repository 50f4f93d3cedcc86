//! Destination derivation.
//!
//! Pure functions from classified tags (and the original filename) to the
//! S3 object key and the serialized tag string. Both are deterministic:
//! identical inputs produce byte-identical outputs.

use crate::patterns::NameTags;

/// Compute the destination object key for a classified filename.
///
/// Icons land under a flat division prefix; spec sheets under a
/// Hive-style partition layout.
pub fn object_key(tags: &NameTags, filename: &str) -> String {
    match tags {
        NameTags::Icon(t) => format!("ICONS/normalized/{}/{}", t.mf_div, filename),
        NameTags::Spec(t) => format!(
            "SPECS/normalized/region={}/state={}/county={}/ownership={}/naics={}/{}/{}/{}",
            t.country, t.state, t.fips, t.ownership, t.naics, t.mf_div, t.mf_sec, filename
        ),
    }
}

/// Serialize the tags as `key=value` pairs joined by `&`, in the fixed
/// per-kind field order.
///
/// Values are not escaped; a value containing `&` or `=` flows into the
/// string verbatim. Callers that need S3-tagging-safe output must encode
/// reserved characters themselves.
pub fn tag_string(tags: &NameTags) -> String {
    tags.pairs()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
