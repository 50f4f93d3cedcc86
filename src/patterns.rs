//! Filename grammars for construction documents.
//!
//! Two anchored patterns are recognized, tried in order — icon first, then
//! spec sheet; the first match wins and a filename matching neither is
//! definitively rejected (no partial results).
//!
//! | Grammar | Shape | Example |
//! |---------|-------|---------|
//! | Icon | `ICON-<mf_sec>-<TYPE>[-<VARIANT>].{svg,png,pdf}` | `ICON-102000-FURN-RED.png` |
//! | Spec | `USA-<ST>-<fips>-<own>-<naics>-<mf_sec>-<desc>-<brand>.pdf` | `USA-CA-037-1-238110-102000-CABINET-STORAGE-ACME.pdf` |
//!
//! A match yields a [`NameTags`] value carrying the fields the grammar
//! defines. `mf_div` is always the first two digits of the six-digit
//! MasterFormat section code. For icons the type slug splits from the
//! optional variant at the first hyphen; for spec sheets the last
//! hyphen-delimited segment before `.pdf` is the brand and the derived type
//! is the description's text before its first hyphen, upper-cased.

use std::sync::OnceLock;

use regex::Regex;

/// Icon grammar. The type-slug group is lazy so a hyphenated tail splits
/// into type + variant at the first hyphen.
const ICON_PATTERN: &str = r"^ICON-(\d{6})-([A-Z0-9-]+?)(?:-([A-Z0-9-]+))?\.(svg|png|pdf)$";

/// Spec-sheet grammar. The description group is greedy, so the final
/// segment lands in the brand group. Extension literal is case-sensitive.
const SPEC_PATTERN: &str =
    r"^(USA)-([A-Z]{2})-(\d{3})-([12])-([0-9]{6})-([0-9]{6})-([A-Za-z0-9-]+)-([A-Za-z0-9-]+)\.pdf$";

fn icon_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ICON_PATTERN).expect("icon pattern is valid"))
}

fn spec_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SPEC_PATTERN).expect("spec pattern is valid"))
}

/// Tags extracted from a filename matching the icon grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTags {
    /// Six-digit MasterFormat section code.
    pub mf_sec: String,
    /// Two-digit MasterFormat division (prefix of `mf_sec`).
    pub mf_div: String,
    /// Component type slug, upper-cased.
    pub type_slug: String,
    /// Optional variant suffix, upper-cased.
    pub variant: Option<String>,
}

/// Tags extracted from a filename matching the spec-sheet grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTags {
    pub country: String,
    /// Two-letter state code.
    pub state: String,
    /// Three-digit county FIPS code.
    pub fips: String,
    /// Ownership flag, `1` or `2`.
    pub ownership: String,
    /// Six-digit NAICS industry code.
    pub naics: String,
    pub mf_sec: String,
    pub mf_div: String,
    /// Description text before its first hyphen, upper-cased.
    pub type_slug: String,
    pub brand: String,
    /// Full description segment, case preserved.
    pub desc: String,
}

/// Result of classifying a filename against the two grammars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTags {
    Icon(IconTags),
    Spec(SpecTags),
}

impl NameTags {
    /// Kind discriminator, `icon` or `spec`.
    pub fn kind(&self) -> &'static str {
        match self {
            NameTags::Icon(_) => "icon",
            NameTags::Spec(_) => "spec",
        }
    }

    /// MasterFormat section code (present for both kinds).
    pub fn mf_sec(&self) -> &str {
        match self {
            NameTags::Icon(t) => &t.mf_sec,
            NameTags::Spec(t) => &t.mf_sec,
        }
    }

    /// Component type slug (present for both kinds).
    pub fn type_slug(&self) -> &str {
        match self {
            NameTags::Icon(t) => &t.type_slug,
            NameTags::Spec(t) => &t.type_slug,
        }
    }

    /// All tag pairs in serialization order. The order is fixed per kind and
    /// determines the field order of the tag string attached at upload time.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        match self {
            NameTags::Icon(t) => {
                let mut pairs = vec![
                    ("kind", "icon"),
                    ("mf_sec", t.mf_sec.as_str()),
                    ("mf_div", t.mf_div.as_str()),
                    ("type", t.type_slug.as_str()),
                ];
                if let Some(ref variant) = t.variant {
                    pairs.push(("variant", variant.as_str()));
                }
                pairs
            }
            NameTags::Spec(t) => vec![
                ("kind", "spec"),
                ("country", t.country.as_str()),
                ("state", t.state.as_str()),
                ("fips", t.fips.as_str()),
                ("ownership", t.ownership.as_str()),
                ("naics", t.naics.as_str()),
                ("mf_sec", t.mf_sec.as_str()),
                ("mf_div", t.mf_div.as_str()),
                ("type", t.type_slug.as_str()),
                ("brand", t.brand.as_str()),
                ("desc", t.desc.as_str()),
            ],
        }
    }
}

/// Classify a bare filename against the icon grammar, then the spec grammar.
///
/// Returns `None` when neither pattern matches the entire name.
pub fn classify(name: &str) -> Option<NameTags> {
    parse_icon(name).or_else(|| parse_spec(name))
}

fn parse_icon(name: &str) -> Option<NameTags> {
    let caps = icon_re().captures(name)?;
    let mf_sec = caps[1].to_string();
    let mf_div = mf_sec[..2].to_string();
    Some(NameTags::Icon(IconTags {
        mf_div,
        type_slug: caps[2].to_uppercase(),
        variant: caps.get(3).map(|m| m.as_str().to_uppercase()),
        mf_sec,
    }))
}

fn parse_spec(name: &str) -> Option<NameTags> {
    let caps = spec_re().captures(name)?;
    let mf_sec = caps[6].to_string();
    let mf_div = mf_sec[..2].to_string();
    let desc = caps[7].to_string();
    // The derived type is the description's leading hyphen-piece.
    let type_slug = desc.split('-').next().unwrap_or("").to_uppercase();
    Some(NameTags::Spec(SpecTags {
        country: caps[1].to_string(),
        state: caps[2].to_string(),
        fips: caps[3].to_string(),
        ownership: caps[4].to_string(),
        naics: caps[5].to_string(),
        mf_sec,
        mf_div,
        type_slug,
        brand: caps[8].to_string(),
        desc,
    }))
}
