//! Link registry: the closed set of rapid-upload link encodings plus the
//! render/parse machinery between them and [`FileFacts`].
//!
//! # Identity rules
//! Every encoding is identified by a lowercase wire name (`baidupcs-go`,
//! `pandownload`, `rapid-upload-link`, `rapid-upload-link-short`). The set
//! is closed; an identifier outside it is rejected, never guessed at.
//!
//! # Lossy short form
//! `rapid-upload-link-short` omits the slice checksum, so it can be
//! rendered but never parsed back: a short-form string carries too little
//! information to reconstruct [`FileFacts`], and [`parse`] rejects it the
//! same way it rejects malformed input.
//!
//! # Anchoring
//! Every matcher consumes the entire input string. Leading or trailing
//! junk fails the match, which is what keeps the patterns mutually
//! exclusive on valid links — there is no scoring step to break ties.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

use crate::facts::FileFacts;

/// Scheme prefix of the PanDownload wire form.
pub const BDPAN_PREFIX: &str = "bdpan://";

// ── LinkFormat enum ──────────────────────────────────────────────────────────

/// One of the supported link encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFormat {
    /// `BaiduPCS-Go rapidupload -length=.. -md5=.. -slicemd5=.. "name"`
    BaiduPcsGo,
    /// `bdpan://` + base64 of `name|length|md5|slicemd5`
    PanDownload,
    /// `md5#slicemd5#length#name`
    Long,
    /// `md5#length#name` — render-only, see module docs.
    Short,
}

impl LinkFormat {
    pub const ALL: [LinkFormat; 4] = [
        LinkFormat::BaiduPcsGo,
        LinkFormat::PanDownload,
        LinkFormat::Long,
        LinkFormat::Short,
    ];

    /// Wire identifier, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            LinkFormat::BaiduPcsGo  => "baidupcs-go",
            LinkFormat::PanDownload => "pandownload",
            LinkFormat::Long        => "rapid-upload-link",
            LinkFormat::Short       => "rapid-upload-link-short",
        }
    }

    /// Display label for CLI output (never parsed).
    pub fn label(self) -> &'static str {
        match self {
            LinkFormat::BaiduPcsGo  => "BaiduPCS-Go",
            LinkFormat::PanDownload => "PanDownload",
            LinkFormat::Long        => "rapid-upload code (long)",
            LinkFormat::Short       => "rapid-upload code (short)",
        }
    }

    /// Parse from a CLI string, case-insensitive.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "baidupcs-go"             => Some(LinkFormat::BaiduPcsGo),
            "pandownload"             => Some(LinkFormat::PanDownload),
            "rapid-upload-link"       => Some(LinkFormat::Long),
            "rapid-upload-link-short" => Some(LinkFormat::Short),
            _                         => None,
        }
    }

    /// Whether this encoding can serve as a [`parse`] source.
    pub fn supports_parse(self) -> bool {
        !matches!(self, LinkFormat::Short)
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Unknown link format: {0}")]
    UnknownFormat(String),
    #[error("Unrecognized link (short-form links cannot be a conversion source): {0}")]
    Unrecognized(String),
}

// ── Render ───────────────────────────────────────────────────────────────────

/// Render the facts into the given encoding. Purely a formatting step;
/// cannot fail for well-formed facts.
pub fn render(facts: &FileFacts, format: LinkFormat) -> String {
    match format {
        LinkFormat::BaiduPcsGo => format!(
            "BaiduPCS-Go rapidupload -length={} -md5={} -slicemd5={} \"{}\"",
            facts.length, facts.md5, facts.slice_md5, facts.name
        ),
        LinkFormat::PanDownload => {
            let plain = format!(
                "{}|{}|{}|{}",
                facts.name, facts.length, facts.md5, facts.slice_md5
            );
            format!("{}{}", BDPAN_PREFIX, BASE64.encode(plain.as_bytes()))
        }
        LinkFormat::Long => format!(
            "{}#{}#{}#{}",
            facts.md5, facts.slice_md5, facts.length, facts.name
        ),
        LinkFormat::Short => format!("{}#{}#{}", facts.md5, facts.length, facts.name),
    }
}

// ── Parse ────────────────────────────────────────────────────────────────────

type Matcher = fn(&str) -> Option<FileFacts>;

/// Non-lossy formats, tried in this order. First full-string match wins.
const PARSERS: [(LinkFormat, Matcher); 3] = [
    (LinkFormat::BaiduPcsGo, match_baidupcs_go),
    (LinkFormat::PanDownload, match_pandownload),
    (LinkFormat::Long, match_long),
];

/// Identify which non-lossy encoding a string uses, without extracting.
pub fn detect(link: &str) -> Option<LinkFormat> {
    PARSERS
        .iter()
        .find(|(_, matcher)| matcher(link).is_some())
        .map(|(format, _)| *format)
}

/// Extract [`FileFacts`] from a link in any non-lossy encoding.
///
/// Fails with [`LinkError::Unrecognized`] when nothing matches — which
/// covers malformed input and valid short-form links alike.
pub fn parse(link: &str) -> Result<FileFacts, LinkError> {
    PARSERS
        .iter()
        .find_map(|(_, matcher)| matcher(link))
        .ok_or_else(|| LinkError::Unrecognized(link.to_string()))
}

/// Resolve requested format identifiers against the closed set.
///
/// All names are resolved up front, before any rendering, so a bad
/// identifier fails the whole request rather than a random suffix of it.
pub fn resolve_formats(names: &[String]) -> Result<Vec<LinkFormat>, LinkError> {
    names
        .iter()
        .map(|n| LinkFormat::from_name(n).ok_or_else(|| LinkError::UnknownFormat(n.clone())))
        .collect()
}

// ── Matchers ─────────────────────────────────────────────────────────────────

fn match_baidupcs_go(link: &str) -> Option<FileFacts> {
    let rest = link.strip_prefix("BaiduPCS-Go rapidupload -length=")?;
    let (length, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix(" -md5=")?;
    let (md5, rest) = take_hex32(rest)?;
    let rest = rest.strip_prefix(" -slicemd5=")?;
    let (slice_md5, rest) = take_hex32(rest)?;
    // Name is everything between the opening quote and the final character,
    // which must be the closing quote. Embedded quotes survive.
    let name = rest.strip_prefix(" \"")?.strip_suffix('"')?;
    Some(FileFacts { name: name.to_string(), length, md5, slice_md5 })
}

fn match_pandownload(link: &str) -> Option<FileFacts> {
    let encoded = link.strip_prefix(BDPAN_PREFIX)?;
    let plain = String::from_utf8(BASE64.decode(encoded).ok()?).ok()?;
    // name|length|md5|slicemd5 — split from the right so a '|' inside the
    // name stays part of the name.
    let mut fields = plain.rsplitn(4, '|');
    let slice_md5 = full_hex32(fields.next()?)?;
    let md5 = full_hex32(fields.next()?)?;
    let length = full_digits(fields.next()?)?;
    let name = fields.next()?;
    Some(FileFacts { name: name.to_string(), length, md5, slice_md5 })
}

fn match_long(link: &str) -> Option<FileFacts> {
    let (md5, rest) = take_hex32(link)?;
    let rest = rest.strip_prefix('#')?;
    let (slice_md5, rest) = take_hex32(rest)?;
    let rest = rest.strip_prefix('#')?;
    let (length, rest) = take_digits(rest)?;
    // Remainder capture: a '#' inside the name is carried along verbatim.
    let name = rest.strip_prefix('#')?;
    Some(FileFacts { name: name.to_string(), length, md5, slice_md5 })
}

// ── Field scanners ───────────────────────────────────────────────────────────

/// Leading run of ASCII digits, parsed as u64. At least one digit required.
fn take_digits(s: &str) -> Option<(u64, &str)> {
    let n = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    if n == 0 {
        return None;
    }
    let value = s[..n].parse().ok()?;
    Some((value, &s[n..]))
}

/// First 32 bytes, all ASCII hex digits, normalized to uppercase.
fn take_hex32(s: &str) -> Option<(String, &str)> {
    if s.len() < 32 || !s.as_bytes()[..32].iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    Some((s[..32].to_ascii_uppercase(), &s[32..]))
}

/// Entire field must be a 32-digit hex checksum.
fn full_hex32(s: &str) -> Option<String> {
    match take_hex32(s)? {
        (hex, "") => Some(hex),
        _ => None,
    }
}

/// Entire field must be digits.
fn full_digits(s: &str) -> Option<u64> {
    match take_digits(s)? {
        (value, "") => Some(value),
        _ => None,
    }
}
