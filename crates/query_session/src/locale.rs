//! BCP 47 language tags.
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, SessionError};

/// Locale requested by a client, parsed from a well-formed BCP 47 language
/// tag. Subtags are stored with canonical casing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Locale {
    language: String,
    extlangs: Vec<String>,
    script: Option<String>,
    region: Option<String>,
    variants: Vec<String>,
    /// Extension sequences including their singleton, e.g. `u-ca-buddhist`.
    extensions: Vec<String>,
    /// Private use sequence without the leading `x`.
    private_use: Vec<String>,
    /// Set for grandfathered tags, which are kept whole.
    grandfathered: Option<&'static str>,
}

/// Grandfathered tags from RFC 5646, irregular then regular, in registry
/// casing.
const GRANDFATHERED_TAGS: &[&str] = &[
    "en-GB-oed",
    "i-ami",
    "i-bnn",
    "i-default",
    "i-enochian",
    "i-hak",
    "i-klingon",
    "i-lux",
    "i-mingo",
    "i-navajo",
    "i-pwn",
    "i-tao",
    "i-tay",
    "i-tsu",
    "sgn-BE-FR",
    "sgn-BE-NL",
    "sgn-CH-DE",
    "art-lojban",
    "cel-gaulish",
    "no-bok",
    "no-nyn",
    "zh-guoyu",
    "zh-hakka",
    "zh-min",
    "zh-min-nan",
    "zh-xiang",
];

fn is_alpha(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_digit(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn is_alphanum(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn is_language(s: &str) -> bool {
    (2..=8).contains(&s.len()) && is_alpha(s)
}

fn is_extlang(s: &str) -> bool {
    s.len() == 3 && is_alpha(s)
}

fn is_script(s: &str) -> bool {
    s.len() == 4 && is_alpha(s)
}

fn is_region(s: &str) -> bool {
    (s.len() == 2 && is_alpha(s)) || (s.len() == 3 && is_digit(s))
}

fn is_variant(s: &str) -> bool {
    let b = s.as_bytes();
    ((5..=8).contains(&s.len()) && is_alphanum(s))
        || (s.len() == 4 && b[0].is_ascii_digit() && is_alphanum(s))
}

fn is_singleton(s: &str) -> bool {
    s.len() == 1 && is_alphanum(s) && !s.eq_ignore_ascii_case("x")
}

fn is_extension_subtag(s: &str) -> bool {
    (2..=8).contains(&s.len()) && is_alphanum(s)
}

fn is_private_use_subtag(s: &str) -> bool {
    (1..=8).contains(&s.len()) && is_alphanum(s)
}

fn title_case(s: &str) -> String {
    let mut out = s.to_ascii_lowercase();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}

impl Locale {
    /// Parse a language tag such as `en-US` or `zh-Hant-TW`.
    pub fn parse(tag: &str) -> Result<Self> {
        let malformed = || SessionError::InvalidLanguageTag(tag.to_string());

        if let Some(grandfathered) = GRANDFATHERED_TAGS
            .iter()
            .copied()
            .find(|g| g.eq_ignore_ascii_case(tag))
        {
            return Ok(Locale {
                grandfathered: Some(grandfathered),
                ..Default::default()
            });
        }

        let subtags: Vec<&str> = tag.split('-').collect();
        let mut idx = 0;
        let mut locale = Locale::default();

        let next = |idx: usize| subtags.get(idx).copied();

        // Tags made up of only private use subtags have no language.
        if !next(0).is_some_and(|s| s.eq_ignore_ascii_case("x")) {
            let language = next(idx).filter(|s| is_language(s)).ok_or_else(malformed)?;
            locale.language = language.to_ascii_lowercase();
            idx += 1;

            if language.len() <= 3 {
                while locale.extlangs.len() < 3 {
                    match next(idx) {
                        Some(s) if is_extlang(s) => {
                            locale.extlangs.push(s.to_ascii_lowercase());
                            idx += 1;
                        }
                        _ => break,
                    }
                }
            }

            if let Some(s) = next(idx).filter(|s| is_script(s)) {
                locale.script = Some(title_case(s));
                idx += 1;
            }

            if let Some(s) = next(idx).filter(|s| is_region(s)) {
                locale.region = Some(s.to_ascii_uppercase());
                idx += 1;
            }

            while let Some(s) = next(idx).filter(|s| is_variant(s)) {
                let variant = s.to_ascii_lowercase();
                if locale.variants.contains(&variant) {
                    return Err(malformed());
                }
                locale.variants.push(variant);
                idx += 1;
            }

            while let Some(singleton) = next(idx).filter(|s| is_singleton(s)) {
                let singleton = singleton.to_ascii_lowercase();
                if locale
                    .extensions
                    .iter()
                    .any(|ext| ext.starts_with(singleton.as_str()))
                {
                    return Err(malformed());
                }
                idx += 1;

                let mut ext = singleton;
                let mut count = 0;
                while let Some(s) = next(idx).filter(|s| is_extension_subtag(s)) {
                    ext.push('-');
                    ext.push_str(&s.to_ascii_lowercase());
                    count += 1;
                    idx += 1;
                }
                if count == 0 {
                    return Err(malformed());
                }
                locale.extensions.push(ext);
            }
        }

        if next(idx).is_some_and(|s| s.eq_ignore_ascii_case("x")) {
            idx += 1;
            while let Some(s) = next(idx).filter(|s| is_private_use_subtag(s)) {
                locale.private_use.push(s.to_ascii_lowercase());
                idx += 1;
            }
            if locale.private_use.is_empty() {
                return Err(malformed());
            }
        }

        if idx != subtags.len() {
            return Err(malformed());
        }

        Ok(locale)
    }

    /// Primary language subtag. Empty for private use only and grandfathered
    /// tags.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Canonically cased language tag.
    pub fn to_language_tag(&self) -> String {
        if let Some(tag) = self.grandfathered {
            return tag.to_string();
        }

        let mut parts: Vec<&str> = Vec::new();
        if !self.language.is_empty() {
            parts.push(&self.language);
        }
        parts.extend(self.extlangs.iter().map(String::as_str));
        parts.extend(self.script.as_deref());
        parts.extend(self.region.as_deref());
        parts.extend(self.variants.iter().map(String::as_str));
        parts.extend(self.extensions.iter().map(String::as_str));
        if !self.private_use.is_empty() {
            parts.push("x");
            parts.extend(self.private_use.iter().map(String::as_str));
        }
        parts.join("-")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_language_tag())
    }
}

impl FromStr for Locale {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
