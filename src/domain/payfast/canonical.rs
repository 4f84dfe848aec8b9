//! Canonical query-string encoding for PayFast signatures.
//!
//! The signature is computed over `key=value` pairs joined by `&`, in the
//! order the caller supplies them. Values are form-urlencoded with uppercase
//! hex escapes. Only the outbound payment request rewrites `%20` as `+`;
//! inbound notifications are verified over the `%20` form.
//!
//! The unreserved set matches PHP `urlencode`, which is what PayFast signs
//! with: only alphanumerics and `-_.` pass through, so `!*()` and `~` are
//! escaped. Encoders that leave `!*()` literal produce strings PayFast
//! never signed, and notifications carrying those characters would fail
//! verification.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in a value: ASCII alphanumerics and `-_.`.
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// How a literal space is rendered after encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceEncoding {
    /// `%20`, used when verifying inbound notifications.
    Percent,
    /// `+`, used for outbound requests and revalidation.
    Plus,
}

/// Ordered field set. Insertion order is the canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    pairs: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from pairs in the given order, dropping empty values.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            set.push(key, value);
        }
        set
    }

    /// Appends a field. Empty values are omitted entirely.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.pairs.push((key.into(), value));
    }

    /// Appends an optional field; `None` is treated as absent.
    pub fn push_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Returns a copy with every occurrence of `key` removed.
    pub fn without(&self, key: &str) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the set into the string the signature is computed over.
    pub fn canonical_string(&self, spaces: SpaceEncoding) -> String {
        let joined = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let upper = uppercase_escapes(&joined);
        match spaces {
            SpaceEncoding::Percent => upper,
            SpaceEncoding::Plus => upper.replace("%20", "+"),
        }
    }
}

/// Form-urlencodes a single value. Spaces become `%20`.
pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM_VALUE).to_string()
}

/// Rewrites every `%xx` escape so both hex digits are uppercase.
///
/// Anything that is not a complete escape is copied through unchanged, so
/// applying this twice gives the same result as applying it once.
pub fn uppercase_escapes(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '%'
            && i + 2 < chars.len()
            && chars[i + 1].is_ascii_hexdigit()
            && chars[i + 2].is_ascii_hexdigit()
        {
            out.push('%');
            out.push(chars[i + 1].to_ascii_uppercase());
            out.push(chars[i + 2].to_ascii_uppercase());
            i += 3;
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}
