//! Locator strings: `?`-separated `key=value` segments attached to node tickets.
//!
//! `kythe://corpus?lang=java?path=foo/Bar.java#sig` carries the language and
//! file path of the node it names.

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// Value of `key` in `locator`, percent-decoded, or an empty string when absent.
pub fn query_variable(locator: &str, key: &str) -> String {
    for segment in locator.split('?') {
        let mut pair = segment.split('=');
        let name = pair.next().unwrap_or_default();
        if decode(name) == key {
            return pair.next().map(decode).unwrap_or_default();
        }
    }
    String::new()
}

/// Like [`query_variable`] but treats an empty value as malformed.
pub fn require(locator: &str, key: &'static str) -> Result<String> {
    let value = query_variable(locator, key);
    if value.is_empty() {
        return Err(Error::MalformedLocator {
            locator: locator.to_string(),
            key,
        });
    }
    Ok(value)
}

/// Drop a trailing `#fragment`.
pub fn strip_hash(value: &str) -> &str {
    match value.rfind('#') {
        Some(i) => &value[..i],
        None => value,
    }
}

/// File path named by `locator`.
pub fn path(locator: &str) -> Result<String> {
    require(locator, "path").map(|p| strip_hash(&p).to_string())
}

/// Language tag named by `locator`.
pub fn language(locator: &str) -> Result<String> {
    require(locator, "lang").map(|l| strip_hash(&l).to_string())
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
