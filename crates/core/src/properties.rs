//! Properties Parsing
//!
//! Line-oriented `key=value` text as used by `sager.properties` and
//! `local.properties`.

use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// A flat, ordered key/value bag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text.
    ///
    /// Keys end at the first unescaped `=`, `:` or blank. Escapes are
    /// resolved in both keys and values, and a line continues when it ends
    /// in an odd number of backslashes.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line = raw.trim_start_matches(is_blank);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let mut logical = line.to_string();
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let key = unescape(key, index + 1)?;
            if key.is_empty() {
                return Err(CoreError::Properties {
                    line: index + 1,
                    message: "empty key".into(),
                });
            }

            entries.insert(key, unescape(value, index + 1)?);
        }

        Ok(Self { entries })
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split a logical line into its raw key and raw value
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (pos, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..pos], line[pos + 1..].trim_start_matches(is_blank)),
            c if is_blank(c) => {
                key_end = pos;
                break;
            }
            _ => {}
        }
    }

    // A blank-terminated key may still be followed by one separator
    let rest = line[key_end..].trim_start_matches(is_blank);
    let value = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);
    (&line[..key_end], value.trim_start_matches(is_blank))
}

fn unescape(raw: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| CoreError::Properties {
                        line,
                        message: format!("malformed \\u{} escape", hex),
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let props = Properties::parse(
            "# project metadata\nPACKAGE_NAME=io.example.app\nVERSION_NAME = 1.2.0\n\n! legacy\nVERSION_CODE:40\n",
        )
        .unwrap();

        assert_eq!(props.len(), 3);
        assert_eq!(props.get("PACKAGE_NAME"), Some("io.example.app"));
        assert_eq!(props.get("VERSION_NAME"), Some("1.2.0"));
        assert_eq!(props.get("VERSION_CODE"), Some("40"));
    }

    #[test]
    fn test_value_keeps_later_separators() {
        let props = Properties::parse("MIRROR=https://host:8080/a=b\n").unwrap();
        assert_eq!(props.get("MIRROR"), Some("https://host:8080/a=b"));
    }

    #[test]
    fn test_escapes_are_resolved() {
        let text = r"KEYSTORE_PASS=abc\=def
sdk.dir=C\:\\Android\\Sdk
odd\ key=1
GREETING=caf\u00e9\tok
";
        let props = Properties::parse(text).unwrap();
        assert_eq!(props.get("KEYSTORE_PASS"), Some("abc=def"));
        assert_eq!(props.get("sdk.dir"), Some("C:\\Android\\Sdk"));
        assert_eq!(props.get("odd key"), Some("1"));
        assert_eq!(props.get("GREETING"), Some("caf\u{e9}\tok"));
    }

    #[test]
    fn test_whitespace_separates_key_and_value() {
        let props = Properties::parse("ALIAS_NAME release\nALIAS_PASS  =  secret\n").unwrap();
        assert_eq!(props.get("ALIAS_NAME"), Some("release"));
        assert_eq!(props.get("ALIAS_PASS"), Some("secret"));
    }

    #[test]
    fn test_escaped_backslash_does_not_continue() {
        let props = Properties::parse("PASS=ends\\\\\nNEXT=1\n").unwrap();
        assert_eq!(props.get("PASS"), Some("ends\\"));
        assert_eq!(props.get("NEXT"), Some("1"));
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = Properties::parse("A=1\nB=\\u12g4\n").unwrap_err();
        assert!(matches!(err, CoreError::Properties { line: 2, .. }));
    }

    #[test]
    fn test_continuation_lines() {
        let props = Properties::parse("ABIS=arm64-v8a,\\\n    x86_64\nNEXT=1").unwrap();
        assert_eq!(props.get("ABIS"), Some("arm64-v8a,x86_64"));
        assert_eq!(props.get("NEXT"), Some("1"));
    }

    #[test]
    fn test_bare_key_has_empty_value() {
        let props = Properties::parse("FLAG\n").unwrap();
        assert_eq!(props.get("FLAG"), Some(""));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let err = Properties::parse("A=1\n=orphan\n").unwrap_err();
        assert!(matches!(err, CoreError::Properties { line: 2, .. }));
    }
}
