use std::collections::BTreeMap;

/// Flat key/value pairs read from a Java-style `.properties` file.
///
/// Supported syntax: `key=value`, `key: value` and `key value` separators,
/// `#` / `!` comment lines, trailing-backslash line continuation, and the
/// `\t \n \r \f \uXXXX` escapes (any other escaped char stands for itself).
/// A key that appears twice keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Self {
        let mut props = Self::new();
        for line in logical_lines(input) {
            let (key, value) = split_entry(&line);
            props.entries.insert(key, value);
        }
        props
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Joins continued lines and drops blanks and comments.
fn logical_lines(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending: Option<String> = None;

    for raw in input.lines() {
        let line = raw.trim_start_matches(is_blank);

        let mut acc = match pending.take() {
            Some(acc) => acc,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                String::new()
            }
        };

        if ends_with_continuation(line) {
            acc.push_str(&line[..line.len() - 1]);
            pending = Some(acc);
        } else {
            acc.push_str(line);
            out.push(acc);
        }
    }

    if let Some(acc) = pending {
        out.push(acc);
    }
    out
}

fn split_entry(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();

    let mut key_end = len;
    let mut escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let mut pos = key_end;
    while pos < len && is_blank(chars[pos]) {
        pos += 1;
    }
    if pos < len && (chars[pos] == '=' || chars[pos] == ':') {
        pos += 1;
        while pos < len && is_blank(chars[pos]) {
            pos += 1;
        }
    }

    let key: String = chars[..key_end].iter().collect();
    let value: String = chars[pos..].iter().collect();
    (unescape(&key), unescape(&value))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
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
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
