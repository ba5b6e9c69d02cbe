//! JSON Pointer segment representation, encoding and decoding.
use std::fmt;

/// A single JSON Pointer segment: an object key or an array index.
///
/// Kept as a typed enum (rather than always stringifying indices) so path
/// construction during validation does not allocate on the hot path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        PathSegment::Index(value)
    }
}

/// An ordered sequence of [`PathSegment`]s, displaying as a JSON Pointer
/// string with `~1`/`~0` escaping applied to keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPointer(pub Vec<PathSegment>);

impl JsonPointer {
    #[must_use]
    pub fn root() -> Self {
        JsonPointer(Vec::new())
    }

    #[must_use]
    pub fn push(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        JsonPointer(segments)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            f.write_str("/")?;
            match segment {
                PathSegment::Key(key) => encode_segment(key, f)?,
                PathSegment::Index(idx) => {
                    let mut buf = itoa::Buffer::new();
                    f.write_str(buf.format(*idx))?;
                }
            }
        }
        Ok(())
    }
}

fn encode_segment(raw: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ch in raw.chars() {
        match ch {
            '~' => f.write_str("~0")?,
            '/' => f.write_str("~1")?,
            _ => fmt::Write::write_char(f, ch)?,
        }
    }
    Ok(())
}

/// Decodes a raw `~1`/`~0`-escaped JSON Pointer segment back to its literal form.
#[must_use]
pub fn unescape_segment(raw: &str) -> String {
    // `~1` must be unescaped to `/` before `~0` is unescaped to `~`, otherwise
    // a literal `~01` would incorrectly become `/`.
    raw.replace("~1", "/").replace("~0", "~")
}

/// Splits a JSON Pointer string (without its leading fragment `#`) into its
/// percent-decoded, `~`-unescaped path segments.
#[must_use]
pub fn split_pointer(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| unescape_segment(&percent_decode(raw)))
        .collect()
}

/// Minimal percent-decoder sufficient for fragment identifiers; invalid
/// sequences are passed through unchanged rather than rejected.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(value) = u8::from_str_radix(&input[i + 1..i + 3], 16) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_escapes() {
        let ptr = JsonPointer::root().push("a/b".to_string()).push("c~d".to_string());
        assert_eq!(ptr.to_string(), "/a~1b/c~0d");
    }

    #[test]
    fn splits_and_unescapes() {
        assert_eq!(split_pointer("/a~1b/c~0d"), vec!["a/b".to_string(), "c~d".to_string()]);
    }
}
