//! URI normalisation and relative resolution.
use crate::error::Error;

/// Normalises a URI string: strips a bare trailing `#`, and case-folds a
/// `file:` URI's Windows drive letter. Two URIs are considered equal by this
/// crate iff their normalised forms are byte-equal.
#[must_use]
pub fn normalize(uri: &str) -> String {
    let uri = uri.strip_suffix('#').unwrap_or(uri);
    fold_drive_letter(uri)
}

/// Lower-cases a single-letter Windows drive segment in a `file:` URI, e.g.
/// `file:///C:/a.json` becomes `file:///c:/a.json`. Left unchanged otherwise.
fn fold_drive_letter(uri: &str) -> String {
    const PREFIXES: [&str; 2] = ["file:///", "file://localhost/"];
    for prefix in PREFIXES {
        if let Some(rest) = uri.strip_prefix(prefix) {
            let mut chars = rest.chars();
            if let (Some(letter), Some(':')) = (chars.next(), chars.next()) {
                if letter.is_ascii_alphabetic() {
                    let mut out = String::with_capacity(uri.len());
                    out.push_str(prefix);
                    out.push(letter.to_ascii_lowercase());
                    out.push(':');
                    out.push_str(chars.as_str());
                    return out;
                }
            }
        }
    }
    uri.to_string()
}

/// Resolves `reference` against `base`. `base` must already be an absolute
/// URI; `reference` may be relative. Schemeless references (bare workspace
/// paths) are handed to `workspace_resolver` when provided, matching the
/// caller-supplied workspace-context path resolution rule.
pub fn resolve(base: &str, reference: &str, workspace_resolver: Option<&dyn Fn(&str, &str) -> Option<String>>) -> Result<String, Error> {
    if reference.is_empty() {
        return Ok(normalize(base));
    }
    if url::Url::parse(reference).is_err() {
        if let Some(resolver) = workspace_resolver {
            if let Some(resolved) = resolver(base, reference) {
                return Ok(normalize(&resolved));
            }
        }
    }
    let base_url = url::Url::parse(base)?;
    let resolved = base_url.join(reference)?;
    Ok(normalize(resolved.as_str()))
}

/// Splits a `$ref` value into its URI part and fragment, per RFC 3986: the
/// first `#` (if any) separates the two. The fragment does not include the
/// `#` itself.
#[must_use]
pub fn split_fragment(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((uri, fragment)) => (uri, fragment),
        None => (reference, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_hash() {
        assert_eq!(normalize("https://example.com/schema#"), "https://example.com/schema");
    }

    #[test]
    fn folds_drive_letter_case() {
        assert_eq!(normalize("file:///C:/schemas/a.json"), "file:///c:/schemas/a.json");
    }

    #[test]
    fn leaves_non_file_uris_untouched() {
        assert_eq!(normalize("https://example.com/a#b"), "https://example.com/a#b");
    }

    #[test]
    fn splits_ref_into_uri_and_fragment() {
        assert_eq!(split_fragment("a.json#/definitions/x"), ("a.json", "/definitions/x"));
        assert_eq!(split_fragment("#/definitions/x"), ("", "/definitions/x"));
        assert_eq!(split_fragment("a.json"), ("a.json", ""));
    }

    #[test]
    fn resolves_relative_reference_against_base() {
        let resolved = resolve("https://example.com/a/b.json", "c.json", None).unwrap();
        assert_eq!(resolved, "https://example.com/a/c.json");
    }
}
