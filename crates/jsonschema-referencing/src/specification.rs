//! JSON Schema draft identification.
use crate::error::Error;

/// A JSON Schema draft/dialect. Drives keyword vocabulary and a handful of
/// resolution details (e.g. whether `$recursiveRef` exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Draft {
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl Draft {
    /// The latest draft this crate understands; used when a schema carries
    /// no recognisable `$schema` at all.
    #[must_use]
    pub fn latest() -> Self {
        Draft::Draft202012
    }

    /// Looks up a draft by its canonical `$schema` meta-schema URI (the
    /// fragment, trailing slash, and `http`/`https` scheme are all ignored).
    pub fn from_schema_id(schema_id: &str) -> Result<Self, Error> {
        let normalized = schema_id
            .trim_end_matches('#')
            .trim_end_matches('/')
            .replacen("https://", "", 1)
            .replacen("http://", "", 1);
        match normalized.as_str() {
            "json-schema.org/schema" => Ok(Draft::latest()),
            "json-schema.org/draft-04/schema" => Ok(Draft::Draft4),
            "json-schema.org/draft-06/schema" => Ok(Draft::Draft6),
            "json-schema.org/draft-07/schema" => Ok(Draft::Draft7),
            "json-schema.org/draft/2019-09/schema" => Ok(Draft::Draft201909),
            "json-schema.org/draft/2020-12/schema" => Ok(Draft::Draft202012),
            _ => Err(Error::unknown_specification(schema_id)),
        }
    }

    #[must_use]
    pub fn supports_recursive_ref(self) -> bool {
        matches!(self, Draft::Draft201909)
    }

    #[must_use]
    pub fn supports_dynamic_ref(self) -> bool {
        matches!(self, Draft::Draft202012)
    }

    #[must_use]
    pub fn id_keyword(self) -> &'static str {
        match self {
            Draft::Draft4 => "id",
            _ => "$id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://json-schema.org/draft/2020-12/schema", Draft::Draft202012)]
    #[test_case("http://json-schema.org/draft-07/schema#", Draft::Draft7)]
    #[test_case("https://json-schema.org/draft-04/schema#", Draft::Draft4)]
    fn recognises_known_drafts(schema_id: &str, expected: Draft) {
        assert_eq!(Draft::from_schema_id(schema_id).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_specification() {
        assert!(Draft::from_schema_id("https://example.com/not-a-draft").is_err());
    }
}
