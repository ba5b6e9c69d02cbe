use core::fmt;

/// Errors that can occur during schema retrieval, reference resolution and
/// cache bookkeeping.
#[derive(Debug)]
pub enum Error {
    /// A JSON Pointer leads to a part of a document that does not exist.
    PointerToNowhere { pointer: String },
    /// An anchor does not exist within a particular resource.
    NoSuchAnchor { anchor: String },
    /// An error occurred while parsing or resolving a URI.
    InvalidUri(url::ParseError),
    /// An unknown JSON Schema specification was encountered.
    UnknownSpecification { specification: String },
}

impl Error {
    pub(crate) fn pointer_to_nowhere(pointer: impl Into<String>) -> Error {
        Error::PointerToNowhere { pointer: pointer.into() }
    }

    pub(crate) fn no_such_anchor(anchor: impl Into<String>) -> Error {
        Error::NoSuchAnchor { anchor: anchor.into() }
    }

    pub(crate) fn unknown_specification(specification: impl Into<String>) -> Error {
        Error::UnknownSpecification { specification: specification.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PointerToNowhere { pointer } => write!(f, "Pointer '{pointer}' does not exist"),
            Error::NoSuchAnchor { anchor } => write!(f, "Anchor '{anchor}' does not exist"),
            Error::InvalidUri(err) => write!(f, "Invalid URI: {err}"),
            Error::UnknownSpecification { specification } => write!(f, "Unknown specification: {specification}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidUri(err) => Some(err),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::InvalidUri(error)
    }
}
