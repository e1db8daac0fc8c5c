//! # Error Types Module
//!
//! Error types for the conversation flow and its external collaborators.
//! Catalog errors never reach the user directly: the controller folds every
//! `FlowError` into a localized reply. A `TranslationError` never becomes a
//! `FlowError` at all; the controller logs it and keeps the source text.

/// Failure talking to the recipe catalog
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// Request could not be sent or the connection failed
    Transport(String),
    /// Catalog answered with a non-success HTTP status
    Status(u16),
    /// Response body was not the expected JSON shape
    Decode(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Transport(msg) => write!(f, "Catalog transport error: {msg}"),
            CatalogError::Status(code) => write!(f, "Catalog returned HTTP status {code}"),
            CatalogError::Decode(msg) => write!(f, "Catalog decode error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status(status.as_u16())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

/// Failure translating a single string
#[derive(Debug, Clone)]
pub enum TranslationError {
    /// Request could not be sent or the connection failed
    Transport(String),
    /// Translation service answered with a non-success HTTP status
    Status(u16),
    /// Response did not contain any translated segment
    MalformedResponse(String),
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::Transport(msg) => write!(f, "Translation transport error: {msg}"),
            TranslationError::Status(code) => {
                write!(f, "Translation service returned HTTP status {code}")
            }
            TranslationError::MalformedResponse(msg) => {
                write!(f, "Malformed translation response: {msg}")
            }
        }
    }
}

impl std::error::Error for TranslationError {}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => TranslationError::Status(status.as_u16()),
            None => TranslationError::Transport(err.to_string()),
        }
    }
}

/// Why the count argument of the initiating command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentProblem {
    Missing,
    NotPositiveInteger,
}

/// Which catalog step failed, so the reply can say the right thing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStep {
    Categories,
    Filter { category: String },
    Lookup { id: String },
}

/// Errors raised while advancing a conversation flow
#[derive(Debug, Clone)]
pub enum FlowError {
    /// Malformed or missing count argument
    InvalidArgument(ArgumentProblem),
    /// Catalog call failed or produced nothing usable
    CatalogUnavailable {
        step: CatalogStep,
        cause: Option<CatalogError>,
    },
    /// Reply matched none of the offered recipes
    NoMatch(String),
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::InvalidArgument(ArgumentProblem::Missing) => {
                write!(f, "Invalid argument: recipe count is missing")
            }
            FlowError::InvalidArgument(ArgumentProblem::NotPositiveInteger) => {
                write!(f, "Invalid argument: recipe count is not a positive integer")
            }
            FlowError::CatalogUnavailable { step, cause: Some(cause) } => {
                write!(f, "Catalog unavailable at {step:?}: {cause}")
            }
            FlowError::CatalogUnavailable { step, cause: None } => {
                write!(f, "Catalog unavailable at {step:?}: empty result")
            }
            FlowError::NoMatch(text) => write!(f, "No candidate matches '{text}'"),
        }
    }
}

impl std::error::Error for FlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        assert_eq!(
            CatalogError::Status(503).to_string(),
            "Catalog returned HTTP status 503"
        );
        assert_eq!(
            CatalogError::Decode("expected value".to_string()).to_string(),
            "Catalog decode error: expected value"
        );
    }

    #[test]
    fn test_flow_error_display() {
        let empty = FlowError::CatalogUnavailable {
            step: CatalogStep::Filter {
                category: "Beef".to_string(),
            },
            cause: None,
        };
        assert_eq!(
            empty.to_string(),
            "Catalog unavailable at Filter { category: \"Beef\" }: empty result"
        );

        let missing = FlowError::InvalidArgument(ArgumentProblem::Missing);
        assert!(missing.to_string().contains("missing"));
    }
}
