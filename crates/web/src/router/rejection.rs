use http::StatusCode;
use thiserror::Error;

/// Why a route rule did not match.
///
/// `NoMatch` is what method, path and header-equals filters report; it is never
/// shown to the client unless no rule recorded anything better. The other
/// variants name the required input that was missing or unreadable, and the
/// first one recorded (in registration order) becomes the 400 response when no
/// rule matches at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("no route matched the request")]
    NoMatch,

    #[error("missing required query parameter '{0}'")]
    MissingQueryParam(String),

    #[error("missing required header '{0}'")]
    MissingHeader(String),

    #[error("malformed header '{0}'")]
    MalformedHeader(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl Rejection {
    pub fn missing_query_param<S: ToString>(name: S) -> Self {
        Self::MissingQueryParam(name.to_string())
    }

    pub fn missing_header<S: ToString>(name: S) -> Self {
        Self::MissingHeader(name.to_string())
    }

    pub fn malformed_header<S: ToString>(name: S) -> Self {
        Self::MalformedHeader(name.to_string())
    }

    pub fn malformed_body<S: ToString>(reason: S) -> Self {
        Self::MalformedBody(reason.to_string())
    }

    /// A silent rejection is a plain non-match and is never recorded.
    #[inline]
    pub fn is_silent(&self) -> bool {
        matches!(self, Rejection::NoMatch)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::NoMatch => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
