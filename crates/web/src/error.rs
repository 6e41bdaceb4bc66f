use http::StatusCode;
use thiserror::Error;
use tokio::task::JoinError;

use crate::codec::CodecError;
use crate::router::Rejection;

/// A client error raised by an extractor or a handler; answered with a 4xx.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    #[error("not found")]
    NotFound,
}

impl RouteError {
    pub fn bad_request<S: ToString>(reason: S) -> Self {
        Self::BadRequest { reason: reason.to_string() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::Rejected(rejection) => rejection.status_code(),
            RouteError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RouteError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// A server-side failure inside a handler; answered with a 500.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("asynchronous computation failed: {source}")]
    Task {
        #[from]
        source: JoinError,
    },

    #[error("{source}")]
    Codec {
        #[from]
        source: CodecError,
    },

    #[error("handler panicked: {message}")]
    Panicked { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl HandlerError {
    pub fn other<S: ToString>(message: S) -> Self {
        Self::Other { message: message.to_string() }
    }

    pub(crate) fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_owned());
        Self::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_error_status() {
        assert_eq!(RouteError::from(Rejection::missing_query_param("req")).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RouteError::from(Rejection::NoMatch).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RouteError::bad_request("id overflow").to_string(), "bad request: id overflow");
        assert_eq!(
            RouteError::from(Rejection::missing_header("ct-remote-user")).to_string(),
            "missing required header 'ct-remote-user'"
        );
    }

    #[test]
    fn panic_payload_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(HandlerError::panicked(payload.as_ref()).to_string(), "handler panicked: boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(HandlerError::panicked(payload.as_ref()).to_string(), "handler panicked: owned boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u8);
        assert_eq!(HandlerError::panicked(payload.as_ref()).to_string(), "handler panicked: unknown panic payload");
    }

    async fn failing_task() {
        panic!("task failed")
    }

    #[tokio::test]
    async fn join_error_converts() {
        let join_error = tokio::spawn(failing_task()).await.unwrap_err();
        let e = HandlerError::from(join_error);
        assert!(matches!(e, HandlerError::Task { .. }));
    }
}
