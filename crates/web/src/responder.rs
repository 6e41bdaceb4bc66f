//! Turning handler return values into responses.
//!
//! Anything a handler returns must implement [`Responder`]. Plain text types
//! get a `text/plain` content type; [`Json`] leaves its body as an entity so the
//! router encodes it during finalization.

use std::convert::Infallible;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::RequestContext;
use crate::body::ResponseBody;
use crate::codec::JsonCodec;
use crate::error::{HandlerError, RouteError};
use crate::extract::Json;
use crate::router::Rejection;

pub trait Responder {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody>;
}

fn plain_text(body: ResponseBody) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

fn with_status(status: StatusCode, message: String) -> Response<ResponseBody> {
    let mut response = plain_text(ResponseBody::from(message));
    *response.status_mut() = status;
    response
}

impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(req),
            Err(e) => e.response_to(req),
        }
    }
}

/// `None` is an empty 200.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(req),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(req);
        *response.status_mut() = status;
        response
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        (*self).response_to(req)
    }
}

impl Responder for () {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        plain_text(ResponseBody::from(self))
    }
}

impl Responder for String {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        plain_text(ResponseBody::from(self))
    }
}

impl<T> Responder for Json<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        Response::new(ResponseBody::encoded(self.0, JsonCodec))
    }
}

impl Responder for Rejection {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        with_status(self.status_code(), self.to_string())
    }
}

impl Responder for RouteError {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        with_status(self.status_code(), self.to_string())
    }
}

impl Responder for HandlerError {
    fn response_to(self, req: &RequestContext) -> Response<ResponseBody> {
        error!(cause = %self, method = %req.method(), path = req.path(), "handler failed");
        with_status(StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
    }
}

impl Responder for Infallible {
    fn response_to(self, _req: &RequestContext) -> Response<ResponseBody> {
        match self {}
    }
}
