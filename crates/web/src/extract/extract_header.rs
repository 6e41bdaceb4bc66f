use http::{HeaderMap, Method, Uri};

use crate::RequestContext;
use crate::bindings::{Bindings, Bound};
use crate::error::RouteError;
use crate::extract::from_request::FromRequest;

impl FromRequest for Method {
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(req.method().clone())
    }
}

impl FromRequest for Uri {
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(req.uri().clone())
    }
}

impl FromRequest for HeaderMap {
    fn from_request(req: &RequestContext, _bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(req.headers().clone())
    }
}

/// The path, query and header values bound while the rule matched.
impl FromRequest for Bound {
    fn from_request(_req: &RequestContext, bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(bindings.bound().clone())
    }
}
