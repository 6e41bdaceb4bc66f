use crate::RequestContext;
use crate::bindings::Bindings;
use crate::error::RouteError;

/// Builds a handler argument from the request and the values the matcher chain bound.
///
/// Extraction runs after the rule matched, so a failure here is a client error
/// for this request and never sends resolution on to the next rule.
pub trait FromRequest: Sized {
    fn from_request(req: &RequestContext, bindings: &mut Bindings) -> Result<Self, RouteError>;
}

/// A failed extraction becomes `None`.
impl<T> FromRequest for Option<T>
where
    T: FromRequest,
{
    fn from_request(req: &RequestContext, bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(T::from_request(req, bindings).ok())
    }
}

/// Hands the extraction error to the handler instead of answering with it.
impl<T> FromRequest for Result<T, RouteError>
where
    T: FromRequest,
{
    fn from_request(req: &RequestContext, bindings: &mut Bindings) -> Result<Self, RouteError> {
        Ok(T::from_request(req, bindings))
    }
}
