use http::Response;

/// The header portion of a response, before the body is attached.
pub type ResponseHead = Response<()>;
