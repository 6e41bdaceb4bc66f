use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use http::Response;

use crate::RequestContext;
use crate::bindings::Bindings;
use crate::body::ResponseBody;
use crate::extract::FromRequest;
use crate::fn_trait::FnTrait;
use crate::responder::Responder;

/// The terminal of a route rule, invoked once after its matcher chain succeeded.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: &RequestContext, bindings: Bindings) -> Response<ResponseBody>;
}

/// a `FnTrait` holder which represents any async Fn
pub struct FnHandler<F, Args> {
    f: F,
    _phantom: PhantomData<fn(Args)>,
}

impl<F, Args> fmt::Debug for FnHandler<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("f", &std::any::type_name::<F>()).finish()
    }
}

impl<F, Args> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

/// Wraps an async fn whose arguments are all [`FromRequest`] and whose output is a [`Responder`].
pub fn handler_fn<F, Args>(f: F) -> FnHandler<F, Args>
where
    F: FnTrait<Args>,
{
    FnHandler::new(f)
}

#[async_trait]
impl<F, Args> RequestHandler for FnHandler<F, Args>
where
    F: FnTrait<Args>,
    F::Output: Responder,
    Args: FromRequest + Send,
{
    async fn invoke(&self, req: &RequestContext, mut bindings: Bindings) -> Response<ResponseBody> {
        let args = match Args::from_request(req, &mut bindings) {
            Ok(args) => args,
            Err(e) => return e.response_to(req),
        };
        self.f.call(args).await.response_to(req)
    }
}
