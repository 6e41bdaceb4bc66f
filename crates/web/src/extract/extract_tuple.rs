use crate::RequestContext;
use crate::bindings::Bindings;
use crate::error::RouteError;
use crate::extract::from_request::FromRequest;

/// Extracts every element in order and stops at the first error.
macro_rules! impl_from_request_for_tuple {
    ($($param:ident)*) => {
        impl<$($param,)*> FromRequest for ($($param,)*)
        where
            $($param: FromRequest,)*
        {
            #[allow(unused_variables)]
            fn from_request(req: &RequestContext, bindings: &mut Bindings) -> Result<Self, RouteError> {
                Ok(($($param::from_request(req, bindings)?,)*))
            }
        }
    }
}

impl_from_request_for_tuple! {}
impl_from_request_for_tuple! { A }
impl_from_request_for_tuple! { A B }
impl_from_request_for_tuple! { A B C }
impl_from_request_for_tuple! { A B C D }
impl_from_request_for_tuple! { A B C D E }
impl_from_request_for_tuple! { A B C D E F }
impl_from_request_for_tuple! { A B C D E F G }
impl_from_request_for_tuple! { A B C D E F G H }
impl_from_request_for_tuple! { A B C D E F G H I }
impl_from_request_for_tuple! { A B C D E F G H I J }
impl_from_request_for_tuple! { A B C D E F G H I J K }
impl_from_request_for_tuple! { A B C D E F G H I J K L }
