//! Handler arguments.
//!
//! Every argument of a handler function implements [`FromRequest`]. Extraction
//! reads the immutable [`RequestContext`](crate::RequestContext) and the
//! bindings of the rule that matched.

mod extract_body;
mod extract_header;
mod extract_tuple;
mod extract_url;
mod from_request;

pub use from_request::FromRequest;

/// Represented as form data
///
/// when `post` as a `application/x-www-form-urlencoded`, we can using this struct to inject data,
/// note: the struct must impl [`serde::Deserialize`]
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use routekit_web::extract::Form;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     name: String,
///     zip: String,
/// }
///
/// pub async fn handle(Form(params) : Form<Params>) -> String {
///     format!("received params: {:?}", params)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form<T>(pub T);

/// A JSON entity, as a handler argument or as a return value.
///
/// As an argument it takes the value `body_as` decoded for the rule, or
/// decodes the body itself. As a return value it stays an entity until the
/// router finalizes the response and encodes it as `application/json`.
///
/// # Example
/// ```
/// # use serde::{Deserialize, Serialize};
/// # use routekit_web::extract::Json;
/// # #[allow(dead_code)]
/// #[derive(Serialize, Deserialize, Debug)]
/// struct Stuff {
///     id: i64,
///     data: String,
/// }
///
/// pub async fn handle(Json(stuff): Json<Stuff>) -> Json<Stuff> {
///     Json(Stuff { id: stuff.id + 1, ..stuff })
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

/// Represented as url query data
///
/// the whole query string is deserialized with serde_qs, so the struct must impl [`serde::Deserialize`]
///
/// # Example
/// ```
/// # use serde::Deserialize;
/// # use routekit_web::extract::Query;
/// # #[allow(dead_code)]
/// #[derive(Deserialize, Debug)]
/// struct Params {
///     req: String,
///     opt: Option<String>,
/// }
///
/// pub async fn handle(Query(params): Query<Params>) -> String {
///     format!("Req: {}, Opt: {:?}", params.req, params.opt)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<T>(pub T);
