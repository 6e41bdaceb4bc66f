//! The walkthrough routes, in the order they are resolved.

use std::time::Duration;

use routekit_web::bindings::Bound;
use routekit_web::extract::Json;
use routekit_web::router::filter::{body_as, optional_query_param, path_end, query_param, required_header};
use routekit_web::router::{Router, get, post};
use routekit_web::{HandlerError, RouteError, handler_fn};

use crate::stuff::Stuff;

pub const REMOTE_USER_HEADER: &str = "ct-remote-user";

pub async fn get_stuff() -> Json<Stuff> {
    Json(Stuff::new(42, "stuff"))
}

pub async fn post_stuff(Json(stuff): Json<Stuff>) -> Result<Json<Stuff>, RouteError> {
    let id = stuff.id.checked_add(100).ok_or_else(|| RouteError::bad_request(format!("id {} is too large", stuff.id)))?;
    Ok(Json(Stuff { id, data: format!("{} posted", stuff.data) }))
}

pub async fn params(bound: Bound) -> Result<String, RouteError> {
    let req = bound.require_query("req")?;
    Ok(match bound.optional_query("opt").as_option() {
        Some(opt) => format!("Req: {req}, Opt: Some({opt})"),
        None => format!("Req: {req}, Opt: None"),
    })
}

pub async fn mine() -> &'static str {
    "MINE!"
}

pub async fn yours() -> &'static str {
    "YOURS!"
}

pub async fn headers(bound: Bound) -> Result<String, RouteError> {
    Ok(bound.require_header(REMOTE_USER_HEADER)?.to_owned())
}

/// Completes on another task; a failed task is answered with a 500.
pub async fn later() -> Result<&'static str, HandlerError> {
    let value = tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        "completed later"
    })
    .await?;
    Ok(value)
}

pub async fn hello() -> &'static str {
    "Hello world"
}

/// Builds the demo rule list.
///
/// Without the trailing catch-all a request that misses a required query
/// parameter or header gets a 400 naming it; with it, the catch-all answers.
pub fn demo_router(with_fallback: bool) -> Router {
    let builder = Router::builder()
        .route("/stuff", get(handler_fn(get_stuff)).with(path_end()).produces(mime::APPLICATION_JSON))
        .route(
            "/stuff",
            post(handler_fn(post_stuff)).with(path_end()).with(body_as::<Stuff>()).produces(mime::APPLICATION_JSON),
        )
        .route(
            "/params",
            get(handler_fn(params)).with(path_end()).with(query_param("req")).with(optional_query_param("opt")),
        )
        .nest("/junk", |scope| {
            scope
                .route("/mine", get(handler_fn(mine)).with(path_end()))
                .route("/yours", get(handler_fn(yours)).with(path_end()))
        })
        .route("/headers", get(handler_fn(headers)).with(path_end()).with(required_header(REMOTE_USER_HEADER)))
        .route("/later", get(handler_fn(later)).with(path_end()));

    if with_fallback { builder.fallback(get(handler_fn(hello))).build() } else { builder.build() }
}
