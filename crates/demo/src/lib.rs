//! The walkthrough service: a handful of routes showing path composition,
//! JSON entities, query parameter and header extraction and asynchronous
//! completion on top of `routekit-web`.

pub mod config;
pub mod routes;
pub mod stuff;

pub use config::{ConfigError, ServerConfig};
pub use routes::demo_router;
pub use stuff::Stuff;
