//! Protocol types shared by the codecs and the connection loop.
//!
//! - [`RequestHeader`]: a parsed request line plus headers, before the body is attached
//! - [`ResponseHead`]: a response without its body
//! - [`PayloadSize`]: how the request body is framed
//! - [`HttpError`], [`ParseError`], [`SendError`]: the error hierarchy

mod message;
pub use message::PayloadSize;

mod request;
pub use request::RequestHeader;

mod response;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
