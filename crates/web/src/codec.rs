//! Entity encoding and decoding.
//!
//! An entity type opts in by implementing [`Entity`] and naming its [`Codec`];
//! nothing is derived implicitly. The router uses the codec twice: `body_as`
//! decodes request bodies with it, and entity response bodies are encoded with
//! it when the response is finalized.
//!
//! # Example
//! ```
//! use routekit_web::codec::{Entity, JsonCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Item {
//!     id: i64,
//! }
//!
//! impl Entity for Item {
//!     type Codec = JsonCodec;
//! }
//! ```

use bytes::Bytes;
use mime::Mime;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Turns a `T` into bytes and back.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<Bytes, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError>;

    /// The content type of encoded values.
    fn content_type(&self) -> Mime;
}

/// A type with a registered codec.
pub trait Entity: Sized + Send + Sync + 'static {
    type Codec: Codec<Self> + Default;

    fn codec() -> Self::Codec {
        Self::Codec::default()
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("can't encode entity: {source}")]
    Encode { source: Box<dyn std::error::Error + Send + Sync> },

    #[error("{source}")]
    Decode { source: Box<dyn std::error::Error + Send + Sync> },
}

impl CodecError {
    pub fn encode<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Encode { source: source.into() }
    }

    pub fn decode<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Decode { source: source.into() }
    }
}

/// `application/json` through serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Bytes, CodecError> {
        serde_json::to_vec(value).map(Bytes::from).map_err(CodecError::encode)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::decode)
    }

    fn content_type(&self) -> Mime {
        mime::APPLICATION_JSON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Item {
        id: i64,
        name: String,
    }

    impl Entity for Item {
        type Codec = JsonCodec;
    }

    #[test]
    fn json_codec_round_trip() {
        let item = Item { id: 7, name: "seven".into() };
        let codec = Item::codec();

        let bytes = codec.encode(&item).unwrap();
        assert_eq!(bytes, Bytes::from_static(br#"{"id":7,"name":"seven"}"#));
        let decoded: Item = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, item);
        assert_eq!(Codec::<Item>::content_type(&codec), mime::APPLICATION_JSON);
    }

    #[test]
    fn decode_error_keeps_reason() {
        let result: Result<Item, _> = JsonCodec.decode(br#"{"id":"x"}"#);

        let e = result.unwrap_err();
        assert!(matches!(e, CodecError::Decode { .. }));
        assert!(e.to_string().contains("invalid type"));
    }
}
