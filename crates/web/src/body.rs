use std::fmt;

use bytes::Bytes;
use mime::Mime;

use crate::codec::{Codec, CodecError, Entity};

/// The body of a response before it is handed to the transport.
///
/// A body is either bytes that are ready to send or an entity that still has to
/// go through its codec. Entities are encoded by [`ResponseBody::finalize`],
/// which the router calls once the handler is done.
pub struct ResponseBody {
    inner: Kind,
}

enum Kind {
    Once(Option<Bytes>),
    Entity(Box<dyn EncodeEntity>),
}

/// An entity waiting to be encoded, with the codec it registered.
pub trait EncodeEntity: Send {
    fn encode(&self) -> Result<Bytes, CodecError>;

    fn content_type(&self) -> Mime;
}

struct EntityBody<T, C> {
    value: T,
    codec: C,
}

impl<T, C> EncodeEntity for EntityBody<T, C>
where
    T: Send,
    C: Codec<T>,
{
    fn encode(&self) -> Result<Bytes, CodecError> {
        self.codec.encode(&self.value)
    }

    fn content_type(&self) -> Mime {
        self.codec.content_type()
    }
}

/// A finalized body: the bytes to send and, for entities, the codec's content type.
#[derive(Debug)]
pub struct FinalizedBody {
    pub bytes: Bytes,
    pub content_type: Option<Mime>,
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self { inner: Kind::Once(None) }
    }

    pub fn once(bytes: Bytes) -> Self {
        Self { inner: Kind::Once(Some(bytes)) }
    }

    /// An entity encoded with its registered codec.
    pub fn entity<T: Entity>(value: T) -> Self {
        Self::encoded(value, T::codec())
    }

    /// A value encoded with an explicit codec.
    pub fn encoded<T, C>(value: T, codec: C) -> Self
    where
        T: Send + 'static,
        C: Codec<T> + 'static,
    {
        Self { inner: Kind::Entity(Box::new(EntityBody { value, codec })) }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.inner, Kind::Entity(_))
    }

    /// Encodes an entity body; byte bodies pass through unchanged.
    pub fn finalize(self) -> Result<FinalizedBody, CodecError> {
        match self.inner {
            Kind::Once(bytes) => Ok(FinalizedBody { bytes: bytes.unwrap_or_default(), content_type: None }),
            Kind::Entity(entity) => {
                let bytes = entity.encode()?;
                Ok(FinalizedBody { bytes, content_type: Some(entity.content_type()) })
            }
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Kind::Once(bytes) => f.debug_tuple("Once").field(bytes).finish(),
            Kind::Entity(entity) => f.debug_tuple("Entity").field(&entity.content_type()).finish(),
        }
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        if value.is_empty() { Self::empty() } else { Self::once(Bytes::from(value)) }
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        if value.is_empty() { Self::empty() } else { Self::once(Bytes::from_static(value.as_bytes())) }
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::once(bytes)
    }
}

impl From<Option<Bytes>> for ResponseBody {
    fn from(option: Option<Bytes>) -> Self {
        match option {
            Some(bytes) => Self::once(bytes),
            None => Self::empty(),
        }
    }
}

impl From<()> for ResponseBody {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}
