use routekit_web::codec::{Entity, JsonCodec};
use serde::{Deserialize, Serialize};

/// The demo entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stuff {
    pub id: i64,
    pub data: String,
}

impl Stuff {
    pub fn new(id: i64, data: impl Into<String>) -> Self {
        Self { id, data: data.into() }
    }
}

impl Entity for Stuff {
    type Codec = JsonCodec;
}

#[cfg(test)]
mod tests {
    use super::*;
    use routekit_web::codec::Codec;

    #[test]
    fn round_trip_through_codec() {
        let codec = Stuff::codec();
        let stuff = Stuff::new(42, "stuff");

        let bytes = codec.encode(&stuff).unwrap();
        assert_eq!(&bytes[..], br#"{"id":42,"data":"stuff"}"#);
        let decoded: Stuff = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, stuff);
    }

    #[test]
    fn round_trip_keeps_edge_values() {
        let codec = Stuff::codec();

        for stuff in [Stuff::new(i64::MIN, ""), Stuff::new(i64::MAX, "quote \" and \u{1F600}")] {
            let bytes = codec.encode(&stuff).unwrap();
            let decoded: Stuff = codec.decode(&bytes).unwrap();
            assert_eq!(decoded, stuff);
        }
    }

    #[test]
    fn missing_field_is_a_decode_error() {
        let result: Result<Stuff, _> = Stuff::codec().decode(br#"{"id":1}"#);
        assert!(result.unwrap_err().to_string().contains("missing field `data`"));
    }
}
