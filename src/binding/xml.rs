use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{utf8, Codec};
use crate::middleware::{Error, Result};

/// XML 코덱. 루트 요소 이름은 구조체 이름을 따릅니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xml;

impl Codec for Xml {
    const NAME: &'static str = "xml";
    const CONTENT_TYPE: &'static str = "application/xml; charset=utf-8";

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        quick_xml::se::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| Error::serialization(Self::NAME, e))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        quick_xml::de::from_str(utf8(Self::NAME, bytes)?)
            .map_err(|e| Error::serialization(Self::NAME, e))
    }
}
