use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{utf8, Codec};
use crate::middleware::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Codec for Toml {
    const NAME: &'static str = "toml";
    const CONTENT_TYPE: &'static str = "application/toml; charset=utf-8";

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        ::toml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| Error::serialization(Self::NAME, e))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        ::toml::from_str(utf8(Self::NAME, bytes)?).map_err(|e| Error::serialization(Self::NAME, e))
    }
}
