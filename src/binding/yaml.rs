use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::middleware::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Codec for Yaml {
    const NAME: &'static str = "yaml";
    const CONTENT_TYPE: &'static str = "application/x-yaml; charset=utf-8";

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| Error::serialization(Self::NAME, e))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_yaml::from_slice(bytes).map_err(|e| Error::serialization(Self::NAME, e))
    }
}
