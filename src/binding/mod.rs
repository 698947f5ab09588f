//! 본문 코덱과 바인딩
//!
//! 각 포맷은 `Codec`을 구현하는 단위 구조체입니다. 바인딩은 디코딩 후 항상
//! `validator::Validate`로 검증합니다. 검증 규칙이 없는 타입은 속성 없이
//! `#[derive(Validate)]`만 붙이면 됩니다.

mod json;
mod toml;
mod xml;
mod yaml;

pub use self::json::Json;
pub use self::toml::Toml;
pub use self::xml::Xml;
pub use self::yaml::Yaml;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::middleware::{Result, ValidationFailure};

pub const PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// 직렬화 포맷
pub trait Codec {
    /// 바인더 이름 (`json`, `toml`, ...)
    const NAME: &'static str;
    const CONTENT_TYPE: &'static str;

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>>;

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T>;
}

/// 본문을 디코딩한 뒤 검증합니다.
pub fn bind_body<C, T>(body: &[u8]) -> Result<T>
where
    C: Codec,
    T: DeserializeOwned + Validate,
{
    let value: T = C::decode(body)?;
    value.validate().map_err(ValidationFailure::Struct)?;
    Ok(value)
}

/// 시퀀스 본문을 디코딩하고 항목별 검증 실패를 모아 반환합니다.
pub fn bind_body_many<C, T>(body: &[u8]) -> Result<Vec<T>>
where
    C: Codec,
    T: DeserializeOwned + Validate,
{
    let values: Vec<T> = C::decode(body)?;

    let failures: Vec<(usize, ValidationErrors)> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.validate().err().map(|err| (index, err)))
        .collect();

    if !failures.is_empty() {
        return Err(ValidationFailure::Slice(failures).into());
    }
    Ok(values)
}

fn utf8<'a>(codec: &'static str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| crate::middleware::Error::serialization(codec, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Error;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Item {
        #[validate(length(min = 1))]
        key: String,
    }

    #[test]
    fn test_bind_body_validates() {
        let item: Item = bind_body::<Json, _>(br#"{"key":"value"}"#).unwrap();
        assert_eq!(item.key, "value");

        let err = bind_body::<Json, Item>(br#"{"key":""}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationFailure::Struct(_))));
    }

    #[test]
    fn test_bind_body_decode_error() {
        let err = bind_body::<Json, Item>(b"").unwrap_err();
        assert!(matches!(err, Error::Serialization { codec: "json", .. }));
    }

    #[test]
    fn test_bind_many_aggregates_failures() {
        let items: Vec<Item> = bind_body_many::<Json, _>(b"[]").unwrap();
        assert!(items.is_empty());

        let err = bind_body_many::<Json, Item>(br#"[{"key":""},{"key":"value"},{"key":""}]"#)
            .unwrap_err();
        match err {
            Error::Validation(ValidationFailure::Slice(failures)) => {
                let indexes: Vec<usize> = failures.iter().map(|(i, _)| *i).collect();
                assert_eq!(indexes, vec![0, 2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
