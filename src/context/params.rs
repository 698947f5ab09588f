use std::str::FromStr;

use crate::middleware::{Error, Result};

/// `1 t T TRUE true True` / `0 f F FALSE false False`
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

pub(crate) fn convert<T: FromStr>(name: &str, value: &str, target: &'static str) -> Result<T> {
    value.parse().map_err(|_| Error::Conversion {
        name: name.to_string(),
        value: value.to_string(),
        target,
    })
}

pub(crate) fn convert_bool(name: &str, value: &str) -> Result<bool> {
    parse_bool(value).ok_or_else(|| Error::Conversion {
        name: name.to_string(),
        value: value.to_string(),
        target: "bool",
    })
}

/// 쿼리 문자열에서 첫 번째로 나타나는 키의 값을 찾습니다.
pub(crate) fn query_value(query: Option<&str>, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_grammar() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool("tRUE"), None);
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert::<i64>("n", "-42", "int").unwrap(), -42);
        assert_eq!(convert::<f64>("n", "2.5", "float").unwrap(), 2.5);
        assert!(convert::<i64>("n", "4.2", "int").unwrap_err().is_conversion());
        assert!(convert_bool("b", "maybe").unwrap_err().is_conversion());
    }

    #[test]
    fn test_query_value() {
        assert_eq!(query_value(Some("a=1&b=two&a=3"), "a").as_deref(), Some("1"));
        assert_eq!(query_value(Some("q=hello%20world"), "q").as_deref(), Some("hello world"));
        assert_eq!(query_value(Some("empty="), "empty").as_deref(), Some(""));
        assert_eq!(query_value(Some("a=1"), "b"), None);
        assert_eq!(query_value(None, "a"), None);
    }
}
