use std::error::Error as StdError;
use std::fmt;
use validator::ValidationErrors;

/// 핸들러 체인에서 발생하는 에러
///
/// `NotFound`/`Conversion`/`TypeMismatch`는 호출자가 직접 확인하는 복구 가능한
/// 에러이고, 나머지는 핸들러가 그대로 반환하면 체인이 종료됩니다.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} `{name}`을(를) 찾을 수 없습니다")]
    NotFound { kind: Lookup, name: String },

    #[error("{name} 값 `{value}`을(를) {target}(으)로 변환할 수 없습니다")]
    Conversion {
        name: String,
        value: String,
        target: &'static str,
    },

    #[error("컨텍스트 값 `{key}`의 타입이 요청한 타입과 다릅니다")]
    TypeMismatch { key: String },

    #[error("{codec} 직렬화 오류: {message}")]
    Serialization {
        codec: &'static str,
        message: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("헤더 오류: {0}")]
    Header(String),

    #[error(transparent)]
    Handler(Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// 사용자 핸들러의 도메인 에러를 감쌉니다.
    pub fn handler<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Handler(err.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::Handler(message.into().into())
    }

    pub(crate) fn not_found(kind: Lookup, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn serialization(codec: &'static str, err: impl fmt::Display) -> Self {
        Self::Serialization {
            codec,
            message: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }
}

/// 조회 대상 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Param,
    Query,
    Value,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Param => write!(f, "경로 파라미터"),
            Lookup::Query => write!(f, "쿼리 파라미터"),
            Lookup::Value => write!(f, "컨텍스트 값"),
        }
    }
}

/// 디코딩 이후 구조체 검증 실패
#[derive(Debug, thiserror::Error)]
pub enum ValidationFailure {
    #[error("검증 실패: {0}")]
    Struct(#[from] ValidationErrors),

    /// 시퀀스 바인딩 시 항목별 실패 목록 (인덱스, 에러)
    #[error("{}개 항목 검증 실패", .0.len())]
    Slice(Vec<(usize, ValidationErrors)>),
}

pub type Result<T> = std::result::Result<T, Error>;
