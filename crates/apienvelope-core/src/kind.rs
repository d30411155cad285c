use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed response kinds that carry a configured default message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// 200 OK
    Success,
    /// 404 Not Found
    NotFound,
    /// 422 Unprocessable Entity
    Validation,
    /// 403 Forbidden
    Forbidden,
    /// 500 Internal Server Error
    Error,
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 5] = [
        ResponseKind::Success,
        ResponseKind::NotFound,
        ResponseKind::Validation,
        ResponseKind::Forbidden,
        ResponseKind::Error,
    ];

    /// Numeric HTTP status for this kind
    pub fn status(self) -> u16 {
        match self {
            ResponseKind::Success => 200,
            ResponseKind::NotFound => 404,
            ResponseKind::Validation => 422,
            ResponseKind::Forbidden => 403,
            ResponseKind::Error => 500,
        }
    }

    /// Name of the convenience operation for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseKind::Success => "ok",
            ResponseKind::NotFound => "not_found",
            ResponseKind::Validation => "validation",
            ResponseKind::Forbidden => "forbidden",
            ResponseKind::Error => "error",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" | "success" => Ok(ResponseKind::Success),
            "not_found" | "notfound" => Ok(ResponseKind::NotFound),
            "validation" => Ok(ResponseKind::Validation),
            "forbidden" => Ok(ResponseKind::Forbidden),
            "error" => Ok(ResponseKind::Error),
            other => Err(format!("unknown response kind: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ResponseKind::Success.status(), 200);
        assert_eq!(ResponseKind::NotFound.status(), 404);
        assert_eq!(ResponseKind::Validation.status(), 422);
        assert_eq!(ResponseKind::Forbidden.status(), 403);
        assert_eq!(ResponseKind::Error.status(), 500);
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in ResponseKind::ALL {
            assert_eq!(kind.as_str().parse::<ResponseKind>().unwrap(), kind);
        }
        assert_eq!("notfound".parse::<ResponseKind>().unwrap(), ResponseKind::NotFound);
        assert!("created".parse::<ResponseKind>().is_err());
    }
}
