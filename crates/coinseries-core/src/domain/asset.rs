use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Non-empty coin identifier, e.g. `bitcoin`.
///
/// Surrounding whitespace is stripped; case is preserved because stored ids
/// are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn parse(input: &str) -> Result<Self, ServiceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::invalid_argument("asset id must be provided"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetId {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceErrorKind;

    #[test]
    fn strips_whitespace_and_keeps_case() {
        let parsed = AssetId::parse("  Bitcoin ").expect("asset id should parse");
        assert_eq!(parsed.as_str(), "Bitcoin");
    }

    #[test]
    fn rejects_blank_input() {
        for raw in ["", "   ", "\t\n"] {
            let err = AssetId::parse(raw).expect_err("must fail");
            assert_eq!(err.kind(), ServiceErrorKind::InvalidArgument);
        }
    }
}
