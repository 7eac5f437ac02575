use serde::{Deserialize, Serialize};

/// Inbound body of `POST /api/generate-pc-config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequest {
    pub budget: String,
    pub usage: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse<T = serde_json::Value> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_and_features_are_optional() {
        let request: ConfigRequest =
            serde_json::from_str(r#"{"budget":"$800","usage":"gaming"}"#).unwrap();
        assert_eq!(request.brand, "");
        assert!(request.features.is_empty());
    }

    #[test]
    fn budget_is_required() {
        let result = serde_json::from_str::<ConfigRequest>(r#"{"usage":"gaming"}"#);
        assert!(result.is_err());
    }
}
