use serde::{Deserialize, Serialize};

/// JSON envelope returned by every scoreboard endpoint.
///
/// `error` repeats `message` on failures so clients can branch on its presence.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: Some(message.clone()),
            message,
            data: None,
        }
    }
}

impl<I> ApiResponse<Vec<I>> {
    /// A list payload whose message counts the items, e.g. "3 matches".
    pub fn listed(noun: &str, items: Vec<I>) -> Self {
        Self::success(format!("{} {}", items.len(), noun), items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_counts_items() {
        let response = ApiResponse::listed("matches", vec![1, 2, 3]);
        assert!(response.success);
        assert_eq!(response.message, "3 matches");
        assert_eq!(response.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_error_mirrors_message() {
        let response = ApiResponse::<()>::error("Match not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Match not found");
        assert!(json.get("data").is_none());
    }
}
