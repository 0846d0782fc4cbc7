//! Request DTOs for the data API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Page used when `page` is missing, zero or not a number
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when `limit` is missing, zero or not a number
pub const DEFAULT_LIMIT: usize = 10;

/// Query string for GET /api/patients
///
/// Both fields are taken as raw strings so that malformed values fall back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

impl PageQuery {
    /// Resolved 1-based page number
    pub fn page(&self) -> usize {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    /// Resolved page size
    pub fn limit(&self) -> usize {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_deserialize() {
        let query: PageQuery = serde_json::from_str(r#"{"page": "3", "limit": "25"}"#).unwrap();
        assert_eq!(query.page(), 3);
        assert_eq!(query.limit(), 25);
    }

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page(), DEFAULT_PAGE);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_page_query_invalid_values_fall_back() {
        let query = PageQuery {
            page: Some("0".to_string()),
            limit: Some("abc".to_string()),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 10);
    }
}
