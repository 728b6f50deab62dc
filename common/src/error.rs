//! Fetch errors and the classification the views branch on.

use serde::{Deserialize, Serialize};

/// Sub-code the API returns for projects the user may not see.
pub const PRIVATE_PROJECT_SUBCODE: &str = "PrivateProject";

/// A failed remote fetch.  Serialisable so it can cross the server-function
/// boundary intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FetchError {
    #[error("API returned {status}: {message}")]
    Api {
        status: u16,
        subcode: Option<String>,
        message: String,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("cannot decode response: {0}")]
    Decode(String),
}

/// Error body shape of the remote API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "SubCode", default)]
    sub_code: Option<String>,
}

impl FetchError {
    /// Build an error from a non-success response.  Bodies that are not the
    /// API's JSON error shape are kept as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => FetchError::Api {
                status,
                subcode: parsed.sub_code,
                message: parsed
                    .error
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            },
            Err(_) => {
                let body = body.trim();
                FetchError::Api {
                    status,
                    subcode: None,
                    message: if body.is_empty() {
                        format!("request failed with status {status}")
                    } else {
                        body.to_string()
                    },
                }
            }
        }
    }

    pub fn subcode(&self) -> Option<&str> {
        match self {
            FetchError::Api { subcode, .. } => subcode.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_private_project(&self) -> bool {
        self.subcode() == Some(PRIVATE_PROJECT_SUBCODE)
    }

    pub fn class(&self) -> ErrorClass {
        if self.is_private_project() {
            ErrorClass::PrivateForbidden
        } else if self.status() == Some(404) {
            ErrorClass::NotFound
        } else {
            ErrorClass::NetworkOrServer {
                subcode: self.subcode().map(String::from),
            }
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// What a view needs to know about a fetch that has not produced data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    Pending,
    NetworkOrServer { subcode: Option<String> },
    NotFound,
    PrivateForbidden,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_project_body() {
        let err = FetchError::from_response(
            403,
            r#"{"Error": "User not permitted", "SubCode": "PrivateProject"}"#,
        );
        assert!(err.is_private_project());
        assert_eq!(err.class(), ErrorClass::PrivateForbidden);
        assert_eq!(err.to_string(), "API returned 403: User not permitted");
    }

    #[test]
    fn test_not_found_body() {
        let err = FetchError::from_response(404, r#"{"Error": "Project Not Found", "SubCode": "NotFound"}"#);
        assert_eq!(err.subcode(), Some("NotFound"));
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_plain_text_body() {
        let err = FetchError::from_response(502, "Bad Gateway\n");
        assert_eq!(err.subcode(), None);
        assert_eq!(err.class(), ErrorClass::NetworkOrServer { subcode: None });
        assert_eq!(err.to_string(), "API returned 502: Bad Gateway");
    }

    #[test]
    fn test_network_error_has_no_subcode() {
        let err = FetchError::Network("connection refused".into());
        assert_eq!(err.status(), None);
        assert!(!err.is_private_project());
    }
}
