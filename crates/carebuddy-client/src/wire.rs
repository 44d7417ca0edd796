use serde::Deserialize;

// ─── Response bodies ──────────────────────────────────────────────────────

/// `POST /buddies/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBuddyResponse {
    pub buddy_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `POST /buddy/{id}/documents`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadDocumentsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedDocument {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub name: String,
}

// ─── Error bodies ─────────────────────────────────────────────────────────

/// FastAPI error envelope: `{"detail": "..."}`, or a list of validation
/// issues each carrying a `msg`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Best-effort extraction of a human message from an error response body.
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message().filter(|m| !m.trim().is_empty());
    }
    let text = body.trim();
    if text.is_empty() || text.starts_with('<') {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail() {
        assert_eq!(
            error_message(r#"{"detail": "storage quota exceeded"}"#).as_deref(),
            Some("storage quota exceeded")
        );
    }

    #[test]
    fn validation_detail_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "name"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "files"], "msg": "field required", "type": "value_error.missing"}
        ]}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        assert_eq!(
            error_message("Internal Server Error\n").as_deref(),
            Some("Internal Server Error")
        );
    }

    #[test]
    fn html_and_empty_bodies_give_nothing() {
        assert_eq!(error_message("<html><body>502</body></html>"), None);
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"detail": null}"#), None);
    }
}
