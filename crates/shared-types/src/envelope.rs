//! # Contract Envelope
//!
//! Uniform request and response shapes for governance and verification
//! callers.
//!
//! ## Wire Shape
//!
//! ```text
//! request:  {"operation": "...", "actor_id": "...", "signature_bytes": "<hex>", "payload": {...}}
//! response: {"success": true,  "data":  {...}}
//!           {"success": false, "error": {"category": "...", "message": "..."}}
//! ```

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::errors::{Categorized, ErrorCategory};

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRequest {
    pub operation: String,
    pub actor_id: String,
    #[serde_as(as = "Hex")]
    #[serde(default)]
    pub signature_bytes: Vec<u8>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ContractRequest {
    pub fn new(operation: impl Into<String>, actor_id: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            actor_id: actor_id.into(),
            signature_bytes: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature_bytes = signature;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub category: ErrorCategory,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ContractResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err<E: Categorized + std::fmt::Display>(error: &E) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                category: error.category(),
                message: error.to_string(),
            }),
        }
    }

    pub fn error_category(&self) -> Option<ErrorCategory> {
        self.error.as_ref().map(|e| e.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;

    #[test]
    fn test_request_signature_is_hex_on_the_wire() {
        let req = ContractRequest::new("Mint", "issuer").with_signature(vec![0xde, 0xad]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["signature_bytes"], "dead");

        let back: ContractRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.signature_bytes, vec![0xde, 0xad]);
    }

    #[test]
    fn test_request_missing_optional_fields() {
        let req: ContractRequest =
            serde_json::from_str(r#"{"operation":"GetBalance","actor_id":"alice"}"#).unwrap();
        assert!(req.signature_bytes.is_empty());
        assert!(req.payload.is_null());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = ContractResponse::err(&StoreError::Backend("x".into()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["category"], "storage");
        assert!(json.get("data").is_none());
    }
}
