#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Typed wire contract for the cloud certificate relay.
//!
//! The relay itself is an external collaborator: a stateless HTTP process
//! wrapping object-storage put/get/list. This crate pins down its JSON
//! bodies, routes, and object-key convention so adapters can talk to it
//! without stringly-typed payloads. Uploads are fire-and-forget side
//! effects; nothing here may ever gate simulation progress.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zen_garden_core::CertificateNumber;

/// Route that exchanges certificate metadata for a presigned upload URL.
pub const UPLOAD_URL_ROUTE: &str = "/api/get-upload-url";

/// Route that exchanges certificate metadata for a presigned download URL.
pub const DOWNLOAD_URL_ROUTE: &str = "/api/get-download-url";

/// Route prefix that lists a user's stored certificates.
pub const CERTIFICATES_ROUTE: &str = "/api/certificates";

/// Liveness probe checked before attempting an upload.
pub const HEALTH_ROUTE: &str = "/health";

/// Content type certificates are rendered and uploaded as.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Object key a certificate lives under in external storage.
#[must_use]
pub fn object_key(user_id: &str, number: &CertificateNumber) -> String {
    format!("certificates/{user_id}/{number}.svg")
}

/// Builds the body for [`UPLOAD_URL_ROUTE`] with the default content type.
#[must_use]
pub fn upload_request(user_id: &str, number: &CertificateNumber) -> UploadUrlRequest {
    UploadUrlRequest {
        certificate_number: number.to_string(),
        user_id: user_id.to_owned(),
        content_type: SVG_CONTENT_TYPE.to_owned(),
    }
}

/// Body of a presigned-upload-URL request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Number stamped onto the certificate being uploaded.
    pub certificate_number: String,
    /// Owner of the certificate.
    pub user_id: String,
    /// MIME type the subsequent PUT must match.
    pub content_type: String,
}

/// Body of a presigned-upload-URL response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Presigned URL the raw body is PUT to.
    pub upload_url: String,
    /// Public URL the object is readable at after upload.
    pub public_url: String,
    /// Object key the relay derived for the certificate.
    pub key: String,
}

/// Body of a presigned-download-URL request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlRequest {
    /// Number stamped onto the requested certificate.
    pub certificate_number: String,
    /// Owner of the certificate.
    pub user_id: String,
}

/// Body of a presigned-download-URL response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlResponse {
    /// Presigned URL the certificate can be fetched from.
    pub download_url: String,
}

/// One stored object in a certificate listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCertificate {
    /// Object key within the bucket.
    pub key: String,
    /// Public URL of the object.
    pub url: String,
    /// Last-modified stamp reported by the store.
    pub last_modified: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Body of a per-user certificate listing response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateListing {
    /// Every stored certificate belonging to the user.
    pub certificates: Vec<StoredCertificate>,
}

/// Body of the liveness probe response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Overall status keyword, `ok` when healthy.
    pub status: String,
    /// Name of the responding service.
    pub service: String,
}

/// Failure taxonomy for relay interactions.
///
/// The distinction matters to the player-facing notice: an unreachable
/// backend and a rejected upload read differently, and the local-save
/// fallback is offered either way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// The relay process could not be reached at all.
    #[error("certificate backend unreachable: {detail}")]
    Unreachable {
        /// Transport-level description of the failure.
        detail: String,
    },
    /// The relay or the object store refused the request.
    #[error("certificate upload rejected with status {status}")]
    Rejected {
        /// HTTP status code of the refusal.
        status: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_follow_the_storage_convention() {
        let number = CertificateNumber::new("ZEN-1700000000000-A1B2C3D".to_owned());
        assert_eq!(
            object_key("user-7", &number),
            "certificates/user-7/ZEN-1700000000000-A1B2C3D.svg"
        );
    }

    #[test]
    fn upload_request_serializes_with_camel_case_fields() {
        let number = CertificateNumber::new("ZEN-42-XYZXYZ0".to_owned());
        let request = upload_request("gardener", &number);
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "certificateNumber": "ZEN-42-XYZXYZ0",
                "userId": "gardener",
                "contentType": "image/svg+xml",
            })
        );
    }

    #[test]
    fn upload_response_parses_relay_output() {
        let body = r#"{
            "uploadUrl": "https://bucket.example/put?sig=abc",
            "publicUrl": "https://bucket.example/certificates/u/ZEN-1-AAAAAAA.svg",
            "key": "certificates/u/ZEN-1-AAAAAAA.svg"
        }"#;
        let response: UploadUrlResponse = serde_json::from_str(body).expect("parse");
        assert!(response.upload_url.contains("sig="));
        assert!(response.key.starts_with("certificates/"));
    }

    #[test]
    fn listing_parses_relay_output() {
        let body = r#"{
            "certificates": [
                {
                    "key": "certificates/u/ZEN-1-AAAAAAA.svg",
                    "url": "https://bucket.example/certificates/u/ZEN-1-AAAAAAA.svg",
                    "lastModified": "2025-06-01T12:00:00Z",
                    "size": 18231
                }
            ]
        }"#;
        let listing: CertificateListing = serde_json::from_str(body).expect("parse");
        assert_eq!(listing.certificates.len(), 1);
        assert_eq!(listing.certificates[0].size, 18231);
    }

    #[test]
    fn failure_taxonomy_distinguishes_unreachable_from_rejected() {
        let unreachable = RelayError::Unreachable {
            detail: "connection refused".to_owned(),
        };
        let rejected = RelayError::Rejected { status: 403 };
        assert_ne!(unreachable, rejected);
        assert!(unreachable.to_string().contains("unreachable"));
        assert!(rejected.to_string().contains("403"));
    }
}
