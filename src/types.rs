use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A domain as reported by the API.
///
/// Fields are passed through as received; unknown fields are ignored.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: u64,
    pub name: String,
    pub created_at: String,
    pub user_id: u64,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub registrant_id: Option<u64>,
    /// e.g. "registered", "hosted"
    #[serde(default)]
    pub registration_status: Option<String>,
    /// e.g. "active", "inactive"
    #[serde(default)]
    pub name_server_status: Option<String>,
    /// Last external order placed for this domain
    #[serde(default)]
    pub last_order_id: Option<u64>,
    #[serde(default)]
    pub auto_renew: Option<bool>,
}

/// Single-key wrapper the API puts around every domain object.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DomainWrapper {
    pub domain: Domain,
}

/// Body of `POST /domains`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateDomainRequest {
    pub domain: DomainPayload,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DomainPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant_id: Option<u64>,
}

/// Body of `POST /domain_transfers`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferDomainRequest {
    pub domain: DomainPayload,
    pub transfer_order: TransferOrder,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferOrder {
    pub authinfo: String,
}

/// Shallow sanity check on a domain name before it is put in a request path.
///
/// This is not DNS-grade validation: the name must be made of non-empty
/// labels separated by `.` and carry nothing the URL parser would rewrite,
/// so the request path ends up containing the name verbatim.
pub fn validate_domain_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument("domain name must not be empty".into()));
    }
    if !name.contains('.') {
        return Err(Error::InvalidArgument(format!(
            "'{}' is not a domain name (expected something like 'example.com')",
            name
        )));
    }
    // `\` is read as `/` and `%` starts an escape (`%2e%2e`) in http(s) URLs
    if let Some(c) = name.chars().find(|c| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    }) {
        return Err(Error::InvalidArgument(format!(
            "domain name '{}' contains invalid character {:?}",
            name, c
        )));
    }
    // Empty labels cover ".", ".." and leading/trailing dots (dot segments)
    if name.split('.').any(str::is_empty) {
        return Err(Error::InvalidArgument(format!(
            "domain name '{}' contains an empty label",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOMAIN: &str = r#"{
        "domain": {
            "id": 1,
            "name": "example.com",
            "created_at": "2012-01-01T10:00:00Z",
            "updated_at": "2012-01-02T10:00:00Z",
            "expires_at": "2013-01-01",
            "registrant_id": 42,
            "registration_status": "registered",
            "name_server_status": "active",
            "user_id": 7,
            "last_order_id": null,
            "auto_renew": false,
            "lockable": true,
            "record_count": 5
        }
    }"#;

    #[test]
    fn test_decode_full_domain_ignores_unknown_fields() {
        let wrapper: DomainWrapper = serde_json::from_str(FULL_DOMAIN).unwrap();
        let domain = wrapper.domain;
        assert_eq!(domain.id, 1);
        assert_eq!(domain.name, "example.com");
        assert_eq!(domain.created_at, "2012-01-01T10:00:00Z");
        assert_eq!(domain.expires_at.as_deref(), Some("2013-01-01"));
        assert_eq!(domain.registrant_id, Some(42));
        assert_eq!(domain.registration_status.as_deref(), Some("registered"));
        assert_eq!(domain.name_server_status.as_deref(), Some("active"));
        assert_eq!(domain.user_id, 7);
        assert_eq!(domain.last_order_id, None);
        assert_eq!(domain.auto_renew, Some(false));
    }

    #[test]
    fn test_decode_minimal_domain() {
        let wrapper: DomainWrapper = serde_json::from_str(
            r#"{"domain": {"id": 2, "name": "example.org", "created_at": "2020-05-05", "user_id": 3}}"#,
        )
        .unwrap();
        assert_eq!(wrapper.domain.name, "example.org");
        assert_eq!(wrapper.domain.registrant_id, None);
        assert_eq!(wrapper.domain.expires_at, None);
    }

    #[test]
    fn test_decode_missing_required_field_fails() {
        let result: std::result::Result<DomainWrapper, _> =
            serde_json::from_str(r#"{"domain": {"id": 2, "created_at": "x", "user_id": 3}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_body() {
        let body = CreateDomainRequest {
            domain: DomainPayload {
                name: "example.com".into(),
                registrant_id: Some(42),
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"domain": {"name": "example.com", "registrant_id": 42}})
        );
    }

    #[test]
    fn test_create_request_body_without_registrant() {
        let body = CreateDomainRequest {
            domain: DomainPayload {
                name: "example.com".into(),
                registrant_id: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"domain": {"name": "example.com"}})
        );
    }

    #[test]
    fn test_transfer_request_body() {
        let body = TransferDomainRequest {
            domain: DomainPayload {
                name: "example.com".into(),
                registrant_id: Some(9),
            },
            transfer_order: TransferOrder {
                authinfo: "s3cr3t".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "domain": {"name": "example.com", "registrant_id": 9},
                "transfer_order": {"authinfo": "s3cr3t"}
            })
        );
    }

    #[test]
    fn test_validate_domain_name() {
        assert!(validate_domain_name("example.com").is_ok());
        assert!(validate_domain_name("sub.Example.CO.uk").is_ok());
        assert!(validate_domain_name("xn--bcher-kva.example").is_ok());
    }

    #[test]
    fn test_validate_domain_name_rejects() {
        for name in [
            "",
            "localhost",
            "example.com/records",
            "a.com?x=1",
            "a.com#",
            "a b.com",
            ".",
            "..",
            ".example.com",
            "example.com.",
            "a..com",
            "evil\\x.com",
            "%2e%2e",
            "a%2Fb.com",
            "tab\tname.com",
        ] {
            assert!(
                matches!(validate_domain_name(name), Err(Error::InvalidArgument(_))),
                "{:?} should be rejected",
                name
            );
        }
    }
}
