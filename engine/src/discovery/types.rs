use crate::common::errors::DiscoveryError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Metadata document served at `<arm root>/metadata/endpoints`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub authentication: AuthenticationMetadata,
    pub portal_endpoint: String,
    pub gallery_endpoint: String,
    pub graph_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationMetadata {
    pub login_endpoint: String,
    #[serde(default)]
    pub audiences: Vec<String>,
}

/// Parsed and normalized outcome of one discovery call.
///
/// Built fresh per call and handed to the resolver, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryResult {
    /// Login endpoint ending in exactly one `/`
    pub login_endpoint: String,
    /// Token audiences, never empty
    pub audiences: Vec<String>,
    pub portal_endpoint: String,
    pub gallery_endpoint: String,
    pub graph_endpoint: String,
    /// The root endpoint the caller asked about, echoed unchanged
    pub resource_manager_endpoint: String,
    /// Portal host without its first DNS label
    pub domain: String,
    /// `true` when the login endpoint is an ADFS authority
    pub on_premise: bool,
}

impl DiscoveryResult {
    /// Validates a fetched document and derives the normalized values.
    ///
    /// `url` is the metadata URL, used for error context only.
    pub fn from_document(
        resource_manager_endpoint: &str,
        document: MetadataDocument,
        url: &str,
    ) -> Result<Self, DiscoveryError> {
        let MetadataDocument {
            authentication,
            portal_endpoint,
            gallery_endpoint,
            graph_endpoint,
        } = document;

        if authentication.login_endpoint.trim().is_empty() {
            return Err(DiscoveryError::MissingField {
                field: "authentication.loginEndpoint".to_string(),
            });
        }
        if authentication.audiences.is_empty() {
            return Err(DiscoveryError::MissingField {
                field: "authentication.audiences".to_string(),
            });
        }
        if portal_endpoint.trim().is_empty() {
            return Err(DiscoveryError::MissingField {
                field: "portalEndpoint".to_string(),
            });
        }

        let domain =
            retrieve_domain(&portal_endpoint).ok_or_else(|| DiscoveryError::InvalidResponse {
                url: url.to_string(),
                reason: format!("cannot derive a domain from portal endpoint '{portal_endpoint}'"),
            })?;

        Ok(Self {
            login_endpoint: normalize_login_endpoint(&authentication.login_endpoint),
            on_premise: is_adfs_login(&authentication.login_endpoint),
            audiences: authentication.audiences,
            portal_endpoint,
            gallery_endpoint,
            graph_endpoint,
            resource_manager_endpoint: resource_manager_endpoint.to_string(),
            domain,
        })
    }

    /// First audience, the resource id tokens are requested for.
    pub fn primary_audience(&self) -> &str {
        self.audiences.first().map(String::as_str).unwrap_or_default()
    }
}

/// Trims every trailing `/` and appends exactly one.
pub fn normalize_login_endpoint(login_endpoint: &str) -> String {
    format!("{}/", login_endpoint.trim_end_matches('/'))
}

/// `true` when the last path segment of the login endpoint is `adfs`,
/// ignoring case and trailing slashes.
///
/// Only the path is inspected: `https://adfs/` is a host named `adfs` and is
/// not an ADFS authority. Unparseable endpoints are never ADFS.
pub fn is_adfs_login(login_endpoint: &str) -> bool {
    Url::parse(login_endpoint.trim()).is_ok_and(|url| {
        url.path()
            .trim_end_matches('/')
            .to_ascii_lowercase()
            .ends_with("/adfs")
    })
}

/// Strips the scheme, path and first DNS label of a portal endpoint.
///
/// `https://portal.azure.com/` gives `azure.com`. Returns `None` when the
/// host has a single label.
pub fn retrieve_domain(portal_endpoint: &str) -> Option<String> {
    let trimmed = portal_endpoint.trim();
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{trimmed}"))
    }
    .ok()?;

    let host = parsed.host_str()?;
    match host.split_once('.') {
        Some((_, domain)) if !domain.is_empty() => Some(domain.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(login: &str, audiences: &[&str], portal: &str) -> MetadataDocument {
        MetadataDocument {
            authentication: AuthenticationMetadata {
                login_endpoint: login.to_string(),
                audiences: audiences.iter().map(|a| a.to_string()).collect(),
            },
            portal_endpoint: portal.to_string(),
            gallery_endpoint: "https://gallery.mystack.local/".to_string(),
            graph_endpoint: "https://graph.mystack.local/".to_string(),
        }
    }

    #[test]
    fn test_normalize_login_endpoint() {
        assert_eq!(
            normalize_login_endpoint("https://login.microsoftonline.com"),
            "https://login.microsoftonline.com/"
        );
        assert_eq!(
            normalize_login_endpoint("https://login.mystack.local/adfs///"),
            "https://login.mystack.local/adfs/"
        );
        let once = normalize_login_endpoint("https://login/");
        assert_eq!(normalize_login_endpoint(&once), once);
    }

    #[test]
    fn test_is_adfs_login() {
        assert!(is_adfs_login("https://login.mystack.local/adfs"));
        assert!(is_adfs_login("https://login.mystack.local/ADFS/"));
        assert!(!is_adfs_login("https://login.microsoftonline.com/"));
        assert!(!is_adfs_login("https://adfs.mystack.local/"));
    }

    #[test]
    fn test_is_adfs_login_ignores_host_named_adfs() {
        assert!(!is_adfs_login("https://adfs"));
        assert!(!is_adfs_login("https://adfs/"));
        assert!(!is_adfs_login("https://login.mystack.local/adfs-legacy"));
        assert!(is_adfs_login("https://adfs/adfs"));
        assert!(!is_adfs_login("not a url/adfs"));
    }

    #[test]
    fn test_retrieve_domain() {
        assert_eq!(
            retrieve_domain("https://portal.azure.com/").as_deref(),
            Some("azure.com")
        );
        assert_eq!(
            retrieve_domain("https://portal.local.azurestack.external/").as_deref(),
            Some("local.azurestack.external")
        );
        assert_eq!(
            retrieve_domain("portal.mystack.local").as_deref(),
            Some("mystack.local")
        );
        assert_eq!(retrieve_domain("https://localhost/"), None);
        assert_eq!(retrieve_domain(""), None);
    }

    #[test]
    fn test_from_document_derives_values() {
        let result = DiscoveryResult::from_document(
            "https://management.mystack.local/",
            document(
                "https://login.mystack.local/adfs",
                &["urn:resource", "urn:other"],
                "https://portal.mystack.local/",
            ),
            "https://management.mystack.local/metadata/endpoints",
        )
        .unwrap();

        assert_eq!(result.login_endpoint, "https://login.mystack.local/adfs/");
        assert_eq!(result.primary_audience(), "urn:resource");
        assert_eq!(result.domain, "mystack.local");
        assert!(result.on_premise);
        assert_eq!(
            result.resource_manager_endpoint,
            "https://management.mystack.local/"
        );
    }

    #[test]
    fn test_from_document_rejects_empty_audiences() {
        let err = DiscoveryResult::from_document(
            "https://management.mystack.local/",
            document("https://login/", &[], "https://portal.mystack.local/"),
            "url",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DiscoveryError::MissingField { ref field } if field == "authentication.audiences"
        ));
    }

    #[test]
    fn test_from_document_rejects_single_label_portal() {
        let err = DiscoveryResult::from_document(
            "https://management.mystack.local/",
            document("https://login/", &["urn:resource"], "https://localhost/"),
            "url",
        )
        .unwrap_err();

        assert!(matches!(err, DiscoveryError::InvalidResponse { .. }));
    }
}
