use serde::{Deserialize, Serialize};
use url::Url;

/// Client authentication methods the service accepts. Methods that rely
/// on a shared `client_secret` issued at registration time make no sense
/// here, since registration is anonymous and content-addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEndpointAuthMethod {
    None,
    PrivateKeyJwt,
    ClientSecretJwt,
}

/// An OAuth client ID metadata document, as submitted by a client.
///
/// Unknown fields are dropped on deserialization. `client_id` and
/// `client_uri` are deliberately not part of the shape: the service
/// derives both from where the document ends up being hosted, so a
/// submitter never gets to claim them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMetadata {
    pub client_name: String,
    pub redirect_uris: Vec<String>,
    pub token_endpoint_auth_method: TokenEndpointAuthMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tos_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_uri: Option<String>,
    /// Inline JWK set, kept as raw json.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint_auth_signing_alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpop_bound_access_tokens: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("client_name must not be empty")]
    EmptyClientName,
    #[error("redirect_uris must contain at least one entry")]
    EmptyRedirectUris,
    #[error("redirect uri '{0}' is not a url")]
    UnparseableRedirectUri(String),
    #[error("redirect uri '{0}' must use a loopback http host or a private-use scheme (rfc 8252)")]
    DisallowedRedirectUri(String),
}

impl ClientMetadata {
    /// Check the refinements this service imposes on top of the document
    /// shape. Deserialization already guarantees field types; this covers
    /// the value-level rules.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.client_name.is_empty() {
            return Err(MetadataError::EmptyClientName);
        }
        if self.redirect_uris.is_empty() {
            return Err(MetadataError::EmptyRedirectUris);
        }
        for uri in &self.redirect_uris {
            validate_redirect_uri(uri)?;
        }
        Ok(())
    }

    /// Apply the normalizations the service performs before storing a
    /// document. `application_type` is forced to `"native"` no matter
    /// what was submitted.
    pub fn normalized(mut self) -> Self {
        self.application_type = Some("native".to_string());
        self
    }
}

/// Redirect uris must not be claimable web origins: either a loopback
/// http uri or a private-use (reverse domain name) scheme, per RFC 8252.
fn validate_redirect_uri(uri: &str) -> Result<(), MetadataError> {
    let parsed =
        Url::parse(uri).map_err(|_| MetadataError::UnparseableRedirectUri(uri.to_string()))?;
    if parsed.scheme() == "http" {
        return match parsed.host_str() {
            Some("localhost") | Some("127.0.0.1") | Some("[::1]") => Ok(()),
            _ => Err(MetadataError::DisallowedRedirectUri(uri.to_string())),
        };
    }
    // private-use schemes are reverse domain names, recognizable by a
    // dot before the first colon
    if parsed.scheme().contains('.') {
        return Ok(());
    }
    Err(MetadataError::DisallowedRedirectUri(uri.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(redirect_uri: &str) -> ClientMetadata {
        serde_json::from_value(serde_json::json!({
            "client_name": "Example App",
            "redirect_uris": [redirect_uri],
            "token_endpoint_auth_method": "none",
        }))
        .unwrap()
    }

    #[test]
    fn test_unknown_and_reserved_fields_are_dropped() {
        let metadata: ClientMetadata = serde_json::from_value(serde_json::json!({
            "client_name": "Example App",
            "redirect_uris": ["http://127.0.0.1/callback"],
            "token_endpoint_auth_method": "none",
            "client_id": "https://evil.example/claimed",
            "client_uri": "https://evil.example",
            "unknown_extension": true,
        }))
        .unwrap();

        let round_tripped = serde_json::to_value(&metadata).unwrap();
        let keys: Vec<&String> = round_tripped.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["client_name", "redirect_uris", "token_endpoint_auth_method"]
        );
    }

    #[test]
    fn test_auth_method_is_a_closed_set() {
        let result: Result<ClientMetadata, _> = serde_json::from_value(serde_json::json!({
            "client_name": "Example App",
            "redirect_uris": ["http://127.0.0.1/callback"],
            "token_endpoint_auth_method": "client_secret_basic",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_loopback_redirect_uris_are_allowed() {
        assert!(sample("http://127.0.0.1/callback").validate().is_ok());
        assert!(sample("http://localhost:8080/callback").validate().is_ok());
        assert!(sample("http://[::1]/callback").validate().is_ok());
    }

    #[test]
    fn test_private_use_redirect_uris_are_allowed() {
        assert!(sample("com.example.app:/callback").validate().is_ok());
        assert!(sample("dev.cimd.demo:/oauth/return").validate().is_ok());
    }

    #[test]
    fn test_web_redirect_uris_are_rejected() {
        let err = sample("https://example.com/callback").validate().unwrap_err();
        assert!(matches!(err, MetadataError::DisallowedRedirectUri(_)));

        let err = sample("http://example.com/callback").validate().unwrap_err();
        assert!(matches!(err, MetadataError::DisallowedRedirectUri(_)));
    }

    #[test]
    fn test_undotted_custom_schemes_are_rejected() {
        let err = sample("myapp:/callback").validate().unwrap_err();
        assert!(matches!(err, MetadataError::DisallowedRedirectUri(_)));
    }

    #[test]
    fn test_garbage_redirect_uris_are_rejected() {
        let err = sample("not a uri at all").validate().unwrap_err();
        assert!(matches!(err, MetadataError::UnparseableRedirectUri(_)));
    }

    #[test]
    fn test_empty_client_name_is_rejected() {
        let mut metadata = sample("http://127.0.0.1/callback");
        metadata.client_name = String::new();
        assert!(matches!(
            metadata.validate(),
            Err(MetadataError::EmptyClientName)
        ));
    }

    #[test]
    fn test_empty_redirect_uris_are_rejected() {
        let mut metadata = sample("http://127.0.0.1/callback");
        metadata.redirect_uris.clear();
        assert!(matches!(
            metadata.validate(),
            Err(MetadataError::EmptyRedirectUris)
        ));
    }

    #[test]
    fn test_normalized_forces_native() {
        let mut metadata = sample("http://127.0.0.1/callback");
        metadata.application_type = Some("web".to_string());
        assert_eq!(
            metadata.normalized().application_type.as_deref(),
            Some("native")
        );

        let absent = sample("http://127.0.0.1/callback");
        assert_eq!(absent.normalized().application_type.as_deref(), Some("native"));
    }
}
