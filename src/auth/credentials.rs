//! Bearer credentials and the provider interface the transfer core consumes.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::transfer::Direction;

/// Opaque bearer credential for one platform.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
}

impl Credential {
    /// Wrap a bearer access token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// The raw access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Token response of an OAuth2 token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// OAuth2 token held in a session.
#[derive(Clone)]
pub struct OAuthToken {
    /// Access token.
    pub access_token: String,
    /// Refresh token, when the grant issued one.
    pub refresh_token: Option<String>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl OAuthToken {
    /// Create a token that expires `expires_in` seconds from now.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    /// Check whether the access token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// The access token as a credential, if it is still valid.
    pub fn credential(&self) -> Option<Credential> {
        (!self.is_expired()).then(|| Credential::bearer(&self.access_token))
    }
}

impl From<TokenResponse> for OAuthToken {
    fn from(response: TokenResponse) -> Self {
        Self::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
        )
    }
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Supplies per-platform credentials for one user session.
///
/// Implementations are request-scoped snapshots; the transfer core reads
/// credentials through this trait and never caches or refreshes them.
pub trait CredentialProvider: Send + Sync {
    /// Full-scope credentials for the data-management platform.
    fn data_management_credentials(&self) -> Option<Credential>;

    /// Limited-scope data-management credentials that may be handed to the browser.
    fn public_credentials(&self) -> Option<Credential>;

    /// Credentials for the Box platform.
    fn box_credentials(&self) -> Option<Credential>;

    /// Whether the session holds valid data-management credentials.
    fn is_authorized(&self) -> bool {
        self.data_management_credentials().is_some()
    }

    /// Whether the session holds valid Box credentials.
    fn is_box_authorized(&self) -> bool {
        self.box_credentials().is_some()
    }

    /// Credentials for reading the source side of a transfer.
    fn source_credentials(&self, direction: Direction) -> Option<Credential> {
        match direction {
            Direction::ToBox => self.data_management_credentials(),
            Direction::ToDataManagement => self.box_credentials(),
        }
    }

    /// Credentials for writing the destination side of a transfer.
    fn destination_credentials(&self, direction: Direction) -> Option<Credential> {
        match direction {
            Direction::ToBox => self.box_credentials(),
            Direction::ToDataManagement => self.data_management_credentials(),
        }
    }
}

/// Source and destination credentials resolved for one transfer.
#[derive(Debug, Clone)]
pub struct TransferCredentials {
    /// Credential used against the source platform.
    pub source: Credential,
    /// Credential used against the destination platform.
    pub destination: Credential,
}

impl TransferCredentials {
    /// Resolve both sides for `direction`, or `None` if either is missing.
    pub fn resolve(provider: &dyn CredentialProvider, direction: Direction) -> Option<Self> {
        Some(Self {
            source: provider.source_credentials(direction)?,
            destination: provider.destination_credentials(direction)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        dm: Option<Credential>,
        boxed: Option<Credential>,
    }

    impl CredentialProvider for Fixed {
        fn data_management_credentials(&self) -> Option<Credential> {
            self.dm.clone()
        }
        fn public_credentials(&self) -> Option<Credential> {
            None
        }
        fn box_credentials(&self) -> Option<Credential> {
            self.boxed.clone()
        }
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::bearer("secret-token");
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.access_token(), "secret-token");
    }

    #[test]
    fn test_expired_token_has_no_credential() {
        let token = OAuthToken::new("abc", None, -10);
        assert!(token.is_expired());
        assert!(token.credential().is_none());

        let token = OAuthToken::new("abc", None, 3600);
        assert!(!token.is_expired());
        assert_eq!(token.credential(), Some(Credential::bearer("abc")));
    }

    #[test]
    fn test_direction_selects_credentials() {
        let provider = Fixed {
            dm: Some(Credential::bearer("dm")),
            boxed: Some(Credential::bearer("box")),
        };

        let to_box = TransferCredentials::resolve(&provider, Direction::ToBox).unwrap();
        assert_eq!(to_box.source.access_token(), "dm");
        assert_eq!(to_box.destination.access_token(), "box");

        let to_dm = TransferCredentials::resolve(&provider, Direction::ToDataManagement).unwrap();
        assert_eq!(to_dm.source.access_token(), "box");
        assert_eq!(to_dm.destination.access_token(), "dm");
    }

    #[test]
    fn test_missing_side_is_unresolved() {
        let provider = Fixed {
            dm: Some(Credential::bearer("dm")),
            boxed: None,
        };

        assert!(provider.is_authorized());
        assert!(!provider.is_box_authorized());
        assert!(TransferCredentials::resolve(&provider, Direction::ToBox).is_none());
    }
}
