//! Credential verification
//!
//! Two credential backends share one uniform check, tried in priority
//! order: the `auth_users` database table first, then the environment
//! configured admin login. A stored secret carrying a bcrypt prefix is
//! verified as a hash; anything else is compared byte-for-byte for
//! compatibility with legacy plaintext rows.

use sqlx::SqlitePool;
use tracing::warn;

use crate::db;

mod session;
pub use session::{Session, SessionStore};

/// Stored-secret prefixes that mark a bcrypt hash
const BCRYPT_PREFIXES: [&str; 2] = ["$2b$", "$2a$"];

/// Identity established by a successful credential check
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

/// Environment-configured admin credential (fallback backend)
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    pub username: String,
    /// Plaintext secret, used only when no hash is configured
    pub password: Option<String>,
    /// Pre-hashed secret; takes precedence over the plaintext one
    pub password_hash: Option<String>,
}

/// A credential backend capable of verifying a login attempt
#[derive(Clone)]
pub enum CredentialSource {
    Database(SqlitePool),
    Environment(EnvCredentials),
}

impl CredentialSource {
    /// Verify one username/password pair against this backend.
    ///
    /// Backend failures (an unreachable database, say) are logged and
    /// treated as "no match" so the chain can fall through.
    pub async fn verify(&self, username: &str, password: &str) -> Option<Identity> {
        match self {
            CredentialSource::Database(pool) => {
                let user = match db::find_auth_user(pool, username).await {
                    Ok(user) => user?,
                    Err(e) => {
                        warn!("Database credential check failed: {}", e);
                        return None;
                    }
                };

                verify_secret(&user.secret, password).then(|| Identity {
                    id: user.id,
                    username: user.login,
                })
            }
            CredentialSource::Environment(env) => {
                if username != env.username {
                    return None;
                }

                let matched = if let Some(hash) = &env.password_hash {
                    verify_secret(hash, password)
                } else if let Some(plain) = &env.password {
                    plain == password
                } else {
                    false
                };

                matched.then(|| Identity {
                    id: 0,
                    username: username.to_string(),
                })
            }
        }
    }
}

/// Run the credential chain in order, returning the first match
pub async fn authenticate(
    sources: &[CredentialSource],
    username: &str,
    password: &str,
) -> Option<Identity> {
    for source in sources {
        if let Some(identity) = source.verify(username, password).await {
            return Some(identity);
        }
    }
    None
}

/// Compare a supplied password against a stored secret.
///
/// Bcrypt-prefixed secrets go through hash verification; everything else
/// is a direct comparison (legacy plaintext rows).
pub fn verify_secret(stored: &str, password: &str) -> bool {
    if BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p)) {
        bcrypt::verify(password, stored).unwrap_or(false)
    } else {
        stored == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_secret_compares_directly() {
        assert!(verify_secret("hunter2", "hunter2"));
        assert!(!verify_secret("hunter2", "wrong"));
    }

    #[test]
    fn bcrypt_secret_verifies_as_hash() {
        let hash = bcrypt::hash("hunter2", bcrypt::DEFAULT_COST).unwrap();
        assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));
        assert!(verify_secret(&hash, "hunter2"));
        assert!(!verify_secret(&hash, "wrong"));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_secret("$2b$not-a-real-hash", "anything"));
    }

    #[tokio::test]
    async fn env_credentials_prefer_the_hash() {
        let hash = bcrypt::hash("real-secret", bcrypt::DEFAULT_COST).unwrap();
        let source = CredentialSource::Environment(EnvCredentials {
            username: "admin".to_string(),
            password: Some("ignored-plaintext".to_string()),
            password_hash: Some(hash),
        });

        assert!(source.verify("admin", "real-secret").await.is_some());
        // The plaintext fallback must not apply once a hash is configured
        assert!(source.verify("admin", "ignored-plaintext").await.is_none());
        assert!(source.verify("someone-else", "real-secret").await.is_none());
    }

    #[tokio::test]
    async fn env_credentials_plaintext_fallback() {
        let source = CredentialSource::Environment(EnvCredentials {
            username: "admin".to_string(),
            password: Some("admin".to_string()),
            password_hash: None,
        });

        let identity = source.verify("admin", "admin").await.unwrap();
        assert_eq!(identity.id, 0);
        assert_eq!(identity.username, "admin");
        assert!(source.verify("admin", "nope").await.is_none());
    }
}
