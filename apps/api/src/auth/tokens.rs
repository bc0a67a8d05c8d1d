use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::models::user::User;

const ACCESS_TTL_SECS: i64 = 15 * 60;
const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims embedded in both token kinds: user id + email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Outcome of token verification. The failure reasons are tagged for
/// logging, but callers only get pass/fail through [`TokenCheck::claims`] —
/// a client cannot distinguish an expired token from a forged one.
#[derive(Debug)]
pub enum TokenCheck {
    Valid(Claims),
    Expired,
    Malformed,
    WrongKey,
}

impl TokenCheck {
    pub fn claims(self) -> Option<Claims> {
        match self {
            TokenCheck::Valid(claims) => Some(claims),
            _ => None,
        }
    }
}

/// Issues and verifies HS256-signed access/refresh tokens. Access and
/// refresh use distinct secrets, so a refresh token never passes as an
/// access token (and vice versa).
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self::from_secrets(&config.access_token_secret, &config.refresh_token_secret)
    }

    pub fn from_secrets(access_secret: &str, refresh_secret: &str) -> Self {
        TokenService {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }

    pub fn issue_access_token(&self, user: &User) -> Result<String> {
        self.issue(user, TokenKind::Access, ACCESS_TTL_SECS)
    }

    pub fn issue_refresh_token(&self, user: &User) -> Result<String> {
        self.issue(user, TokenKind::Refresh, REFRESH_TTL_SECS)
    }

    fn issue(&self, user: &User, kind: TokenKind, ttl_secs: i64) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now,
            exp: now + ttl_secs,
        };
        let key = match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        };
        Ok(encode(&Header::default(), &claims, key)?)
    }

    /// Signature + expiry check. Never errors: any failure comes back as a
    /// non-valid sentinel, logged at debug level server-side.
    pub fn verify(&self, token: &str, kind: TokenKind) -> TokenCheck {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };
        match decode::<Claims>(token, key, &Validation::default()) {
            Ok(data) => TokenCheck::Valid(data.claims),
            Err(e) => {
                let check = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenCheck::Expired,
                    ErrorKind::InvalidSignature => TokenCheck::WrongKey,
                    _ => TokenCheck::Malformed,
                };
                tracing::debug!("Token verification failed ({kind:?}): {check:?}");
                check
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn service() -> TokenService {
        TokenService::from_secrets("test_access_secret", "test_refresh_secret")
    }

    fn test_user() -> User {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            name: "Ada Lovelace".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn access_token_round_trips_claims() {
        let svc = service();
        let user = test_user();
        let token = svc.issue_access_token(&user).unwrap();
        let claims = svc.verify(&token, TokenKind::Access).claims().unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_round_trips_claims() {
        let svc = service();
        let user = test_user();
        let token = svc.issue_refresh_token(&user).unwrap();
        let claims = svc.verify(&token, TokenKind::Refresh).claims().unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[test]
    fn access_token_rejected_against_refresh_key() {
        let svc = service();
        let token = svc.issue_access_token(&test_user()).unwrap();
        let check = svc.verify(&token, TokenKind::Refresh);
        assert!(matches!(check, TokenCheck::WrongKey));
        assert!(svc.verify(&token, TokenKind::Refresh).claims().is_none());
    }

    #[test]
    fn expired_token_returns_sentinel_not_claims() {
        let svc = service();
        let user = test_user();
        // Hand-sign claims already past expiry (beyond the default leeway).
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now - 3_600,
            exp: now - 1_800,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_access_secret"),
        )
        .unwrap();
        let check = svc.verify(&token, TokenKind::Access);
        assert!(matches!(check, TokenCheck::Expired));
        assert!(svc.verify(&token, TokenKind::Access).claims().is_none());
    }

    #[test]
    fn malformed_token_returns_sentinel() {
        let svc = service();
        assert!(matches!(
            svc.verify("not-a-jwt", TokenKind::Access),
            TokenCheck::Malformed
        ));
        assert!(matches!(
            svc.verify("", TokenKind::Refresh),
            TokenCheck::Malformed
        ));
    }
}
