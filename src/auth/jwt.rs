use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Why a token was rejected. Logged server side; clients only ever see a 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token claims are invalid")]
    InvalidClaims,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature => AuthError::InvalidClaims,
            _ => AuthError::Malformed,
        }
    }
}

/// Signing and verification keys derived from the process secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    ttl: Duration,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        TokenKeys::new(&state.config.jwt)
    }
}

impl TokenKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm,
            issuer: cfg.issuer.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes),
        }
    }

    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// A negative `ttl` yields a token that is already expired.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            iss: self.issuer.clone(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)?;
        debug!(subject = %subject, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        let data = decode::<Claims>(token, &self.decoding, &validation)?;

        // The library only rejects exp < now; a token is dead from exp onwards.
        if data.claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            return Err(AuthError::Expired);
        }
        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidClaims);
        }
        debug!(subject = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str) -> TokenKeys {
        TokenKeys::new(&JwtConfig {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret", "test-issuer");
        let token = keys.issue("a@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iss, "test-issuer");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_is_compact_and_url_safe() {
        let keys = make_keys("dev-secret", "iss");
        let token = keys.issue("a@x.com").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret", "iss");
        let token = keys
            .issue_with_ttl("a@x.com", Duration::seconds(-60))
            .unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn token_expiring_now_is_rejected() {
        let keys = make_keys("dev-secret", "iss");
        let token = keys.issue_with_ttl("a@x.com", Duration::ZERO).unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let good = make_keys("secret-one", "iss");
        let bad = make_keys("secret-two", "iss");
        let token = bad.issue("a@x.com").unwrap();
        assert_eq!(good.verify(&token), Err(AuthError::BadSignature));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let keys = make_keys("dev-secret", "iss");
        let other = keys.issue("b@x.com").unwrap();
        let token = keys.issue("a@x.com").unwrap();

        // Splice b's payload onto a's signature.
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert!(keys.verify(&forged).is_err());
    }

    #[test]
    fn every_flipped_byte_is_rejected() {
        let keys = make_keys("dev-secret", "iss");
        let token = keys.issue("a@x.com").unwrap();
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            if bytes[i] == b'.' {
                continue;
            }
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            let result = keys.verify(&tampered);
            assert!(
                result.is_err() || result.as_ref().map(|c| c.sub.as_str()) == Ok("a@x.com"),
                "flip at {i} produced a different identity: {result:?}"
            );
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = make_keys("dev-secret", "iss");
        assert_eq!(keys.verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(keys.verify(""), Err(AuthError::Malformed));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let good = make_keys("same-secret", "good-iss");
        let bad = make_keys("same-secret", "bad-iss");
        let token = bad.issue("a@x.com").unwrap();
        assert_eq!(good.verify(&token), Err(AuthError::InvalidClaims));
    }

    #[test]
    fn token_with_different_algorithm_is_rejected() {
        let keys = make_keys("dev-secret", "iss");
        let hs512 = TokenKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            algorithm: Algorithm::HS512,
            issuer: "iss".into(),
            ttl_minutes: 5,
        });
        let token = hs512.issue("a@x.com").unwrap();
        assert_eq!(keys.verify(&token), Err(AuthError::Malformed));
    }
}
