//! Session tokens for the mutating post routes.
//!
//! A token is `base64url(user_id:role:expires_unix).hex(hmac_sha256)`, signed
//! with the server's session secret. Nothing is stored server side; revoking
//! every session means rotating the secret.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::domain::entities::{Post, Role, User};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub role: Role,
}

impl Requester {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners may modify their own posts, admins may modify any post.
    pub fn can_modify(&self, post: &Post) -> bool {
        self.is_admin() || post.author_id == self.user_id
    }
}

/// Issues and verifies signed session tokens.
pub struct SessionService {
    signing_secret: String,
    ttl: Duration,
}

impl SessionService {
    /// Creates a session service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key shared by every server instance
    /// - `ttl_seconds` - lifetime of newly issued tokens
    pub fn new(signing_secret: String, ttl_seconds: i64) -> Self {
        Self {
            signing_secret,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    fn sign(&self, payload: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        mac
    }

    /// Issues a token for `user` valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> String {
        self.issue_until(user.id, user.role, Utc::now() + self.ttl)
    }

    /// Issues a token that expires at `expires_at`.
    pub fn issue_until(&self, user_id: i64, role: Role, expires_at: DateTime<Utc>) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!(
            "{}:{}:{}",
            user_id,
            role,
            expires_at.timestamp()
        ));
        let signature = hex::encode(self.sign(&payload).finalize().into_bytes());

        format!("{}.{}", payload, signature)
    }

    /// Verifies a token and returns the requester it was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, carries a
    /// bad signature, or has expired.
    pub fn resolve(&self, token: &str) -> Result<Requester, AppError> {
        self.resolve_at(token, Utc::now())
    }

    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Result<Requester, AppError> {
        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| invalid_session("Malformed token"))?;

        let signature = hex::decode(signature).map_err(|_| invalid_session("Malformed token"))?;
        self.sign(payload)
            .verify_slice(&signature)
            .map_err(|_| invalid_session("Invalid signature"))?;

        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| invalid_session("Malformed token"))?;

        let mut parts = decoded.splitn(3, ':');
        let (Some(user_id), Some(role), Some(expires)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid_session("Malformed token"));
        };

        let user_id = user_id
            .parse::<i64>()
            .map_err(|_| invalid_session("Malformed token"))?;
        let role = role
            .parse::<Role>()
            .map_err(|_| invalid_session("Malformed token"))?;
        let expires = expires
            .parse::<i64>()
            .map_err(|_| invalid_session("Malformed token"))?;

        if now.timestamp() >= expires {
            return Err(invalid_session("Session expired"));
        }

        Ok(Requester { user_id, role })
    }
}

fn invalid_session(reason: &str) -> AppError {
    AppError::unauthorized("Unauthorized", json!({ "reason": reason }))
}
