//! Sign-in service: magic links and bearer tokens.
//!
//! Sign-in is passwordless. A user requests a link, we store a hash of the
//! single-use token on their row and mail the link. Verifying the token
//! consumes it and issues a JWT carrying the user's id and session version;
//! bumping `session_version` invalidates every outstanding token.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use studyhub_common::{AppError, AppResult, Config, IdGenerator};
use studyhub_db::{entities::user, repositories::UserRepository};
use validator::Validate;

use crate::authz;
use crate::services::email::EmailService;

/// Claims carried by bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Session version at issue time.
    pub sv: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Input for requesting a magic sign-in link.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestMagicLinkInput {
    #[validate(email)]
    pub email: String,
}

/// Input for redeeming a magic sign-in link.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyMagicLinkInput {
    #[validate(length(min = 1))]
    pub token: String,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    email_service: EmailService,
    id_gen: IdGenerator,
    server_url: String,
    jwt_secret: String,
    jwt_ttl_hours: i64,
    allowed_email_domains: Vec<String>,
    magic_link_ttl_minutes: i64,
    magic_link_cooldown_seconds: i64,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(user_repo: UserRepository, email_service: EmailService, config: &Config) -> Self {
        Self {
            user_repo,
            email_service,
            id_gen: IdGenerator::new(),
            server_url: config.server.url.clone(),
            jwt_secret: config.auth.jwt_secret.clone(),
            jwt_ttl_hours: config.auth.jwt_ttl_hours,
            allowed_email_domains: config.auth.allowed_email_domains.clone(),
            magic_link_ttl_minutes: config.auth.magic_link_ttl_minutes,
            magic_link_cooldown_seconds: config.auth.magic_link_cooldown_seconds,
        }
    }

    /// Request a magic sign-in link for an email address.
    ///
    /// Provisions the account row on first contact; the account only becomes
    /// usable once a link is verified.
    pub async fn request_magic_link(&self, input: RequestMagicLinkInput) -> AppResult<()> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        self.check_domain(&email)?;

        let now = Utc::now();
        let existing = self.user_repo.find_by_email(&email).await?;

        if let Some(ref user) = existing {
            if authz::is_blocked(user) {
                return Err(AppError::Forbidden("Account is blocked".to_string()));
            }
            if let Some(requested_at) = user.magic_link_requested_at {
                let elapsed = now.fixed_offset() - requested_at;
                if elapsed < Duration::seconds(self.magic_link_cooldown_seconds) {
                    return Err(AppError::RateLimited(
                        "A sign-in link was sent recently, try again shortly".to_string(),
                    ));
                }
            }
        }

        let token = self.id_gen.generate_token();
        let hash = hash_token(&token);
        let expires_at = now + Duration::minutes(self.magic_link_ttl_minutes);

        match existing {
            Some(user) => {
                let mut active: user::ActiveModel = user.into();
                active.magic_link_hash = Set(Some(hash));
                active.magic_link_expires_at = Set(Some(expires_at.into()));
                active.magic_link_requested_at = Set(Some(now.into()));
                active.updated_at = Set(Some(now.into()));
                self.user_repo.update(active).await?;
            }
            None => {
                let model = user::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    email: Set(email.clone()),
                    student_id: Set(student_id_from_email(&email)),
                    role: Set(user::UserRole::User),
                    magic_link_hash: Set(Some(hash)),
                    magic_link_expires_at: Set(Some(expires_at.into())),
                    magic_link_requested_at: Set(Some(now.into())),
                    session_version: Set(0),
                    blocked_until: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(None),
                };
                self.user_repo.create(model).await?;
            }
        }

        let link = format!(
            "{}/auth/verify?token={token}",
            self.server_url.trim_end_matches('/')
        );
        self.email_service.send_magic_link(&email, &link).await?;

        tracing::debug!(email = %email, "Magic link issued");
        Ok(())
    }

    /// Redeem a magic link token, returning the user and a bearer token.
    pub async fn verify_magic_link(
        &self,
        input: VerifyMagicLinkInput,
    ) -> AppResult<(user::Model, String)> {
        input.validate()?;

        let hash = hash_token(input.token.trim());
        let user = self
            .user_repo
            .find_by_magic_link_hash(&hash)
            .await?
            .ok_or_else(invalid_link)?;

        let now = Utc::now().fixed_offset();
        let expires_at = user.magic_link_expires_at.ok_or_else(invalid_link)?;
        if expires_at < now {
            return Err(invalid_link());
        }

        if authz::is_blocked(&user) {
            return Err(AppError::Forbidden("Account is blocked".to_string()));
        }

        // Single use: clear the token before issuing the session
        let mut active: user::ActiveModel = user.into();
        active.magic_link_hash = Set(None);
        active.magic_link_expires_at = Set(None);
        active.updated_at = Set(Some(now));
        let user = self.user_repo.update(active).await?;

        let token = self.issue_token(&user)?;
        tracing::debug!(user_id = %user.id, "Magic link verified");
        Ok((user, token))
    }

    /// Authenticate a bearer token, returning the current user.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.decode_token(token)?;

        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

        if claims.sv != user.session_version {
            return Err(AppError::Unauthorized(
                "Session has been revoked".to_string(),
            ));
        }
        if authz::is_blocked(&user) {
            return Err(AppError::Forbidden("Account is blocked".to_string()));
        }

        Ok(user)
    }

    /// Decode and validate a bearer token.
    pub fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }

    fn issue_token(&self, user: &user::Model) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            sv: user.session_version,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.jwt_ttl_hours)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    fn check_domain(&self, email: &str) -> AppResult<()> {
        if self.allowed_email_domains.is_empty() {
            return Ok(());
        }
        let domain = email.rsplit('@').next().unwrap_or_default();
        if self
            .allowed_email_domains
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(domain))
        {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Email domain is not allowed".to_string(),
            ))
        }
    }
}

fn invalid_link() -> AppError {
    AppError::Unauthorized("Invalid or expired sign-in link".to_string())
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn student_id_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
