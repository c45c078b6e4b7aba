// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication for user accounts.

use std::str::FromStr;

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use fieldops_domain::{Claims, Role};
use fieldops_persistence::{Persistence, PersistenceError, SessionData, UserData};

use crate::error::AuthError;

/// Authentication service backed by database-stored session tokens.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (8 hours).
    const SESSION_EXPIRATION: Duration = Duration::hours(8);

    /// Authenticates a user by email and password and creates a session.
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `claims`, `user_data`).
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong. Unknown addresses,
    /// deactivated accounts, and wrong passwords are indistinguishable to
    /// the caller.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, Claims, UserData), AuthError> {
        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                debug!(email, "Login attempt for unknown email");
                Self::invalid_credentials()
            })?;

        if !user.is_active {
            warn!(user_id = user.user_id, "Login attempt on deactivated account");
            return Err(Self::invalid_credentials());
        }

        let password_matches: bool = persistence
            .verify_password(password, &user.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_matches {
            debug!(user_id = user.user_id, "Login attempt with wrong password");
            return Err(Self::invalid_credentials());
        }

        let role: Role =
            Role::from_str(&user.role).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Stored role is invalid: {e}"),
            })?;

        let session_token: String = Self::generate_session_token();

        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at_str)
            .map_err(Self::map_persistence_error)?;

        info!(user_id = user.user_id, role = %role, "Login succeeded");

        let claims: Claims = Claims::new(user.user_id, user.name.clone(), role);
        Ok((session_token, claims, user))
    }

    /// Validates a session token and returns the caller's claims.
    ///
    /// Expired sessions are purged opportunistically on every validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown, expired, or belongs to a
    /// user that no longer exists or is deactivated.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<Claims, AuthError> {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let now_str: String = now
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format current time: {e}"),
            })?;

        let purged: usize = persistence
            .delete_expired_sessions(&now_str)
            .map_err(Self::map_persistence_error)?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(
            &session.expires_at,
            &time::format_description::well_known::Iso8601::DEFAULT,
        )
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })?;

        if now > expires_at {
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if !user.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is deactivated"),
            });
        }

        let role: Role =
            Role::from_str(&user.role).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Stored role is invalid: {e}"),
            })?;

        Ok(Claims::new(user.user_id, user.name, role))
    }

    /// Logs out by deleting the session. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session delete fails.
    pub fn logout(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::map_persistence_error)?;
        Ok(())
    }

    /// Generates an opaque 256-bit session token as lowercase hex.
    fn generate_session_token() -> String {
        format!(
            "{:032x}{:032x}",
            rand::random::<u128>(),
            rand::random::<u128>()
        )
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid credentials"),
        }
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
