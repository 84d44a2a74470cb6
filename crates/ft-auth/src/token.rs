//! Client-side inspection of credential tokens.
//!
//! The signature is NOT verified here. Decoded claims only drive what the
//! client shows; the API re-checks the bearer token on every request.

use crate::{AuthError, Result as AuthErrorResult, TokenClaims};

use ft_core::Identity;

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::dangerous::insecure_decode;

/// A persisted token that decoded cleanly and has not expired.
#[derive(Debug, Clone)]
pub struct TokenInspection {
    pub claims: TokenClaims,
    pub identity: Identity,
}

/// Decode the claims without checking the signature or expiry.
///
/// Any `alg` in the header is accepted; the payload is all the client reads.
#[track_caller]
pub fn decode_claims(token: &str) -> AuthErrorResult<TokenClaims> {
    let token_data = insecure_decode::<TokenClaims>(token).map_err(|e| AuthError::JwtDecode {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    token_data.claims.validate()?;

    Ok(token_data.claims)
}

/// Decode `token` and check its expiry against `now_millis`.
#[track_caller]
pub fn inspect(token: &str, now_millis: i64) -> AuthErrorResult<TokenInspection> {
    let claims = decode_claims(token)?;

    if claims.is_expired_at(now_millis) {
        return Err(AuthError::TokenExpired {
            expired_at: claims.exp,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let identity = claims.to_identity();
    Ok(TokenInspection { claims, identity })
}

/// [`inspect`] against the current wall clock.
#[track_caller]
pub fn inspect_now(token: &str) -> AuthErrorResult<TokenInspection> {
    inspect(token, Utc::now().timestamp_millis())
}
