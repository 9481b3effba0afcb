//! Signed assertion for the OAuth2 JWT-bearer grant (RFC 7523).
//!
//! Header and claims are serialized as JSON, base64url-encoded without
//! padding, and signed with RSASSA-PKCS1-v1_5 over SHA-256.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use serde::Serialize;
use sha2::Sha256;

use super::{AuthError, ServiceAccountKey};

/// Lifetime requested for every assertion.
pub const ASSERTION_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

/// Builds `header.claims.signature` for `key`, issued at `issued_at` (unix seconds).
pub fn build_assertion(
    key: &ServiceAccountKey,
    scope: &str,
    issued_at: i64,
) -> Result<String, AuthError> {
    let header = Header {
        alg: "RS256",
        typ: "JWT",
    };
    let claims = Claims {
        iss: &key.client_email,
        scope,
        aud: &key.token_uri,
        exp: issued_at + ASSERTION_TTL_SECS,
        iat: issued_at,
    };

    let signing_input = format!(
        "{}.{}",
        encode_segment(&header)?,
        encode_segment(&claims)?
    );

    let private_key = import_private_key(&key.private_key)?;
    let signing_key = SigningKey::<Sha256>::new(private_key);
    let signature = signing_key
        .try_sign(signing_input.as_bytes())
        .map_err(|e| AuthError::Signing(e.to_string()))?;

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Service-account blobs often carry the PEM with literal `\n` escapes.
fn import_private_key(pem: &str) -> Result<RsaPrivateKey, AuthError> {
    let pem = pem.replace("\\n", "\n");
    RsaPrivateKey::from_pkcs8_pem(pem.trim()).map_err(|e| AuthError::InvalidKey(e.to_string()))
}
