//! Minimal compact JWT decoding
//!
//! Only the header and claims are decoded. The token signature is never
//! checked here; that is the job of the proof and the on-chain JWK.

use super::{KeylessError, Result};
use crate::crypto::keyless::{KeylessPublicKey, PEPPER_LENGTH};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

/// Decoded header and claims of a compact JWT
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    raw: String,
    header_json: String,
    header: Map<String, Value>,
    claims: Map<String, Value>,
}

fn decode_segment(segment: &str, what: &str) -> Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| KeylessError::JwtParsing(format!("{what} is not base64url: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| KeylessError::JwtParsing(format!("{what} is not UTF-8: {e}")))
}

fn parse_object(json: &str, what: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(KeylessError::JwtParsing(format!("{what} is not a JSON object"))),
        Err(e) => Err(KeylessError::JwtParsing(format!("{what}: {e}"))),
    }
}

impl Jwt {
    /// Decode `header.payload.signature`
    pub fn parse(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(KeylessError::JwtParsing(
                "expected three dot-separated segments".to_string(),
            ));
        };
        let header_json = decode_segment(header, "header")?;
        let header = parse_object(&header_json, "header")?;
        let claims = parse_object(&decode_segment(payload, "payload")?, "payload")?;
        Ok(Self {
            raw: token.to_string(),
            header_json,
            header,
            claims,
        })
    }

    /// The token as supplied
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Header exactly as encoded in the token
    pub fn header_json(&self) -> &str {
        &self.header_json
    }

    /// Header `kid`
    pub fn kid(&self) -> Result<&str> {
        self.header
            .get("kid")
            .and_then(Value::as_str)
            .ok_or(KeylessError::MissingKid)
    }

    /// A string claim
    pub fn claim(&self, name: &str) -> Result<&str> {
        match self.claims.get(name) {
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(KeylessError::JwtParsing(format!("claim {name} is not a string"))),
            None => Err(KeylessError::JwtParsing(format!("claim {name} is missing"))),
        }
    }

    /// Issuer
    pub fn iss(&self) -> Result<&str> {
        self.claim("iss")
    }

    /// Audience
    pub fn aud(&self) -> Result<&str> {
        self.claim("aud")
    }

    /// Issued-at time, when present
    pub fn iat(&self) -> Option<u64> {
        self.claims.get("iat").and_then(Value::as_u64)
    }

    /// Nonce the token was issued for
    pub fn nonce(&self) -> Result<&str> {
        self.claim("nonce")
    }

    /// Keyless public key for `uid_key` and a 31-byte pepper
    pub fn keyless_public_key(&self, pepper: &[u8], uid_key: &str) -> Result<KeylessPublicKey> {
        if pepper.len() != PEPPER_LENGTH {
            return Err(KeylessError::InvalidPepperLength {
                expected: PEPPER_LENGTH,
                actual: pepper.len(),
            });
        }
        let uid_val = self.claim(uid_key)?;
        Ok(KeylessPublicKey::create(
            self.iss()?,
            uid_key,
            uid_val,
            self.aud()?,
            pepper,
        )?)
    }
}
