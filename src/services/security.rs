use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rand::Rng;
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    RsaPrivateKey, RsaPublicKey,
};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::config::CONFIG;
use crate::error::{AppError, Result};

const ACCESS_TOKEN_EXPIRE_SECS: i64 = 3600;

/// Signing key pair in PEM form. Loaded from the configured key files on
/// first use; a process-local pair is generated when neither file exists,
/// which means tokens do not survive a restart in that mode.
struct KeyPair {
    private_pem: String,
    public_pem: String,
}

static KEYS: Lazy<RwLock<Option<KeyPair>>> = Lazy::new(|| RwLock::new(None));

/// Claims carried by a portal access token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iss: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

fn read_pem(path: &std::path::Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Internal(format!("Failed to read key file {}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

fn with_keys<T>(f: impl FnOnce(&KeyPair) -> Result<T>) -> Result<T> {
    {
        let cache = KEYS.read();
        if let Some(pair) = cache.as_ref() {
            return f(pair);
        }
    }

    let mut cache = KEYS.write();
    if cache.is_none() {
        let pair = match (
            read_pem(&CONFIG.auth.jwt_private_key_path)?,
            read_pem(&CONFIG.auth.jwt_public_key_path)?,
        ) {
            (Some(private_pem), Some(public_pem)) => KeyPair {
                private_pem,
                public_pem,
            },
            _ => {
                tracing::warn!("JWT key files not found, generating an in-memory key pair");
                let (private_pem, public_pem) = generate_rsa_key_pair()?;
                KeyPair {
                    private_pem,
                    public_pem,
                }
            }
        };
        *cache = Some(pair);
    }
    let pair = cache
        .as_ref()
        .ok_or_else(|| AppError::Internal("Signing keys unavailable".to_string()))?;
    f(pair)
}

/// Generate an RSA key pair for token signing
pub fn generate_rsa_key_pair() -> Result<(String, String)> {
    let mut rng = rand::thread_rng();

    let private_key = RsaPrivateKey::new(&mut rng, 2048)
        .map_err(|e| AppError::Internal(format!("RSA key generation failed: {}", e)))?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| AppError::Internal(format!("Private key encoding failed: {}", e)))?
        .to_string();
    let public_pem = public_key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| AppError::Internal(format!("Public key encoding failed: {}", e)))?;

    Ok((private_pem, public_pem))
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Create an RS256 access token for a portal user
pub fn create_access_token(user_id: i64, email: &str, role: &str) -> Result<String> {
    let now = Utc::now();
    let exp = now + chrono::Duration::seconds(ACCESS_TOKEN_EXPIRE_SECS);

    let claims = Claims {
        sub: user_id.to_string(),
        iss: CONFIG.auth.token_issuer.clone(),
        email: email.to_string(),
        role: role.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    with_keys(|pair| {
        let encoding_key = EncodingKey::from_rsa_pem(pair.private_pem.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid private key: {}", e)))?;
        let header = Header::new(jsonwebtoken::Algorithm::RS256);
        encode(&header, &claims, &encoding_key).map_err(|e| e.into())
    })
}

/// Decode and validate an access token
pub fn decode_token(token: &str) -> Result<Claims> {
    with_keys(|pair| {
        let decoding_key = DecodingKey::from_rsa_pem(pair.public_pem.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid public key: {}", e)))?;

        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    })
}

/// Random hex string of `length` bytes
pub fn generate_random_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..length).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

/// Temporary password for a newly provisioned identity
pub fn generate_temp_password(length: usize) -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Generate a student number: millisecond timestamp plus a short random
/// suffix so two approvals in the same millisecond stay distinguishable.
/// The unique index on students.student_number is the final arbiter.
pub fn generate_student_number() -> String {
    format!(
        "STU-{}{}",
        Utc::now().timestamp_millis(),
        generate_random_string(2)
    )
}
