use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Path to the RSA private key used for signing access tokens.
    /// A temporary in-memory key pair is generated when the file is absent.
    pub jwt_private_key_path: PathBuf,
    pub jwt_public_key_path: PathBuf,
    pub token_issuer: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_private_key_path: env::var("REGISTRAR_JWT_PRIVATE_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/etc/registrar/jwt_private.pem")),
            jwt_public_key_path: env::var("REGISTRAR_JWT_PUBLIC_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/etc/registrar/jwt_public.pem")),
            token_issuer: env::var("REGISTRAR_TOKEN_ISSUER")
                .unwrap_or_else(|_| "registrar".to_string()),
        }
    }
}
