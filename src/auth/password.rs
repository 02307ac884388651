use sha2::{Digest, Sha256};

/// One-way hash for stored credentials, hex-encoded.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}
