use argon2::{Config, Variant};
use rand::RngCore;

const SALT_LENGTH: usize = 16;

fn hashing_config<'a>() -> Config<'a> {
    Config {
        variant: Variant::Argon2id,
        ..Config::default()
    }
}

/// Returns PHC-encoded Argon2id hash with random salt
pub fn hash_password(password: &str) -> Result<String, argon2::Error> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    argon2::hash_encoded(password.as_bytes(), &salt, &hashing_config())
}

/// Parameters are read from the encoded hash
pub fn verify_password(
    password_hash: &str,
    password: &str,
) -> Result<bool, argon2::Error> {
    argon2::verify_encoded(password_hash, password.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "Secret#2024";
        let password_hash = hash_password(password).unwrap();
        assert!(password_hash.starts_with("$argon2id$"));
        assert!(verify_password(&password_hash, password).unwrap());
        assert!(!verify_password(&password_hash, "Secret#2025").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hash_1 = hash_password("Secret#2024").unwrap();
        let hash_2 = hash_password("Secret#2024").unwrap();
        assert_ne!(hash_1, hash_2);
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(verify_password("not-a-hash", "Secret#2024").is_err());
    }
}
