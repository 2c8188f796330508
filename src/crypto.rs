use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{CutilError, Result};
use crate::utils::log;

const LOG_NAME: &str = "crypto";

/// Salt length in bytes, same as libsodium's `crypto_pwhash_SALTBYTES`.
pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters used when hashing.
///
/// Verification never looks at this: the parameters are read back from the
/// encoded hash string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PwhashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub lanes: u32,
}

impl PwhashConfig {
    /// Login-latency preset: 64 MiB, 2 passes.
    pub fn interactive() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 2,
            lanes: 1,
        }
    }

    /// 256 MiB, 3 passes.
    pub fn moderate() -> Self {
        Self {
            memory_kib: 256 * 1024,
            iterations: 3,
            lanes: 1,
        }
    }

    /// 1 GiB, 4 passes. For secrets that are rarely unlocked.
    pub fn sensitive() -> Self {
        Self {
            memory_kib: 1024 * 1024,
            iterations: 4,
            lanes: 1,
        }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(self.memory_kib, self.iterations, self.lanes, None).map_err(|e| {
            CutilError::CryptoOperation {
                action: "hash string",
                reason: e.to_string(),
            }
        })
    }
}

impl Default for PwhashConfig {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Hash `password` with Argon2id and a fresh random salt.
///
/// Returns the PHC string form, e.g. `$argon2id$v=19$m=65536,t=2,p=1$...`.
pub fn password_hash(password: &[u8], config: &PwhashConfig) -> Result<String> {
    let hash_err = |reason: String| CutilError::CryptoOperation {
        action: "hash string",
        reason,
    };

    let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, config.to_params()?);
    let salt_bytes = random_bytes(SALT_LEN)?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| hash_err(e.to_string()))?;

    log::debug(
        LOG_NAME,
        &format!(
            "hashing password (m={}, t={}, p={})",
            config.memory_kib, config.iterations, config.lanes
        ),
    );

    let hash = hasher
        .hash_password(password, &salt)
        .map_err(|e| hash_err(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check `password` against an encoded hash. Malformed hashes never match.
pub fn password_hash_verify(hash: &str, password: &[u8]) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug(LOG_NAME, &format!("rejecting malformed hash: {}", e));
            return false;
        }
    };

    Argon2::default().verify_password(password, &parsed).is_ok()
}

/// `len` bytes from the operating system's CSPRNG.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let rng_err = |reason: String| CutilError::CryptoOperation {
        action: "generate random bytes",
        reason,
    };

    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|e| rng_err(format!("{} ({} bytes)", e, len)))?;
    out.resize(len, 0);
    getrandom::fill(&mut out).map_err(|e| rng_err(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keeps the tests fast; the interactive preset allocates 64 MiB per hash.
    fn cheap() -> PwhashConfig {
        PwhashConfig {
            memory_kib: 64,
            iterations: 1,
            lanes: 1,
        }
    }

    #[test]
    fn hash_then_verify() {
        let hash = password_hash(b"correct horse", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=64,t=1,p=1$"));
        assert!(password_hash_verify(&hash, b"correct horse"));
        assert!(!password_hash_verify(&hash, b"battery staple"));
    }

    #[test]
    fn salts_are_random() {
        let a = password_hash(b"same", &cheap()).unwrap();
        let b = password_hash(b"same", &cheap()).unwrap();
        assert_ne!(a, b);
        assert!(password_hash_verify(&a, b"same"));
        assert!(password_hash_verify(&b, b"same"));
    }

    #[test]
    fn empty_password_is_hashable() {
        let hash = password_hash(b"", &cheap()).unwrap();
        assert!(password_hash_verify(&hash, b""));
        assert!(!password_hash_verify(&hash, b" "));
    }

    #[test]
    fn malformed_hash_does_not_match() {
        assert!(!password_hash_verify("", b"x"));
        assert!(!password_hash_verify("not a hash", b"x"));
        assert!(!password_hash_verify("$argon2id$v=19$m=64,t=1,p=1$", b"x"));
    }

    #[test]
    fn invalid_params_are_crypto_errors() {
        let config = PwhashConfig {
            memory_kib: 1,
            iterations: 0,
            lanes: 1,
        };
        let err = password_hash(b"pw", &config).unwrap_err();
        assert!(matches!(err, CutilError::CryptoOperation { action: "hash string", .. }));
    }

    #[test]
    fn default_is_interactive() {
        let config = PwhashConfig::default();
        assert_eq!(config, PwhashConfig::interactive());
        assert_eq!(config.memory_kib, 65536);
        assert_eq!(config.iterations, 2);
    }

    #[test]
    fn random_bytes_has_requested_length() {
        assert!(random_bytes(0).unwrap().is_empty());
        assert_eq!(random_bytes(1).unwrap().len(), 1);
        assert_eq!(random_bytes(4096).unwrap().len(), 4096);
    }

    #[test]
    fn oversized_random_bytes_is_an_error() {
        let err = random_bytes(i64::MAX as usize).unwrap_err();
        assert!(matches!(
            err,
            CutilError::CryptoOperation { action: "generate random bytes", .. }
        ));
    }

    #[test]
    fn random_bytes_are_not_constant() {
        assert_ne!(random_bytes(32).unwrap(), random_bytes(32).unwrap());
    }
}
