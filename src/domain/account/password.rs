// Password hashing with scrypt.
//
// Output format: "hex(salt):hex(key)" with a random 16-byte salt and a
// 64-byte derived key.

use rand::RngCore;
use scrypt::{scrypt, Params};
use subtle::ConstantTimeEq;
use thiserror::Error;

const KEY_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Invalid password hash format")]
    MalformedHash,

    #[error("Invalid scrypt params: {0}")]
    InvalidParams(String),

    #[error("scrypt failed: {0}")]
    Derivation(String),
}

/// Hashes and verifies passwords.
///
/// Cost parameters are not stored in the hash, so every instance that
/// verifies a hash must use the parameters it was created with.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Default for PasswordHasher {
    /// N=16384, r=16, p=1.
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 16,
            p: 1,
        }
    }
}

impl PasswordHasher {
    pub fn with_params(log_n: u8, r: u32, p: u32) -> Self {
        Self { log_n, r, p }
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt_hex = hex::encode(salt_bytes);

        let key = self.derive(password, &salt_hex)?;
        Ok(format!("{}:{}", salt_hex, hex::encode(key)))
    }

    /// Verify a password against a hash produced by [`PasswordHasher::hash`].
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let (salt, key_hex) = hash.split_once(':').ok_or(PasswordError::MalformedHash)?;
        let expected = hex::decode(key_hex).map_err(|_| PasswordError::MalformedHash)?;
        if expected.len() != KEY_LEN {
            return Err(PasswordError::MalformedHash);
        }

        let derived = self.derive(password, salt)?;
        Ok(derived.ct_eq(&expected).into())
    }

    fn derive(&self, password: &str, salt: &str) -> Result<Vec<u8>, PasswordError> {
        let params = Params::new(self.log_n, self.r, self.p, KEY_LEN)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        let mut output = vec![0u8; KEY_LEN];
        scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut output)
            .map_err(|e| PasswordError::Derivation(e.to_string()))?;
        Ok(output)
    }
}
