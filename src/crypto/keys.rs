//! In-memory key handling and the vault key verifier.
//!
//! `DerivedKey` owns the Argon2id output and wipes it on drop.  The
//! verifier stored in the vault metadata is an HMAC-SHA256 tag over a
//! fixed label, keyed by an HKDF-SHA256 subkey of the derived key, so a
//! wrong master password is rejected before any record is touched.

use std::fmt;

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{Result, VaultError};

/// Length of the key-check subkey (256 bits).
const CHECK_KEY_LEN: usize = 32;

/// HKDF `info` binding the subkey to its single purpose.
const CHECK_KEY_INFO: &[u8] = b"passvault-key-check";

/// Message authenticated by the verifier tag.
const CHECK_LABEL: &[u8] = b"passvault-key-check-v1";

/// A derived master key that zeroes its memory when dropped.
///
/// The core never caches it: callers hold it for the duration of a
/// session and pass `as_bytes()` into every record operation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: Vec<u8>,
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub(crate) fn from_zeroizing(mut bytes: Zeroizing<Vec<u8>>) -> Self {
        Self {
            bytes: std::mem::take(&mut *bytes),
        }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

/// Run HKDF-SHA256 over the master key with an empty extract salt.
fn derive_check_key(master_key: &[u8]) -> Result<Zeroizing<[u8; CHECK_KEY_LEN]>> {
    let hk = Hkdf::<Sha256>::new(None, master_key);

    let mut okm = Zeroizing::new([0u8; CHECK_KEY_LEN]);
    hk.expand(CHECK_KEY_INFO, &mut okm[..])
        .map_err(|e| VaultError::InvalidInput(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// Compute the verifier tag stored under the `key_check` metadata key.
pub fn compute_key_check(master_key: &[u8]) -> Result<Vec<u8>> {
    let check_key = derive_check_key(master_key)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&check_key[..])
        .map_err(|e| VaultError::InvalidInput(format!("invalid HMAC key: {e}")))?;
    mac.update(CHECK_LABEL);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verify a stored verifier tag in constant time.
pub fn verify_key_check(master_key: &[u8], expected: &[u8]) -> Result<()> {
    let check_key = derive_check_key(master_key)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&check_key[..])
        .map_err(|_| VaultError::AuthenticationFailure)?;
    mac.update(CHECK_LABEL);
    mac.verify_slice(expected)
        .map_err(|_| VaultError::AuthenticationFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_print_key_bytes() {
        let key = DerivedKey::new(vec![0xAB; 32]);
        let shown = format!("{key:?}");
        assert!(shown.contains("len: 32"));
        assert!(!shown.contains("171"));
    }

    #[test]
    fn key_check_roundtrip() {
        let tag = compute_key_check(&[0x42; 32]).unwrap();
        assert_eq!(tag.len(), 32);
        verify_key_check(&[0x42; 32], &tag).unwrap();
    }

    #[test]
    fn key_check_rejects_other_key() {
        let tag = compute_key_check(&[0x42; 32]).unwrap();
        assert!(matches!(
            verify_key_check(&[0x43; 32], &tag),
            Err(VaultError::AuthenticationFailure)
        ));
    }
}
