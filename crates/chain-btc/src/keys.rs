//! secp256k1 key handling.
//!
//! Private keys wrap a k256 `SigningKey`, which zeroizes its scalar on drop.
//! Public keys serialize to SEC1 compressed (33 bytes) or uncompressed
//! (65 bytes) form.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::error::BtcError;
use crate::hash;

/// Length of a serialized private key scalar.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of a SEC1 compressed public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Length of a SEC1 uncompressed public key.
pub const UNCOMPRESSED_PUBKEY_LEN: usize = 65;

/// A secp256k1 private key in `[1, n-1]`.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Parse a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BtcError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(BtcError::InvalidKeyFormat(format!(
                "expected {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = SigningKey::from_slice(bytes).map_err(|_| {
            BtcError::InvalidKeyFormat("scalar is zero or not below the curve order".into())
        })?;
        Ok(Self { inner })
    }

    /// Big-endian scalar bytes, wiped when the returned buffer is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LEN]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Lowercase hex of the scalar (64 characters).
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_bytes().as_slice()))
    }

    /// The public key `privateKey * G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: *self.inner.verifying_key(),
        }
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([redacted])")
    }
}

/// A secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse a SEC1-encoded point (33-byte compressed or 65-byte uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, BtcError> {
        if bytes.len() != COMPRESSED_PUBKEY_LEN && bytes.len() != UNCOMPRESSED_PUBKEY_LEN {
            return Err(BtcError::InvalidKeyFormat(format!(
                "public key must be {COMPRESSED_PUBKEY_LEN} or {UNCOMPRESSED_PUBKEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| {
            BtcError::InvalidKeyFormat("public key is not a point on secp256k1".into())
        })?;
        Ok(Self { inner })
    }

    /// Parity byte followed by the x-coordinate.
    pub fn serialize_compressed(&self) -> [u8; COMPRESSED_PUBKEY_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBKEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// `0x04` followed by the x- and y-coordinates.
    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_PUBKEY_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBKEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Hash160 of the compressed encoding, as committed to by P2PKH scripts.
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(&self.serialize_compressed())
    }

    /// Verify a DER-encoded ECDSA signature over a 32-byte digest.
    ///
    /// High-S signatures are rejected.
    pub fn verify(&self, digest: &[u8; 32], der_signature: &[u8]) -> Result<(), BtcError> {
        let signature = Signature::from_der(der_signature)
            .map_err(|e| BtcError::SigningError(format!("malformed DER signature: {e}")))?;
        self.inner
            .verify_prehash(digest, &signature)
            .map_err(|_| BtcError::SigningError("signature does not verify".into()))
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.serialize_compressed()))
    }
}

/// A private key together with its public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }
}

/// Generate a fresh keypair from the operating system's CSPRNG.
///
/// The scalar is drawn uniformly from `[1, n-1]`. An unavailable entropy
/// source aborts inside the RNG; there is no recoverable error.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::random(&mut OsRng);
    KeyPair::from_private_key(PrivateKey { inner: signing_key })
}

/// Parse a hex-encoded 32-byte private key.
pub fn parse_private_key(hex_str: &str) -> Result<PrivateKey, BtcError> {
    let bytes = Zeroizing::new(
        hex::decode(hex_str)
            .map_err(|e| BtcError::InvalidKeyFormat(format!("invalid hex: {e}")))?,
    );
    PrivateKey::from_bytes(&bytes)
}
