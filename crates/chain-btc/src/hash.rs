use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Hash160: RIPEMD-160(SHA-256(data)).
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}
