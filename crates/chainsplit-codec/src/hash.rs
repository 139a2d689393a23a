//! Double SHA-256, the block and transaction identifier hash.

use chainsplit_core::types::Hash256;
use sha2::{Digest, Sha256};

pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}
