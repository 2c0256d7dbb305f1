//! The hash functions every sighash/preimage rule reduces to: Keccak-256
//! (EVM, TVM txID), SHA-256d (UTXO legacy txid), Blake2b-256 (Substrate
//! >256B extrinsics, Substrate extrinsic hash), and SHA-512 (XRPL, first
//! half kept).

use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double-SHA256, used for UTXO legacy txids.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Blake2b-256 (32-byte digest), used by Substrate for long extrinsic
/// payloads and for extrinsic hashes.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    use blake2::Digest as _;
    use blake2::digest::consts::U32;
    let mut hasher = blake2::Blake2b::<U32>::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Blake2b-512, used for the SS58 address checksum (the checksum is the
/// leading bytes of this digest over `b"SS58PRE" ++ payload`).
pub fn blake2b_512(data: &[u8]) -> [u8; 64] {
    use blake2::Digest as _;
    use blake2::digest::consts::U64;
    let mut hasher = blake2::Blake2b::<U64>::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-512, keeping only the first 32 bytes ("SHA-512-half"), used by XRPL.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let full: [u8; 64] = hasher.finalize().into();
    let mut half = [0u8; 32];
    half.copy_from_slice(&full[..32]);
    half
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_transfer_selector() {
        // keccak256("transfer(address,uint256)")[0..4] == 0xa9059cbb
        let digest = keccak256(b"transfer(address,uint256)");
        assert_eq!(&digest[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn keccak_of_erc20_transfer_topic() {
        let digest = keccak256(b"Transfer(address,address,uint256)");
        assert_eq!(hex::encode(digest), "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
    }

    #[test]
    fn sha256d_is_double_sha256() {
        let once = sha256(b"chainflip");
        let twice = sha256(&once);
        assert_eq!(sha256d(b"chainflip"), twice);
    }
}
