// Copyright 2025 Chainflip Labs GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! Codec primitives shared across ecosystems: varint/shortvec encodings,
//! base58(check), bech32, a minimal protobuf writer for Tron, and the hash
//! functions each sighash/preimage rule ultimately reduces to.

pub mod base58;
pub mod hash;
pub mod protobuf;
pub mod scale;
pub mod shortvec;

pub use codec::{Decode, Encode};

/// Errors raised by the decode-side of any codec in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unexpected end of input while decoding {0}")]
    UnexpectedEof(&'static str),
    #[error("invalid base58 payload: {0}")]
    Base58(String),
    #[error("invalid bech32 payload: {0}")]
    Bech32(String),
    #[error("varint overflowed the target integer width")]
    VarintOverflow,
}

/// Appends `n` as a little-endian fixed-width integer.
pub fn push_le<const N: usize>(buf: &mut Vec<u8>, n: u64) {
    buf.extend_from_slice(&n.to_le_bytes()[..N]);
}

/// Appends `n` as a big-endian fixed-width integer.
pub fn push_be<const N: usize>(buf: &mut Vec<u8>, n: u64) {
    buf.extend_from_slice(&n.to_be_bytes()[8 - N..]);
}
