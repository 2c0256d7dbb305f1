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

//! Chain-agnostic data model for the multi-chain transaction lifecycle
//! engine: the types every ecosystem builder, sighash engine, applier and
//! decoder in `wallet-chains` produces or consumes.

pub mod amount;
pub mod balance;
pub mod chain;
pub mod error;
pub mod fee;
pub mod intent;
pub mod normalised;
pub mod signing;

pub use amount::Amount;
pub use balance::NativeBalance;
pub use chain::{ChainAlias, ChainConfig, Ecosystem, FeatureFlags, NativeCurrency};
pub use error::EngineError;
pub use fee::{FeeEstimate, FeeLevel};
pub use intent::{TokenStandard, TransferIntent};
pub use normalised::{NormalisedMetadata, NormalisedTransaction, TokenTransferEvent, TransactionType};
pub use signing::{BroadcastResult, RawSignature, SignedTransaction, SigningAlgorithm, SigningPayload};
