// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod bridge;
mod codec;
mod config;
mod remote;
mod resolve;
mod transfer;

pub use bridge::BridgeError;
pub use codec::CodecError;
pub use config::ConfigError;
pub use remote::RemoteError;
pub use resolve::ResolveError;
pub use transfer::TransferError;
