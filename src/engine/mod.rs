// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod change;
pub mod transfer;
#[cfg(test)]
pub mod integration_tests;

pub use change::{ChangeDetector, ChangeToken};
pub use transfer::{FetchOutput, FetchRequest, SendRequest, TransferOrchestrator};
