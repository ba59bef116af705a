// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod encoder;
pub mod protocol;

pub use encoder::{Conditioning, ConditioningEntry, EncodedText, TextEncoder};
pub use protocol::{GetImageRequest, LayerProtocol, RemoteImage, SendImagesRequest};
