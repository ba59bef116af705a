// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Handle naming a remote document inside a specific backend instance.
///
/// Serialized form (as carried by the unlinked `document` input):
/// `{"identify": "doc1", "instance_id": "ps1"}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub identify: String,
    pub instance_id: String,
}

impl DocumentRef {
    pub fn new(identify: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            identify: identify.into(),
            instance_id: instance_id.into(),
        }
    }
}

/// Layer reference produced by an upstream layer-selector node; it carries its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedLayer {
    pub layer_identify: String,
    pub document: DocumentRef,
}

/// One item of a node's `layer_or_group` input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerOrGroup {
    Linked(LinkedLayer),
    Id(String),
}

impl LayerOrGroup {
    pub fn id(layer_identify: impl Into<String>) -> Self {
        LayerOrGroup::Id(layer_identify.into())
    }

    pub fn linked(layer_identify: impl Into<String>, document: DocumentRef) -> Self {
        LayerOrGroup::Linked(LinkedLayer {
            layer_identify: layer_identify.into(),
            document,
        })
    }
}

/// How a node's target document is addressed.
///
/// Exactly one mode applies per call. The host decides which by looking at
/// whether `layer_or_group` is wired to an upstream node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// `layer_or_group` is linked; the document comes from the first item.
    Linked,
    /// `layer_or_group` holds raw ids; the document is this serialized `DocumentRef`.
    Unlinked(String),
}

impl Addressing {
    /// Unlinked addressing for an already known document.
    pub fn unlinked(document: &DocumentRef) -> Result<Self, serde_json::Error> {
        Ok(Addressing::Unlinked(serde_json::to_string(document)?))
    }
}

/// Outcome of resolving a node's addressing inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub linked: bool,
    pub document: DocumentRef,
}
