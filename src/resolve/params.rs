// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ResolveError;
use crate::resolve::types::{Addressing, DocumentRef, LayerOrGroup, ResolvedTarget};

/// Work out which document a call addresses.
///
/// Pure structural dispatch over the inputs; nothing remote is consulted.
pub fn resolve(
    addressing: &Addressing,
    layer_or_group: &[LayerOrGroup],
) -> Result<ResolvedTarget, ResolveError> {
    match addressing {
        Addressing::Linked => match layer_or_group.first() {
            Some(LayerOrGroup::Linked(first)) => Ok(ResolvedTarget {
                linked: true,
                document: first.document.clone(),
            }),
            Some(LayerOrGroup::Id(_)) => Err(ResolveError::UnlinkedLayer(0)),
            None => Err(ResolveError::MissingLayer),
        },
        Addressing::Unlinked(serialized) => {
            let document: DocumentRef = serde_json::from_str(serialized)?;
            Ok(ResolvedTarget {
                linked: false,
                document,
            })
        }
    }
}

impl ResolvedTarget {
    /// Concrete layer identifier of one item, unwrapping linked references.
    pub fn layer_identify(
        &self,
        item: &LayerOrGroup,
        index: usize,
    ) -> Result<String, ResolveError> {
        match (self.linked, item) {
            (_, LayerOrGroup::Linked(layer)) => Ok(layer.layer_identify.clone()),
            (false, LayerOrGroup::Id(id)) => Ok(id.clone()),
            (true, LayerOrGroup::Id(_)) => Err(ResolveError::UnlinkedLayer(index)),
        }
    }
}

/// Per-item value under the broadcast rule.
///
/// * no values: `default`
/// * one value: that value, for every index
/// * otherwise: `values[index]`, or `IndexOutOfRange`
pub fn index_or_broadcast<T: Clone>(
    values: &[T],
    index: usize,
    default: T,
) -> Result<T, ResolveError> {
    match values {
        [] => Ok(default),
        [only] => Ok(only.clone()),
        _ => values
            .get(index)
            .cloned()
            .ok_or(ResolveError::IndexOutOfRange {
                index,
                len: values.len(),
            }),
    }
}

/// Decode the string-encoded `selection_only` flag.
pub fn parse_selection_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
