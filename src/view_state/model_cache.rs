//! Item model cache spanning consecutive layout passes.
//!
//! Providers are host callbacks and may be expensive. While an item stays on
//! screen its model is computed once; an item that leaves the viewport for a
//! full pass is evicted.

use std::collections::HashMap;
use std::mem;

use super::item_model::ItemModel;
use super::visible_item::VisibleItemType;

/// Two-generation cache: models touched this pass and models from the last pass.
///
/// # Eviction
/// [`finish_pass`](Self::finish_pass) drops everything not touched since the
/// previous call, so the cache never holds more than two passes' worth of items.
#[derive(Debug, Default)]
pub struct ItemModelCache {
    current: HashMap<VisibleItemType, ItemModel>,
    previous: HashMap<VisibleItemType, ItemModel>,
}

impl ItemModelCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached model for `item_type`, or the result of `make_model`.
    pub fn get_or_insert_with(
        &mut self,
        item_type: VisibleItemType,
        make_model: impl FnOnce() -> ItemModel,
    ) -> ItemModel {
        if let Some(model) = self.current.get(&item_type) {
            return model.clone();
        }
        let model = self
            .previous
            .remove(&item_type)
            .unwrap_or_else(make_model);
        self.current.insert(item_type, model.clone());
        model
    }

    /// End a layout pass, evicting models not used during it.
    pub fn finish_pass(&mut self) {
        self.previous = mem::take(&mut self.current);
    }

}
