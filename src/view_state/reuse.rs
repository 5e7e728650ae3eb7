//! View recycling across layout passes.
//!
//! Views are interchangeable only within a [`Differentiator`] group. Each pass
//! first keeps views for items that are still visible, then hands the freed
//! views to new items of the same group, and only then asks the factory for
//! new views.

use std::collections::HashMap;
use std::mem;

use tracing::trace;

use super::item_model::{Differentiator, ItemModel};
use super::visible_item::VisibleItem;

/// Host contract for creating and updating renderable views.
pub trait ViewFactory {
    /// Handle to a host view. Cloning must yield a handle to the same view.
    type View: Clone;

    /// Create a view configured for `differentiator`.
    fn make_view(&mut self, differentiator: &Differentiator) -> Self::View;

    /// Push transient content into an existing view.
    fn update_content(&mut self, view: &Self::View, model: &ItemModel);
}

/// How a view was obtained for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseKind {
    /// Same item as last pass; same view.
    Retained,
    /// View freed by another item with the same differentiator.
    Recycled,
    /// New view from the factory.
    Created,
}

/// A visible item paired with the view that renders it.
#[derive(Debug, Clone)]
pub struct ViewAssignment<V> {
    /// Item to render.
    pub item: VisibleItem,
    /// View that renders it.
    pub view: V,
    /// Where the view came from.
    pub reuse: ReuseKind,
}

impl<V> ViewAssignment<V> {
    /// True unless the view was freshly created.
    pub fn was_reused(&self) -> bool {
        self.reuse != ReuseKind::Created
    }
}

/// Counts from the latest [`assign_views`](ItemViewReuseManager::assign_views) call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReuseStats {
    /// Items that kept their view from the previous pass.
    pub retained: usize,
    /// Items given a view released by another item.
    pub recycled: usize,
    /// Items that needed a new view.
    pub created: usize,
    /// Previous views left without an item.
    pub released: usize,
}

/// Assigns views to visible items, reusing views from the previous pass.
///
/// # Invariants
/// - A view is only ever handed to an item with the differentiator it was created for.
/// - Each view is assigned to at most one item per pass.
pub struct ItemViewReuseManager<F: ViewFactory> {
    factory: F,
    reuse_enabled: bool,
    previous: HashMap<VisibleItem, F::View>,
    last_stats: ReuseStats,
}

impl<F: ViewFactory> ItemViewReuseManager<F> {
    /// Empty pool drawing new views from `factory`, with reuse enabled.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            reuse_enabled: true,
            previous: HashMap::new(),
            last_stats: ReuseStats::default(),
        }
    }

    /// Factory that creates and updates views.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Whether views carry over between passes.
    pub fn reuse_enabled(&self) -> bool {
        self.reuse_enabled
    }

    /// With reuse disabled every item gets a fresh view on every pass.
    pub fn set_reuse_enabled(&mut self, enabled: bool) {
        self.reuse_enabled = enabled;
        if !enabled {
            self.previous.clear();
        }
    }

    /// Counts from the most recent pass.
    pub fn last_stats(&self) -> ReuseStats {
        self.last_stats
    }

    /// Assign a view to every item, in back-to-front order.
    pub fn assign_views(
        &mut self,
        items: impl IntoIterator<Item = VisibleItem>,
    ) -> Vec<ViewAssignment<F::View>> {
        let mut items: Vec<VisibleItem> = items.into_iter().collect();
        items.sort_by_key(|item| item.item_type());

        let mut stats = ReuseStats::default();
        let mut previous = mem::take(&mut self.previous);

        // Exact matches first, so recycling can never steal a view its own item needs.
        let mut slots: Vec<Option<(F::View, ReuseKind)>> = Vec::with_capacity(items.len());
        for item in &items {
            let retained = if self.reuse_enabled {
                previous.remove_entry(item).map(|(old_item, view)| {
                    if old_item.model().content() != item.model().content() {
                        self.factory.update_content(&view, item.model());
                    }
                    (view, ReuseKind::Retained)
                })
            } else {
                None
            };
            slots.push(retained);
        }

        let mut free: Vec<(VisibleItem, F::View)> = previous.into_iter().collect();
        free.sort_by_key(|(item, _)| item.item_type());
        let mut pools: HashMap<Differentiator, Vec<(VisibleItem, F::View)>> = HashMap::new();
        for (item, view) in free.into_iter().rev() {
            pools
                .entry(item.differentiator().clone())
                .or_default()
                .push((item, view));
        }

        let mut assignments = Vec::with_capacity(items.len());
        for (item, slot) in items.into_iter().zip(slots) {
            let (view, reuse) = match slot {
                Some(retained) => retained,
                None => match pools
                    .get_mut(item.differentiator())
                    .and_then(|pool| pool.pop())
                {
                    Some((old_item, view)) => {
                        assert_eq!(
                            old_item.differentiator(),
                            item.differentiator(),
                            "recycled view has a different differentiator"
                        );
                        self.factory.update_content(&view, item.model());
                        (view, ReuseKind::Recycled)
                    }
                    None => {
                        let view = self.factory.make_view(item.differentiator());
                        self.factory.update_content(&view, item.model());
                        (view, ReuseKind::Created)
                    }
                },
            };
            match reuse {
                ReuseKind::Retained => stats.retained += 1,
                ReuseKind::Recycled => stats.recycled += 1,
                ReuseKind::Created => stats.created += 1,
            }
            assignments.push(ViewAssignment { item, view, reuse });
        }
        stats.released = pools.values().map(Vec::len).sum();

        if self.reuse_enabled {
            self.previous = assignments
                .iter()
                .map(|assignment| (assignment.item.clone(), assignment.view.clone()))
                .collect();
        }

        trace!(
            retained = stats.retained,
            recycled = stats.recycled,
            created = stats.created,
            released = stats.released,
            "assigned views"
        );
        self.last_stats = stats;
        assignments
    }
}

impl<F: ViewFactory + std::fmt::Debug> std::fmt::Debug for ItemViewReuseManager<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemViewReuseManager")
            .field("factory", &self.factory)
            .field("reuse_enabled", &self.reuse_enabled)
            .field("previous", &self.previous.len())
            .field("last_stats", &self.last_stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, Month};
    use crate::view_state::item_model::DefaultModels;
    use crate::view_state::layout_item::LayoutItemType;
    use crate::view_state::types::Rect;
    use crate::view_state::visible_item::VisibleItemType;
    use serde_json::json;

    /// Views are numbered in creation order; every content update is recorded.
    #[derive(Debug, Default)]
    struct CountingFactory {
        created: usize,
        updates: Vec<(usize, ItemModel)>,
    }

    impl ViewFactory for CountingFactory {
        type View = usize;

        fn make_view(&mut self, _differentiator: &Differentiator) -> usize {
            self.created += 1;
            self.created
        }

        fn update_content(&mut self, view: &usize, model: &ItemModel) {
            self.updates.push((*view, model.clone()));
        }
    }

    fn month() -> Month {
        Month::new(2020, 3).unwrap()
    }

    fn day_item(d: u32) -> VisibleItem {
        let day = Day::new(month(), d).unwrap();
        VisibleItem::new(
            DefaultModels::day(day),
            VisibleItemType::Layout {
                item_type: LayoutItemType::day(day),
            },
            Rect::new(0.0, f64::from(d) * 10.0, 10.0, 10.0),
        )
    }

    fn header_item() -> VisibleItem {
        VisibleItem::new(
            DefaultModels::month_header(month()),
            VisibleItemType::Layout {
                item_type: LayoutItemType::month_header(month()),
            },
            Rect::default(),
        )
    }

    #[test]
    fn first_pass_creates_every_view() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        let assignments = manager.assign_views((1..=5).map(day_item));
        assert!(assignments.iter().all(|a| a.reuse == ReuseKind::Created));
        assert_eq!(manager.factory().created, 5);
    }

    #[test]
    fn unchanged_items_keep_their_views_without_updates() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        let first = manager.assign_views((1..=3).map(day_item));
        let updates_after_first = manager.factory().updates.len();

        let second = manager.assign_views((1..=3).map(day_item));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.view, b.view);
            assert_eq!(b.reuse, ReuseKind::Retained);
        }
        assert_eq!(manager.factory().updates.len(), updates_after_first);
    }

    #[test]
    fn scrolled_out_views_are_recycled_for_new_items() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        manager.assign_views((1..=3).map(day_item));
        let second = manager.assign_views((3..=5).map(day_item));

        let kinds: Vec<_> = second.iter().map(|a| a.reuse).collect();
        assert_eq!(
            kinds,
            vec![ReuseKind::Retained, ReuseKind::Recycled, ReuseKind::Recycled]
        );
        assert_eq!(manager.factory().created, 3);
        assert_eq!(
            manager.last_stats(),
            ReuseStats {
                retained: 1,
                recycled: 2,
                created: 0,
                released: 0,
            }
        );
    }

    #[test]
    fn views_never_cross_differentiators() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        manager.assign_views([header_item()]);
        let second = manager.assign_views([day_item(1)]);
        assert_eq!(second[0].reuse, ReuseKind::Created);
        assert_eq!(manager.last_stats().released, 1);
    }

    #[test]
    fn retained_view_gets_changed_content() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        let original = day_item(1);
        manager.assign_views([original.clone()]);

        let changed = VisibleItem::new(
            ItemModel::new(original.differentiator().clone(), json!({ "selected": true })),
            original.item_type(),
            original.frame(),
        );
        let second = manager.assign_views([changed]);
        assert_eq!(second[0].reuse, ReuseKind::Retained);
        let (view, model) = manager.factory().updates.last().unwrap();
        assert_eq!(*view, second[0].view);
        assert_eq!(model.content()["selected"], true);
    }

    #[test]
    fn disabled_reuse_always_creates() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        manager.set_reuse_enabled(false);
        manager.assign_views((1..=3).map(day_item));
        let second = manager.assign_views((1..=3).map(day_item));
        assert!(second.iter().all(|a| !a.was_reused()));
        assert_eq!(manager.factory().created, 6);
    }

    #[test]
    fn assignments_are_in_z_order() {
        let mut manager = ItemViewReuseManager::new(CountingFactory::default());
        let assignments = manager.assign_views([day_item(2), header_item(), day_item(1)]);
        let types: Vec<_> = assignments.iter().map(|a| a.item.item_type()).collect();
        let mut sorted = types.clone();
        sorted.sort();
        assert_eq!(types, sorted);
    }
}
