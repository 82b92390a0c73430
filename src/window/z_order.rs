//! Stacking order over open windows.
//!
//! The most recently focused window carries the numerically highest
//! `z_index`. Bringing a window to front bumps it to `max + 1` and leaves
//! every other index alone; [`normalize`] compacts indices back to `1..=n`
//! without changing the relative order. Equal indices never occur under
//! correct use, but if they do the earlier-created window paints below.

use super::WindowEntity;

/// Anything that can be stacked.
pub trait Stacked {
    fn z_index(&self) -> u32;
    fn set_z_index(&mut self, z: u32);
    fn creation_order(&self) -> u64;
    fn is_minimized(&self) -> bool;
}

impl<C> Stacked for WindowEntity<C> {
    fn z_index(&self) -> u32 {
        self.z_index
    }

    fn set_z_index(&mut self, z: u32) {
        self.z_index = z;
    }

    fn creation_order(&self) -> u64 {
        self.creation_order
    }

    fn is_minimized(&self) -> bool {
        self.minimized
    }
}

/// The index a newly stacked item should receive to land on top.
pub fn next_z<T: Stacked>(items: &[T]) -> u32 {
    items
        .iter()
        .map(Stacked::z_index)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Like [`next_z`], but first compacts the stack if the top index is
/// already `u32::MAX`, so the new top never ties with the old one.
pub fn claim_top<T: Stacked>(items: &mut [T]) -> u32 {
    if items.iter().any(|item| item.z_index() == u32::MAX) {
        tracing::debug!(count = items.len(), "z-index space exhausted, compacting");
        normalize(items);
    }
    next_z(items)
}

/// Move `items[index]` to the top. Returns `false` when it already was the
/// unique topmost item, in which case nothing changes.
pub fn bring_to_front<T: Stacked>(items: &mut [T], index: usize) -> bool {
    let Some(target) = items.get(index) else {
        return false;
    };
    let z = target.z_index();
    let already_top = items
        .iter()
        .enumerate()
        .all(|(i, item)| i == index || item.z_index() < z);
    if already_top {
        return false;
    }
    let top = claim_top(items);
    items[index].set_z_index(top);
    true
}

/// Indices of `items` from bottom to top.
pub fn stacking_order<T: Stacked>(items: &[T]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| (items[i].z_index(), items[i].creation_order()));
    order
}

/// Reassign `1..=n` following the current stacking order.
pub fn normalize<T: Stacked>(items: &mut [T]) {
    for (rank, index) in stacking_order(items).into_iter().enumerate() {
        items[index].set_z_index(rank as u32 + 1);
    }
}

/// The highest non-minimized item, if any.
pub fn topmost_visible<T: Stacked>(items: &[T]) -> Option<usize> {
    stacking_order(items)
        .into_iter()
        .rev()
        .find(|&i| !items[i].is_minimized())
}
