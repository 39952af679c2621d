use alloc::vec::Vec;

use crate::{Emitter, ListenerId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavItem {
    pub index: usize,
    pub selected: bool,
}

/// A pager with one item per slide.
///
/// Activating an item emits a "choose" event carrying its index. A carousel that owns the
/// nav answers it by moving to that slide.
#[derive(Debug, Default)]
pub struct Nav {
    items: Vec<NavItem>,
    choose: Emitter<usize>,
    /// Latest activation not yet answered by the owning carousel.
    chosen: Option<usize>,
}

impl Nav {
    pub fn new(count: usize) -> Self {
        let mut nav = Self::default();
        nav.update(count);
        nav
    }

    /// Rebuilds the item list. Clears the selection.
    pub fn update(&mut self, count: usize) {
        self.items.clear();
        self.items.extend((0..count).map(|index| NavItem {
            index,
            selected: false,
        }));
    }

    /// Marks `index` as the only selected item. Out-of-range indexes clear the selection.
    pub fn set_selected(&mut self, index: usize) {
        for item in self.items.iter_mut() {
            item.selected = item.index == index;
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.items.iter().find(|it| it.selected).map(|it| it.index)
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn on_choose(&mut self, listener: impl FnMut(&usize) + 'static) -> ListenerId {
        self.choose.subscribe(listener)
    }

    pub fn off_choose(&mut self, id: ListenerId) -> bool {
        self.choose.unsubscribe(id)
    }

    /// Activates the item at `index`, emitting "choose". Returns `false` for unknown items.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.chosen = Some(index);
        self.choose.emit(&index);
        true
    }

    /// Takes the latest activation, if any.
    pub(crate) fn take_chosen(&mut self) -> Option<usize> {
        self.chosen.take()
    }

    /// Drops every listener and item.
    pub fn destroy(&mut self) {
        self.choose.clear();
        self.items.clear();
        self.chosen = None;
    }
}
