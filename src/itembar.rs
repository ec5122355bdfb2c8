//! Ordered item sequence of a panel and drag-and-drop index resolution.

use ratatui::prelude::{Direction, Rect};

use crate::error::PanelError;
use crate::layout::{axis_midpoint, project, rect_contains};

#[derive(Debug, Clone)]
struct Slot<I> {
    item: I,
    /// Last extent reported by the UI for this item, in itembar coordinates.
    allocation: Rect,
}

/// Items docked on a panel, in display order along the primary axis.
///
/// Items are identified by equality; if the same value appears twice the
/// first occurrence is the one found by lookups.
#[derive(Debug, Clone)]
pub struct ItemOrder<I> {
    slots: Vec<Slot<I>>,
    orientation: Direction,
}

impl<I: Clone + PartialEq> Default for ItemOrder<I> {
    fn default() -> Self {
        Self::new(Direction::Horizontal)
    }
}

impl<I: Clone + PartialEq> ItemOrder<I> {
    pub fn new(orientation: Direction) -> Self {
        Self {
            slots: Vec::new(),
            orientation,
        }
    }

    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Direction) {
        self.orientation = orientation;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.slots.iter().map(|slot| &slot.item)
    }

    /// Insert `item` at `position`, clamped into `0..=len`. A negative
    /// position appends. Returns the index the item landed on.
    pub fn insert(&mut self, item: I, position: i32) -> usize {
        let index = self.insertion_index(position);
        self.slots.insert(
            index,
            Slot {
                item,
                allocation: Rect::default(),
            },
        );
        index
    }

    pub fn append(&mut self, item: I) -> usize {
        self.insert(item, -1)
    }

    pub fn prepend(&mut self, item: I) -> usize {
        self.insert(item, 0)
    }

    /// Move `item` to `position`, clamped into `0..len`. Every other item
    /// keeps its relative order. Returns the `(from, to)` indices.
    pub fn reorder(&mut self, item: &I, position: i32) -> Result<(usize, usize), PanelError> {
        let from = self.index_of(item).ok_or(PanelError::NotFound)?;
        let slot = self.slots.remove(from);
        let last = self.slots.len() as i64;
        let to = (position as i64).clamp(0, last) as usize;
        self.slots.insert(to, slot);
        Ok((from, to))
    }

    /// Take `item` off the bar, returning the index it occupied.
    pub fn remove(&mut self, item: &I) -> Result<usize, PanelError> {
        let index = self.index_of(item).ok_or(PanelError::NotFound)?;
        self.slots.remove(index);
        Ok(index)
    }

    pub fn index_of(&self, item: &I) -> Option<usize> {
        self.slots.iter().position(|slot| &slot.item == item)
    }

    pub fn nth(&self, n: usize) -> Result<&I, PanelError> {
        self.slots
            .get(n)
            .map(|slot| &slot.item)
            .ok_or(PanelError::OutOfRange {
                index: n,
                len: self.slots.len(),
            })
    }

    /// Record where the UI laid out the item at `index`.
    pub fn set_allocation(&mut self, index: usize, rect: Rect) -> Result<(), PanelError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PanelError::OutOfRange { index, len })?;
        slot.allocation = rect;
        Ok(())
    }

    /// Replace all allocations in display order. Extra rectangles are
    /// ignored; items without one keep their previous extent.
    pub fn set_allocations(&mut self, rects: &[Rect]) {
        for (slot, rect) in self.slots.iter_mut().zip(rects) {
            slot.allocation = *rect;
        }
    }

    pub fn allocation(&self, index: usize) -> Option<Rect> {
        self.slots.get(index).map(|slot| slot.allocation)
    }

    /// Index a dragged item would be inserted at if dropped at `(x, y)`.
    ///
    /// The pointer is projected onto the primary axis and the result is the
    /// first item whose midpoint lies beyond it, or `len()` when the pointer
    /// is past every midpoint. Pure: the same state and coordinates always
    /// give the same answer.
    pub fn drop_index(&self, x: i32, y: i32) -> usize {
        let coord = project(self.orientation, x, y);
        self.slots
            .iter()
            .position(|slot| axis_midpoint(self.orientation, slot.allocation) > coord)
            .unwrap_or(self.slots.len())
    }

    /// Index of the item whose allocation contains `(x, y)`.
    pub fn item_at(&self, x: i32, y: i32) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| rect_contains(slot.allocation, x, y))
    }

    fn insertion_index(&self, position: i32) -> usize {
        let len = self.slots.len();
        if position < 0 {
            len
        } else {
            (position as usize).min(len)
        }
    }
}

impl<I: PartialEq> PartialEq for ItemOrder<I> {
    /// Two bars are equal when they hold the same items in the same order;
    /// layout state is not part of the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.slots.len() == other.slots.len()
            && self
                .slots
                .iter()
                .zip(&other.slots)
                .all(|(a, b)| a.item == b.item)
    }
}
