//! Arena of reusable slots addressed by `SlotId`.
//!
//! Vacant slots form a free chain threaded through the slots themselves, so
//! a removed slot is handed out again by the next insert. A `SlotId` is only
//! meaningful until its value is removed. Both cache policies link their
//! nodes through `SlotId`s instead of pointers.
//!
//! ```text
//!   slots: [ Occupied(a) | Vacant(next: 3) | Occupied(b) | Vacant(next: -) ]
//!                              ▲
//!                         free_head
//! ```

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    occupied: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            occupied: 0,
        }
    }

    /// Stores `value`, reusing the most recently vacated slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.occupied += 1;
        match self.free_head {
            Some(idx) => {
                let previous = std::mem::replace(&mut self.slots[idx], Slot::Occupied(value));
                if let Slot::Vacant { next_free } = previous {
                    self.free_head = next_free;
                }
                SlotId(idx)
            },
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Takes the value out of `id`; `None` if the slot is already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let vacated = std::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(id.0);
        self.occupied -= 1;
        match vacated {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Drops every value; previously issued ids become invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.occupied = 0;
    }
}

/// Panics if `id` names a vacant slot.
impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(value)) => value,
            _ => panic!("slot {} is not occupied", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(value)) => value,
            _ => panic!("slot {} is not occupied", id.0),
        }
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
