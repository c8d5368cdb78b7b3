//! Recency list for the range cache.
//!
//! A doubly linked list whose nodes live in a [`SlotArena`]; callers hold the
//! returned `SlotId` and can unlink or promote that node in O(1). Front is
//! most recently used, back is the eviction candidate.
//!
//! ```text
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!            MRU                       LRU
//! ```
//!
//! Scans (`iter`, `iter_entries`, `position`) are O(n).

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Link<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
pub struct IntrusiveList<T> {
    links: SlotArena<Link<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Least recently used value.
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|id| &self.links[id].value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.links.get(id).map(|link| &link.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        if !self.links.contains(id) {
            return None;
        }
        Some(&mut self.links[id].value)
    }

    /// Values from front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.iter_entries().map(|(_, value)| value)
    }

    /// `(SlotId, &T)` pairs from front to back.
    pub fn iter_entries(&self) -> Entries<'_, T> {
        Entries {
            links: &self.links,
            cursor: self.head,
        }
    }

    /// Distance of `id` from the front.
    pub fn position(&self, id: SlotId) -> Option<usize> {
        self.iter_entries().position(|(candidate, _)| candidate == id)
    }

    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.links.insert(Link {
            value,
            prev: None,
            next: None,
        });
        self.link_front(id);
        id
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.links.contains(id) {
            return None;
        }
        self.unlink(id);
        self.links.remove(id).map(|link| link.value)
    }

    /// Promotes `id` to the front; `false` if it is not in the list.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.links.contains(id) {
            return false;
        }
        if self.head != Some(id) {
            self.unlink(id);
            self.link_front(id);
        }
        true
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.tail = None;
    }

    /// Detaches a live node from its neighbours; the slot stays occupied.
    fn unlink(&mut self, id: SlotId) {
        let Link { prev, next, .. } = self.links[id];
        match prev {
            Some(p) => self.links[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.links[n].prev = prev,
            None => self.tail = prev,
        }
        let link = &mut self.links[id];
        link.prev = None;
        link.next = None;
    }

    /// Attaches a detached live node at the head.
    fn link_front(&mut self, id: SlotId) {
        self.links[id].next = self.head;
        match self.head {
            Some(old) => self.links[old].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Walks head to tail checking back links, the tail pointer and the
    /// node count.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut expected_prev = None;
        let mut cursor = self.head;
        let mut seen = 0usize;

        while let Some(id) = cursor {
            seen += 1;
            if seen > self.len() {
                return Err(InvariantError::new("cycle in list links"));
            }
            let link = self
                .links
                .get(id)
                .ok_or_else(|| InvariantError::new("list link points at a vacant slot"))?;
            if link.prev != expected_prev {
                return Err(InvariantError::new(format!(
                    "node {} has a stale prev link",
                    id.index()
                )));
            }
            expected_prev = Some(id);
            cursor = link.next;
        }

        if self.tail != expected_prev {
            return Err(InvariantError::new("tail is not the last reachable node"));
        }
        if seen != self.len() {
            return Err(InvariantError::new(format!(
                "{} nodes reachable but {} allocated",
                seen,
                self.len()
            )));
        }
        Ok(())
    }
}

/// Iterator over `(SlotId, &T)` from front to back.
pub struct Entries<'a, T> {
    links: &'a SlotArena<Link<T>>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let link = self.links.get(id)?;
        self.cursor = link.next;
        Some((id, &link.value))
    }
}
