//! View registry and ordering.
//!
//! Views live in an arena and are threaded onto two circular lists:
//! - draw order, front to back, used for rendering and hit testing
//! - user order, most recent first, used for focus cycling
//!
//! Layer surfaces are only in draw order. Handles carry a generation so a
//! handle to a removed view never resolves to whatever reuses its slot.

use crate::core::window::view::View;
use crate::platform::api::SurfaceId;

/// Generation-checked handle to a view in a [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId {
    index: u32,
    generation: u32,
}

/// The two orderings kept over the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Draw = 0,
    User = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    prev: usize,
    next: usize,
}

#[derive(Debug)]
struct Entry {
    view: View,
    links: [Option<Link>; 2],
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Default)]
pub struct ViewTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    heads: [Option<usize>; 2],
    len: usize,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a view at the front of draw order and, unless it is a layer
    /// surface, at the front of user order.
    pub fn insert(&mut self, view: View) -> ViewId {
        let cyclable = view.kind().is_cyclable();
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        self.slots[index].entry = Some(Entry { view, links: [None, None] });
        self.len += 1;

        self.link_front(Order::Draw, index);
        if cyclable {
            self.link_front(Order::User, index);
        }

        ViewId {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    /// Unlink a view from both orders and hand it back.
    pub fn remove(&mut self, id: ViewId) -> Option<View> {
        let index = self.resolve(id)?;
        self.unlink(Order::Draw, index);
        self.unlink(Order::User, index);

        let slot = &mut self.slots[index];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(entry.view)
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        let index = self.resolve(id)?;
        self.slots[index].entry.as_ref().map(|entry| &entry.view)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        let index = self.resolve(id)?;
        self.slots[index].entry.as_mut().map(|entry| &mut entry.view)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.resolve(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of views in one order.
    pub fn len_of(&self, order: Order) -> usize {
        self.ids(order).len()
    }

    /// The view whose primary surface is `surface`.
    pub fn find_by_surface(&self, surface: SurfaceId) -> Option<ViewId> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            let entry = slot.entry.as_ref()?;
            (entry.view.surface() == Some(surface)).then_some(ViewId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// Move a view to the front of draw order. User order is left alone.
    pub fn raise(&mut self, id: ViewId) {
        let Some(index) = self.resolve(id) else {
            return;
        };
        if self.heads[Order::Draw as usize] == Some(index) {
            return;
        }
        self.unlink(Order::Draw, index);
        self.link_front(Order::Draw, index);
    }

    /// The view before `id` in user order (more recent), wrapping around.
    pub fn cycle_next(&self, id: ViewId) -> Option<ViewId> {
        let index = self.resolve(id)?;
        let link = self.link(Order::User, index)?;
        Some(self.id_at(link.prev))
    }

    /// The view after `id` in user order (older), wrapping around.
    pub fn cycle_prev(&self, id: ViewId) -> Option<ViewId> {
        let index = self.resolve(id)?;
        let link = self.link(Order::User, index)?;
        Some(self.id_at(link.next))
    }

    pub fn front(&self, order: Order) -> Option<ViewId> {
        self.heads[order as usize].map(|index| self.id_at(index))
    }

    /// Every view in `order`, front first.
    pub fn ids(&self, order: Order) -> Vec<ViewId> {
        let mut ids = Vec::new();
        let Some(head) = self.heads[order as usize] else {
            return ids;
        };
        let mut index = head;
        loop {
            ids.push(self.id_at(index));
            match self.link(order, index) {
                Some(link) if link.next != head => index = link.next,
                _ => break,
            }
        }
        ids
    }

    /// Every view in `order`, back first.
    pub fn ids_back_to_front(&self, order: Order) -> Vec<ViewId> {
        let mut ids = self.ids(order);
        ids.reverse();
        ids
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn resolve(&self, id: ViewId) -> Option<usize> {
        let index = id.index as usize;
        let slot = self.slots.get(index)?;
        (slot.generation == id.generation && slot.entry.is_some()).then_some(index)
    }

    fn id_at(&self, index: usize) -> ViewId {
        ViewId {
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    fn link(&self, order: Order, index: usize) -> Option<Link> {
        self.slots[index].entry.as_ref()?.links[order as usize]
    }

    fn set_link(&mut self, order: Order, index: usize, link: Option<Link>) {
        if let Some(entry) = self.slots[index].entry.as_mut() {
            entry.links[order as usize] = link;
        }
    }

    fn update_link(&mut self, order: Order, index: usize, f: impl FnOnce(&mut Link)) {
        if let Some(link) = self.slots[index]
            .entry
            .as_mut()
            .and_then(|entry| entry.links[order as usize].as_mut())
        {
            f(link);
        }
    }

    fn link_front(&mut self, order: Order, index: usize) {
        match self.heads[order as usize] {
            None => {
                self.set_link(order, index, Some(Link { prev: index, next: index }));
            }
            Some(head) => {
                let Some(tail) = self.link(order, head).map(|link| link.prev) else {
                    return;
                };
                self.set_link(order, index, Some(Link { prev: tail, next: head }));
                self.update_link(order, head, |link| link.prev = index);
                self.update_link(order, tail, |link| link.next = index);
            }
        }
        self.heads[order as usize] = Some(index);
    }

    fn unlink(&mut self, order: Order, index: usize) {
        let Some(link) = self.link(order, index) else {
            return;
        };
        if link.next == index {
            self.heads[order as usize] = None;
        } else {
            self.update_link(order, link.prev, |l| l.next = link.next);
            self.update_link(order, link.next, |l| l.prev = link.prev);
            if self.heads[order as usize] == Some(index) {
                self.heads[order as usize] = Some(link.next);
            }
        }
        self.set_link(order, index, None);
    }
}
