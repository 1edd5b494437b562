use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;

/// Slot index plus the generation it was issued under.
///
/// The default id is null: its index is `usize::MAX`, which no arena slot
/// ever reaches, so it never resolves to a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GenerationalId {
    pub index: usize,
    pub generation: u32,
}

impl GenerationalId {
    pub const NULL: Self = Self {
        index: usize::MAX,
        generation: 0,
    };

    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn is_null(&self) -> bool {
        self.index == usize::MAX
    }
}

impl Default for GenerationalId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for GenerationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Converts between a typed handle and the raw arena id.
pub trait ArenaHandle: Copy {
    fn from_id(id: GenerationalId) -> Self;
    fn id(&self) -> GenerationalId;
}

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(Serialize, Deserialize)]
        pub struct $name(pub GenerationalId);

        impl $name {
            pub fn index(&self) -> usize {
                self.0.index
            }

            pub fn generation(&self) -> u32 {
                self.0.generation
            }

            pub fn is_null(&self) -> bool {
                self.0.is_null()
            }
        }

        impl ArenaHandle for $name {
            fn from_id(id: GenerationalId) -> Self {
                Self(id)
            }

            fn id(&self) -> GenerationalId {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_handle!(
    /// Stable handle to a rigid body registered in a [`crate::PhysicsWorld`].
    BodyHandle
);

arena_handle!(
    /// Stable handle to a constraint registered in a [`crate::PhysicsWorld`].
    ConstraintHandle
);

/// Generational arena that hands out stable handles while rejecting stale ones.
///
/// Iteration always walks slots in index order, which keeps every pass over the
/// arena deterministic regardless of how the free list was populated.
pub struct Arena<T, H = BodyHandle> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
    len: usize,
    _handle: PhantomData<H>,
}

impl<T, H: ArenaHandle> Default for Arena<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: ArenaHandle> Arena<T, H> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
            len: 0,
            _handle: PhantomData,
        }
    }

    pub fn insert(&mut self, item: T) -> H {
        self.len += 1;
        if let Some(index) = self.free_list.pop_front() {
            let generation = self.generations[index];
            self.items[index] = Some(item);
            return H::from_id(GenerationalId::new(index, generation));
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        H::from_id(GenerationalId::new(index, 0))
    }

    pub fn contains(&self, handle: H) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        let id = handle.id();
        if self.is_current(id) {
            self.items.get(id.index).and_then(|slot| slot.as_ref())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        let id = handle.id();
        if self.is_current(id) {
            self.items.get_mut(id.index).and_then(|slot| slot.as_mut())
        } else {
            None
        }
    }

    /// Borrows two distinct entries mutably at once, preserving argument order.
    pub fn get2_mut(&mut self, handle_a: H, handle_b: H) -> Option<(&mut T, &mut T)> {
        let (id_a, id_b) = (handle_a.id(), handle_b.id());
        if id_a.index == id_b.index {
            return None;
        }
        if !self.is_current(id_a) || !self.is_current(id_b) {
            return None;
        }

        let (first, second, flipped) = if id_a.index < id_b.index {
            (id_a.index, id_b.index, false)
        } else {
            (id_b.index, id_a.index, true)
        };

        let (left, right) = self.items.split_at_mut(second);
        let first_slot = left.get_mut(first).and_then(|slot| slot.as_mut())?;
        let second_slot = right.get_mut(0).and_then(|slot| slot.as_mut())?;

        if flipped {
            Some((second_slot, first_slot))
        } else {
            Some((first_slot, second_slot))
        }
    }

    pub fn remove(&mut self, handle: H) -> Option<T> {
        let id = handle.id();
        if !self.is_current(id) {
            return None;
        }
        let item = self.items.get_mut(id.index)?.take()?;
        self.generations[id.index] = self.generations[id.index].wrapping_add(1);
        self.free_list.push_back(id.index);
        self.len -= 1;
        Some(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.items.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref().map(|item| {
                (
                    H::from_id(GenerationalId::new(index, self.generations[index])),
                    item,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> + '_ {
        let generations = &self.generations;
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, slot)| {
                slot.as_mut().map(|item| {
                    (
                        H::from_id(GenerationalId::new(index, generations[index])),
                        item,
                    )
                })
            })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_current(&self, id: GenerationalId) -> bool {
        self.generations
            .get(id.index)
            .is_some_and(|generation| *generation == id.generation)
    }
}
