//! Arena Module
//!
//! Slot storage with doubly-linked lists threaded through slot indices.
//! Both cache tiers keep their orderings here, giving O(1) append,
//! arbitrary unlink and move-to-back without a heap node per entry.

// == Node ==
#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == List ==
/// Handle to one linked list living inside an [`Arena`].
///
/// - Front = oldest link
/// - Back = newest link
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct List {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl List {
    /// Creates an empty list handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the oldest link.
    pub fn front(&self) -> Option<usize> {
        self.head
    }

    /// Index of the newest link.
    #[allow(dead_code)]
    pub fn back(&self) -> Option<usize> {
        self.tail
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// == Arena ==
/// Vector of reusable slots. Vacated slots go on a free list and are
/// handed out again by the next insert.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    // == Constructor ==
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Creates an arena with room for `capacity` slots before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    // == Insert ==
    /// Stores a value in a free slot and returns its index. The slot is not
    /// linked into any list yet.
    pub fn insert(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    // == Remove ==
    /// Vacates a slot and returns its value. The slot must already be
    /// unlinked from its list.
    pub fn remove(&mut self, idx: usize) -> T {
        let node = self.slots[idx].take().expect("arena slot is vacant");
        debug_assert!(node.prev.is_none() && node.next.is_none());
        self.free.push(idx);
        node.value
    }

    // == Access ==
    pub fn get(&self, idx: usize) -> &T {
        &self.node(idx).value
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut T {
        &mut self.node_mut(idx).value
    }

    /// Number of occupied slots.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Linking ==
    /// Appends an unlinked slot at the back of `list`.
    pub fn push_back(&mut self, list: &mut List, idx: usize) {
        let tail = list.tail;
        {
            let node = self.node_mut(idx);
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(t) => self.node_mut(t).next = Some(idx),
            None => list.head = Some(idx),
        }
        list.tail = Some(idx);
        list.len += 1;
    }

    /// Detaches a slot from `list`, leaving the slot occupied.
    pub fn unlink(&mut self, list: &mut List, idx: usize) {
        let (prev, next) = {
            let node = self.node_mut(idx);
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => list.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => list.tail = prev,
        }
        list.len -= 1;
    }

    /// Moves a linked slot to the back of its list.
    pub fn move_to_back(&mut self, list: &mut List, idx: usize) {
        if list.tail == Some(idx) {
            return;
        }
        self.unlink(list, idx);
        self.push_back(list, idx);
    }

    /// Walks `list` from front (oldest) to back (newest).
    pub fn iter<'a>(&'a self, list: &List) -> impl Iterator<Item = &'a T> + 'a {
        let mut cursor = list.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = self.node(idx);
            cursor = node.next;
            Some(&node.value)
        })
    }

    fn node(&self, idx: usize) -> &Node<T> {
        self.slots[idx].as_ref().expect("arena slot is vacant")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        self.slots[idx].as_mut().expect("arena slot is vacant")
    }
}
