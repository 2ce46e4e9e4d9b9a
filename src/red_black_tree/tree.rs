use crate::arena::{Arena, Slot};
use crate::red_black_tree::cursor::{CursorMut, Direction, IntoIter, Iter};
use crate::red_black_tree::node::{Color, Node};
use crate::red_black_tree::{Error, Result};
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::result;

/// An ordered container implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree that colors each node red or black
/// and maintains two invariants: no red node has a red child, and every path from the root to a
/// leaf passes through the same number of black nodes. Together they keep the longest path from
/// the root within twice the shortest, so lookups, insertions, and deletions are logarithmic.
///
/// Every path ends in a black sentinel leaf and the root hangs from a permanent anchor sentinel,
/// so the rebalancing logic never special-cases missing children or a missing parent. Nodes live
/// in an arena and link to each other by slot; the parent link is a non-owning back-reference.
///
/// Elements are removed through a cursor obtained from [`cursor`](RedBlackTree::cursor) or
/// [`cursor_rev`](RedBlackTree::cursor_rev), which can delete the element it last yielded.
///
/// # Examples
///
/// ```
/// use ordered_collections::red_black_tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(2).unwrap();
/// tree.insert(1).unwrap();
/// tree.insert(3).unwrap();
///
/// assert_eq!(tree.len(), 3);
/// assert!(tree.contains(&2));
/// assert_eq!(tree.min(), Ok(&1));
/// assert_eq!(tree.max(), Ok(&3));
///
/// let mut cursor = tree.cursor();
/// while cursor.has_next() {
///     if *cursor.next().unwrap() < 2 {
///         cursor.remove().unwrap();
///     }
/// }
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&2, &3]);
/// ```
pub struct RedBlackTree<T> {
    pub(crate) arena: Arena<Node<T>>,
    pub(crate) anchor: Slot,
    pub(crate) root: Slot,
    len: usize,
}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// ```
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let anchor = arena.allocate_with(|slot| Node::sentinel(slot, slot));
        let root = arena.allocate_with(|slot| Node::sentinel(slot, anchor));
        arena[anchor].left = root;
        arena[anchor].right = root;
        RedBlackTree {
            arena,
            anchor,
            root,
            len: 0,
        }
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the tree, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        let anchor = self.arena.allocate_with(|slot| Node::sentinel(slot, slot));
        let root = self.arena.allocate_with(|slot| Node::sentinel(slot, anchor));
        self.arena[anchor].left = root;
        self.arena[anchor].right = root;
        self.anchor = anchor;
        self.root = root;
        self.len = 0;
    }

    pub(crate) fn is_real(&self, slot: Slot) -> bool {
        !self.arena[slot].is_sentinel()
    }

    fn is_red(&self, slot: Slot) -> bool {
        self.arena[slot].color == Color::Red
    }

    fn alloc_sentinel(&mut self, parent: Slot) -> Slot {
        self.arena.allocate_with(|slot| Node::sentinel(slot, parent))
    }

    /// Binary search from the root. Returns the slot holding an equal value, or the sentinel
    /// leaf the search ended at.
    fn find<V>(&self, value: &V) -> Slot
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        loop {
            let node = &self.arena[curr];
            let curr_value = match node.value {
                Some(ref curr_value) => curr_value,
                None => return curr,
            };
            match value.cmp(curr_value.borrow()) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return curr,
            }
        }
    }

    /// Checks if a value exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// assert!(!tree.contains(&0));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn contains<V>(&self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.is_real(self.find(value))
    }

    /// Inserts a value into the tree. Returns `Err(Error::DuplicateElement)` without mutating
    /// the tree if an equal value is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::{Error, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.insert(1), Ok(()));
    /// assert_eq!(tree.insert(1), Err(Error::DuplicateElement));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<()>
    where
        T: Ord,
    {
        let slot = self.find(&value);
        if self.is_real(slot) {
            return Err(Error::DuplicateElement);
        }

        // The search ended at a sentinel leaf: it becomes a red node in place, keeping the
        // parent link it already carries, and grows two fresh sentinel children.
        let left = self.alloc_sentinel(slot);
        let right = self.alloc_sentinel(slot);
        let node = &mut self.arena[slot];
        node.value = Some(value);
        node.color = Color::Red;
        node.left = left;
        node.right = right;
        self.len += 1;

        self.repair_insert(slot);
        Ok(())
    }

    /// Restores the red black invariants after an insertion by walking from the new red node
    /// toward the root. The red-uncle case recolors and ascends two levels; the black-uncle
    /// cases rotate an inner grandchild outward, then rotate at the grandparent and stop.
    fn repair_insert(&mut self, inserted: Slot) {
        let mut curr = inserted;
        while self.is_red(self.arena[curr].parent) {
            let parent = self.arena[curr].parent;
            let grandparent = self.arena[parent].parent;
            if parent == self.arena[grandparent].left {
                let uncle = self.arena[grandparent].right;
                if self.is_red(uncle) {
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    curr = grandparent;
                } else {
                    if curr == self.arena[parent].right {
                        curr = parent;
                        self.rotate_left(curr);
                    }
                    let parent = self.arena[curr].parent;
                    let grandparent = self.arena[parent].parent;
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.arena[grandparent].left;
                if self.is_red(uncle) {
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    curr = grandparent;
                } else {
                    if curr == self.arena[parent].left {
                        curr = parent;
                        self.rotate_right(curr);
                    }
                    let parent = self.arena[curr].parent;
                    let grandparent = self.arena[parent].parent;
                    self.arena[parent].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        let root = self.root;
        self.arena[root].color = Color::Black;
    }

    /// Promotes `slot`'s right child above it, transferring the child's left subtree and
    /// rewiring the three affected parent links. Rotating the root rewires the anchor.
    fn rotate_left(&mut self, slot: Slot) {
        let child = self.arena[slot].right;
        let grandchild = self.arena[child].left;

        self.arena[slot].right = grandchild;
        self.arena[grandchild].parent = slot;

        let parent = self.arena[slot].parent;
        self.arena[child].parent = parent;
        if parent == self.anchor {
            self.arena[parent].left = child;
            self.arena[parent].right = child;
            self.root = child;
        } else if self.arena[parent].left == slot {
            self.arena[parent].left = child;
        } else {
            self.arena[parent].right = child;
        }

        self.arena[child].left = slot;
        self.arena[slot].parent = child;
    }

    /// Mirror image of [`rotate_left`](RedBlackTree::rotate_left).
    fn rotate_right(&mut self, slot: Slot) {
        let child = self.arena[slot].left;
        let grandchild = self.arena[child].right;

        self.arena[slot].left = grandchild;
        self.arena[grandchild].parent = slot;

        let parent = self.arena[slot].parent;
        self.arena[child].parent = parent;
        if parent == self.anchor {
            self.arena[parent].left = child;
            self.arena[parent].right = child;
            self.root = child;
        } else if self.arena[parent].left == slot {
            self.arena[parent].left = child;
        } else {
            self.arena[parent].right = child;
        }

        self.arena[child].right = slot;
        self.arena[slot].parent = child;
    }

    /// Removes the node in `slot` and returns its value, together with the slot of the in-order
    /// successor node when that node was the one physically spliced out. A node with two real
    /// children keeps its identity: it takes over its successor's value and the successor, which
    /// has no real left child, is spliced instead.
    pub(crate) fn delete(&mut self, slot: Slot) -> (T, Option<Slot>) {
        let left = self.arena[slot].left;
        let right = self.arena[slot].right;
        if self.is_real(left) && self.is_real(right) {
            let successor = self.first(right);
            let moved = self.arena[successor].value.take();
            let removed = mem::replace(&mut self.arena[slot].value, moved);
            self.arena[successor].value = removed;
            (self.splice_out(successor), Some(successor))
        } else {
            (self.splice_out(slot), None)
        }
    }

    /// Splices out a node with at most one real child, replacing it in its parent slot with
    /// that child or with a fresh sentinel. Removing a black node shortens the path through the
    /// replacement, so the repair walk starts there.
    fn splice_out(&mut self, slot: Slot) -> T {
        let parent = self.arena[slot].parent;
        let was_black = self.arena[slot].color == Color::Black;
        let left = self.arena[slot].left;
        let right = self.arena[slot].right;

        let replacement = if self.is_real(left) {
            self.arena.free(right);
            self.arena[left].parent = parent;
            left
        } else if self.is_real(right) {
            self.arena.free(left);
            self.arena[right].parent = parent;
            right
        } else {
            self.arena.free(left);
            self.arena.free(right);
            self.alloc_sentinel(parent)
        };

        if parent == self.anchor {
            self.arena[parent].left = replacement;
            self.arena[parent].right = replacement;
            self.root = replacement;
        } else if self.arena[parent].left == slot {
            self.arena[parent].left = replacement;
        } else {
            self.arena[parent].right = replacement;
        }

        let node = self.arena.free(slot);
        self.len -= 1;

        if was_black {
            self.repair_delete(replacement);
        }
        node.value.expect("Expected a non-sentinel node.")
    }

    /// Restores the black-height invariant after a black node's removal left `spliced` one
    /// black short. A red node absorbs the deficit by turning black; otherwise the sibling
    /// cases recolor and rotate, propagating the deficit upward only when the sibling and both
    /// of its children are black.
    fn repair_delete(&mut self, spliced: Slot) {
        let mut curr = spliced;
        while curr != self.root && !self.is_red(curr) {
            let parent = self.arena[curr].parent;
            if curr == self.arena[parent].left {
                let mut sibling = self.arena[parent].right;
                if self.is_red(sibling) {
                    self.arena[sibling].color = Color::Black;
                    self.arena[parent].color = Color::Red;
                    self.rotate_left(parent);
                    sibling = self.arena[parent].right;
                }
                let near = self.arena[sibling].left;
                let far = self.arena[sibling].right;
                if !self.is_red(near) && !self.is_red(far) {
                    self.arena[sibling].color = Color::Red;
                    curr = parent;
                } else {
                    if !self.is_red(far) {
                        self.arena[near].color = Color::Black;
                        self.arena[sibling].color = Color::Red;
                        self.rotate_right(sibling);
                        sibling = self.arena[parent].right;
                    }
                    self.arena[sibling].color = self.arena[parent].color;
                    self.arena[parent].color = Color::Black;
                    let far = self.arena[sibling].right;
                    self.arena[far].color = Color::Black;
                    self.rotate_left(parent);
                    curr = self.root;
                }
            } else {
                let mut sibling = self.arena[parent].left;
                if self.is_red(sibling) {
                    self.arena[sibling].color = Color::Black;
                    self.arena[parent].color = Color::Red;
                    self.rotate_right(parent);
                    sibling = self.arena[parent].left;
                }
                let near = self.arena[sibling].right;
                let far = self.arena[sibling].left;
                if !self.is_red(near) && !self.is_red(far) {
                    self.arena[sibling].color = Color::Red;
                    curr = parent;
                } else {
                    if !self.is_red(far) {
                        self.arena[near].color = Color::Black;
                        self.arena[sibling].color = Color::Red;
                        self.rotate_left(sibling);
                        sibling = self.arena[parent].left;
                    }
                    self.arena[sibling].color = self.arena[parent].color;
                    self.arena[parent].color = Color::Black;
                    let far = self.arena[sibling].left;
                    self.arena[far].color = Color::Black;
                    self.rotate_right(parent);
                    curr = self.root;
                }
            }
        }
        self.arena[curr].color = Color::Black;
    }

    /// Leftmost real descendant of `from`. `from` must be a real node.
    pub(crate) fn first(&self, from: Slot) -> Slot {
        let mut curr = from;
        while self.is_real(self.arena[curr].left) {
            curr = self.arena[curr].left;
        }
        curr
    }

    /// Rightmost real descendant of `from`. `from` must be a real node.
    pub(crate) fn last(&self, from: Slot) -> Slot {
        let mut curr = from;
        while self.is_real(self.arena[curr].right) {
            curr = self.arena[curr].right;
        }
        curr
    }

    /// In-order successor of the node in `slot`: the leftmost node of the right subtree when
    /// one exists, otherwise the first ancestor reached from a left-child edge.
    pub(crate) fn successor(&self, slot: Slot) -> Option<Slot> {
        if self.is_real(self.arena[slot].right) {
            return Some(self.first(self.arena[slot].right));
        }
        let mut curr = slot;
        let mut parent = self.arena[curr].parent;
        while parent != self.anchor && curr == self.arena[parent].right {
            curr = parent;
            parent = self.arena[curr].parent;
        }
        if parent == self.anchor {
            None
        } else {
            Some(parent)
        }
    }

    /// In-order predecessor of the node in `slot`. Mirror image of
    /// [`successor`](RedBlackTree::successor).
    pub(crate) fn predecessor(&self, slot: Slot) -> Option<Slot> {
        if self.is_real(self.arena[slot].left) {
            return Some(self.last(self.arena[slot].left));
        }
        let mut curr = slot;
        let mut parent = self.arena[curr].parent;
        while parent != self.anchor && curr == self.arena[parent].left {
            curr = parent;
            parent = self.arena[curr].parent;
        }
        if parent == self.anchor {
            None
        } else {
            Some(parent)
        }
    }

    pub(crate) fn value(&self, slot: Slot) -> &T {
        self.arena[slot]
            .value
            .as_ref()
            .expect("Expected a non-sentinel node.")
    }

    /// Returns the minimum element of the tree, or `Err(Error::EmptyTree)` if the tree is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::{Error, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.min(), Err(Error::EmptyTree));
    /// tree.insert(3).unwrap();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.value(self.first(self.root)))
    }

    /// Returns the maximum element of the tree, or `Err(Error::EmptyTree)` if the tree is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::{Error, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.max(), Err(Error::EmptyTree));
    /// tree.insert(3).unwrap();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.max(), Ok(&3));
    /// ```
    pub fn max(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.value(self.last(self.root)))
    }

    /// Returns the number of black nodes on the path from the root to the leftmost sentinel
    /// leaf, not counting the sentinel. Every root-to-sentinel path passes through the same
    /// number of black nodes, so the choice of path is immaterial. Returns 0 for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.black_height(), 0);
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.black_height(), 1);
    /// ```
    pub fn black_height(&self) -> usize {
        let mut height = 0;
        let mut curr = self.root;
        while self.is_real(curr) {
            if self.arena[curr].color == Color::Black {
                height += 1;
            }
            curr = self.arena[curr].left;
        }
        height
    }

    /// Returns a read-only view of the root node, or `None` if the tree is empty. External
    /// consumers such as renderers can walk the structure through the view but cannot mutate
    /// the tree through it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::{Color, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.value(), &1);
    /// assert_eq!(root.color(), Color::Black);
    /// assert!(root.left().is_none());
    /// ```
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        if self.is_real(self.root) {
            Some(NodeRef {
                tree: self,
                slot: self.root,
            })
        } else {
            None
        }
    }

    /// Returns an iterator over the tree. The iterator yields elements in ascending order and
    /// can be reversed to yield them in descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(3).unwrap();
    ///
    /// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &3]);
    /// assert_eq!(tree.iter().rev().collect::<Vec<&u32>>(), vec![&3, &1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns a cursor that yields elements in ascending order and can remove the element it
    /// most recently yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    ///
    /// let mut cursor = tree.cursor();
    /// assert_eq!(cursor.next(), Ok(&1));
    /// assert_eq!(cursor.remove(), Ok(1));
    /// assert_eq!(cursor.next(), Ok(&2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn cursor(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, Direction::Forward)
    }

    /// Returns a cursor that yields elements in descending order and can remove the element it
    /// most recently yielded.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1).unwrap();
    /// tree.insert(2).unwrap();
    ///
    /// let mut cursor = tree.cursor_rev();
    /// assert_eq!(cursor.next(), Ok(&2));
    /// assert_eq!(cursor.next(), Ok(&1));
    /// assert!(!cursor.has_next());
    /// ```
    pub fn cursor_rev(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, Direction::Reverse)
    }
}

impl<T> IntoIterator for RedBlackTree<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for RedBlackTree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackTree<T> where T: Eq {}

impl<T> Serialize for RedBlackTree<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T> Deserialize<'de> for RedBlackTree<T>
where
    T: Ord + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SeqVisitor<T> {
            marker: PhantomData<T>,
        }

        impl<'de, T> Visitor<'de> for SeqVisitor<T>
        where
            T: Ord + Deserialize<'de>,
        {
            type Value = RedBlackTree<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a sequence of distinct elements")
            }

            fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut tree = RedBlackTree::new();
                while let Some(value) = seq.next_element()? {
                    tree.insert(value)
                        .map_err(|_| de::Error::custom("duplicate element"))?;
                }
                Ok(tree)
            }
        }

        deserializer.deserialize_seq(SeqVisitor {
            marker: PhantomData,
        })
    }
}

/// An immutable view of a node of a red black tree.
///
/// A view exposes the node's value, color, and children, which is enough for an external
/// renderer to draw the tree. It borrows the tree immutably and owns no tree state.
pub struct NodeRef<'a, T> {
    tree: &'a RedBlackTree<T>,
    slot: Slot,
}

impl<'a, T> NodeRef<'a, T> {
    /// Returns the value stored in this node.
    pub fn value(&self) -> &'a T {
        self.tree.value(self.slot)
    }

    /// Returns the color of this node.
    pub fn color(&self) -> Color {
        self.tree.arena[self.slot].color
    }

    /// Returns a view of the left child, or `None` if the left child is a sentinel leaf.
    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        let left = self.tree.arena[self.slot].left;
        if self.tree.is_real(left) {
            Some(NodeRef {
                tree: self.tree,
                slot: left,
            })
        } else {
            None
        }
    }

    /// Returns a view of the right child, or `None` if the right child is a sentinel leaf.
    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        let right = self.tree.arena[self.slot].right;
        if self.tree.is_real(right) {
            Some(NodeRef {
                tree: self.tree,
                slot: right,
            })
        } else {
            None
        }
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}

#[cfg(test)]
mod tests {
    use super::RedBlackTree;
    use crate::arena::Slot;
    use crate::red_black_tree::node::Color;
    use crate::red_black_tree::Error;

    fn check_node<T>(tree: &RedBlackTree<T>, slot: Slot, parent: Slot) -> usize
    where
        T: Ord,
    {
        let node = &tree.arena[slot];
        assert_eq!(node.parent, parent);
        if node.is_sentinel() {
            assert_eq!(node.color, Color::Black);
            return 0;
        }
        if node.color == Color::Red {
            assert_eq!(tree.arena[node.left].color, Color::Black);
            assert_eq!(tree.arena[node.right].color, Color::Black);
        }
        let left_height = check_node(tree, node.left, slot);
        let right_height = check_node(tree, node.right, slot);
        assert_eq!(left_height, right_height);
        left_height + (node.color == Color::Black) as usize
    }

    fn check_invariants<T>(tree: &RedBlackTree<T>) -> usize
    where
        T: Ord,
    {
        assert_eq!(tree.arena[tree.root].color, Color::Black);
        assert_eq!(tree.arena[tree.anchor].left, tree.root);
        assert_eq!(tree.arena[tree.anchor].right, tree.root);
        let height = check_node(tree, tree.root, tree.anchor);
        assert_eq!(height, tree.black_height());

        let values: Vec<&T> = tree.iter().collect();
        assert_eq!(values.len(), tree.len());
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        height
    }

    #[test]
    fn test_len_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.min(), Err(Error::EmptyTree));
        assert_eq!(tree.max(), Err(Error::EmptyTree));
    }

    #[test]
    fn test_black_height_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.black_height(), 0);
    }

    #[test]
    fn test_insert() {
        let mut tree = RedBlackTree::new();
        assert_eq!(tree.insert(1), Ok(()));
        assert!(tree.contains(&1));
        assert_eq!(tree.len(), 1);
        check_invariants(&tree);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = RedBlackTree::new();
        for value in &[2, 1, 3] {
            tree.insert(*value).unwrap();
        }
        let before: Vec<u32> = tree.iter().cloned().collect();
        let height = check_invariants(&tree);

        assert_eq!(tree.insert(2), Err(Error::DuplicateElement));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), before);
        assert_eq!(check_invariants(&tree), height);
    }

    #[test]
    fn test_insert_ascending() {
        let mut tree = RedBlackTree::new();
        for value in 0..64 {
            tree.insert(value).unwrap();
            check_invariants(&tree);
        }
        assert_eq!(tree.len(), 64);
        assert_eq!(tree.min(), Ok(&0));
        assert_eq!(tree.max(), Ok(&63));
    }

    #[test]
    fn test_insert_descending() {
        let mut tree = RedBlackTree::new();
        for value in (0..64).rev() {
            tree.insert(value).unwrap();
            check_invariants(&tree);
        }
        assert_eq!(tree.len(), 64);
        assert_eq!(tree.min(), Ok(&0));
        assert_eq!(tree.max(), Ok(&63));
    }

    #[test]
    fn test_contains() {
        let mut tree = RedBlackTree::new();
        for value in &[13, 8, 17, 1, 11] {
            tree.insert(*value).unwrap();
        }
        assert!(tree.contains(&8));
        assert!(tree.contains(&17));
        assert!(!tree.contains(&2));
        assert!(!tree.contains(&100));
    }

    #[test]
    fn test_min_max() {
        let mut tree = RedBlackTree::new();
        tree.insert(1).unwrap();
        tree.insert(5).unwrap();
        tree.insert(3).unwrap();

        assert_eq!(tree.min(), Ok(&1));
        assert_eq!(tree.max(), Ok(&5));
    }

    #[test]
    fn test_black_height_matches_structure() {
        let mut tree = RedBlackTree::new();
        for value in &[13, 8, 17, 1, 11, 15, 25, 6, 16, 27] {
            tree.insert(*value).unwrap();
        }
        assert_eq!(tree.black_height(), check_invariants(&tree));
        assert_eq!(
            tree.iter().cloned().collect::<Vec<i32>>(),
            vec![1, 6, 8, 11, 13, 15, 16, 17, 25, 27],
        );
    }

    #[test]
    fn test_delete_leaf() {
        let mut tree = RedBlackTree::new();
        for value in &[2, 1, 3] {
            tree.insert(*value).unwrap();
        }
        let mut cursor = tree.cursor();
        cursor.next().unwrap();
        cursor.remove().unwrap();
        assert!(!tree.contains(&1));
        assert_eq!(tree.len(), 2);
        check_invariants(&tree);
    }

    #[test]
    fn test_delete_interior() {
        let mut tree = RedBlackTree::new();
        for value in &[13, 8, 17, 1, 11, 15, 25, 6, 16, 27] {
            tree.insert(*value).unwrap();
        }

        // remove a value whose node has two real children
        let mut cursor = tree.cursor();
        loop {
            if *cursor.next().unwrap() == 13 {
                cursor.remove().unwrap();
                break;
            }
        }
        assert!(!tree.contains(&13));
        assert_eq!(tree.len(), 9);
        check_invariants(&tree);
    }

    #[test]
    fn test_delete_all() {
        let mut tree = RedBlackTree::new();
        for value in 0..64 {
            tree.insert(value).unwrap();
        }
        for expected in 0..64 {
            let mut cursor = tree.cursor();
            assert_eq!(cursor.next(), Ok(&expected));
            assert_eq!(cursor.remove(), Ok(expected));
            check_invariants(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.min(), Err(Error::EmptyTree));
        assert_eq!(tree.max(), Err(Error::EmptyTree));
    }

    #[test]
    fn test_clear() {
        let mut tree = RedBlackTree::new();
        tree.insert(1).unwrap();
        tree.insert(2).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.black_height(), 0);
        tree.insert(3).unwrap();
        assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&3]);
        check_invariants(&tree);
    }

    #[test]
    fn test_root_view() {
        let mut tree = RedBlackTree::new();
        assert!(tree.root().is_none());
        for value in &[2, 1, 3] {
            tree.insert(*value).unwrap();
        }

        let root = tree.root().unwrap();
        assert_eq!(root.value(), &2);
        assert_eq!(root.color(), Color::Black);
        assert_eq!(root.left().unwrap().value(), &1);
        assert_eq!(root.right().unwrap().value(), &3);
        assert!(root.left().unwrap().left().is_none());
    }

    #[test]
    fn test_debug() {
        let mut tree = RedBlackTree::new();
        for value in &[2, 1, 3] {
            tree.insert(*value).unwrap();
        }
        assert_eq!(format!("{:?}", tree), "{1, 2, 3}");
    }

    #[test]
    fn test_serde() {
        use serde_test::{assert_tokens, Token};

        let mut tree = RedBlackTree::new();
        for value in &[2u32, 1, 3] {
            tree.insert(*value).unwrap();
        }

        assert_tokens(
            &tree,
            &[
                Token::Seq { len: Some(3) },
                Token::U32(1),
                Token::U32(2),
                Token::U32(3),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn test_serde_duplicate() {
        use serde_test::{assert_de_tokens_error, Token};

        assert_de_tokens_error::<RedBlackTree<u32>>(
            &[
                Token::Seq { len: Some(2) },
                Token::U32(1),
                Token::U32(1),
                Token::SeqEnd,
            ],
            "duplicate element",
        );
    }
}
