//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions. Every path ends in a black sentinel
//! leaf, and removal during traversal goes through a cursor.

mod cursor;
mod node;
mod tree;

pub use self::cursor::{CursorMut, IntoIter, Iter};
pub use self::node::Color;
pub use self::tree::{NodeRef, RedBlackTree};

use std::error;
use std::fmt;
use std::result;

/// An enum representing the ways an operation on a red black tree can fail. Every failure leaves
/// the tree in its previous valid state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The value passed to an insertion is already in the tree.
    DuplicateElement,
    /// The tree has no elements to report a minimum or maximum for.
    EmptyTree,
    /// A cursor was advanced past the last element of its traversal.
    IteratorExhausted,
    /// A cursor removal without a preceding advance, or twice for the same element.
    InvalidIteratorState,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateElement => write!(f, "Element already exists in tree."),
            Error::EmptyTree => write!(f, "Tree is empty."),
            Error::IteratorExhausted => write!(f, "Iterator has no more elements."),
            Error::InvalidIteratorState => {
                write!(f, "Iterator has no element eligible for removal.")
            },
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;
