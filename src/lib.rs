//! An ordered, self-balancing container and the arena that backs its node graph.

pub mod arena;
pub mod red_black_tree;
