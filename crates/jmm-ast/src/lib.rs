//! The syntax tree consumed by the backend.
//!
//! Parsing is an external collaborator: it hands over a tree whose nodes carry
//! a [`NodeKind`], a string-keyed attribute map, ordered children and a
//! non-owning parent reference. This crate stores that tree as an index arena.
//!
//! - [`NodeKind`]: the closed set of node kinds
//! - [`Ast`] / [`Node`]: the arena and its copyable node handle
//! - [`AstBuilder`]: bottom-up construction used by parsers and tests

mod builder;
mod kind;
mod node;

pub use builder::AstBuilder;
pub use kind::NodeKind;
pub use node::{Ast, Node, NodeId};
