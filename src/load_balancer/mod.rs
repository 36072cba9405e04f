//! Node selection.
//!
//! # Data Flow
//! ```text
//! hApp ID resolved → tranche (node hostnames) read from Node List store
//!     → NodeSelector picks one entry
//!     → resolver builds the upstream URL from it
//! ```
//!
//! # Design Decisions
//! - Selectors borrow the tranche; the stored list is never reordered or mutated
//! - No health or connection state: every listed node is a candidate

pub mod random;

pub use random::RandomSelector;

/// Strategy for choosing one node from a tranche.
pub trait NodeSelector: Send + Sync + std::fmt::Debug {
    /// Pick a node. Returns `None` only when `nodes` is empty.
    fn select<'a>(&self, nodes: &'a [String]) -> Option<&'a str>;
}
