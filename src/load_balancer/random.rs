//! Uniform random node selection.

use rand::Rng;
use crate::load_balancer::NodeSelector;

/// Picks each node with equal probability.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl RandomSelector {
    pub fn new() -> Self {
        Self
    }
}

impl NodeSelector for RandomSelector {
    fn select<'a>(&self, nodes: &'a [String]) -> Option<&'a str> {
        if nodes.is_empty() {
            return None;
        }

        let index = rand::thread_rng().gen_range(0..nodes.len());
        Some(nodes[index].as_str())
    }
}
