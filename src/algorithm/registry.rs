use std::collections::HashSet;

use super::identity::Identity;

/// Identities whose sources have been fetched and built during this run
#[derive(Debug, Default)]
pub struct BuildRegistry {
    built: HashSet<Identity>,
}

impl BuildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once per identity; the identity is recorded on that call
    pub fn should_build(&mut self, identity: &Identity) -> bool {
        self.built.insert(identity.clone())
    }

    pub fn len(&self) -> usize {
        self.built.len()
    }

    pub fn is_empty(&self) -> bool {
        self.built.is_empty()
    }
}
