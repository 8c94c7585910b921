//! The host capability allow-list.
//!
//! A [`CapabilitySet`] decides which host globals the interpreter installs. It is passed in through
//! configuration; there is no process-wide default that code can reach.

use std::collections::BTreeSet;

use duel_core::lang::globals::{self, CapabilityClass, GlobalInfo};

/// Set of granted [`CapabilityClass`]es. `Core` is always granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    classes: BTreeSet<CapabilityClass>,
}

impl CapabilitySet {
    /// Every grantable class: the full allow-list.
    pub fn standard() -> Self {
        let mut classes: BTreeSet<_> = CapabilityClass::GRANTABLE.iter().copied().collect();
        classes.insert(CapabilityClass::Core);
        Self { classes }
    }

    /// Only the language constants.
    pub fn empty() -> Self {
        Self {
            classes: BTreeSet::from([CapabilityClass::Core]),
        }
    }

    pub fn with(mut self, class: CapabilityClass) -> Self {
        self.classes.insert(class);
        self
    }

    pub fn without(mut self, class: CapabilityClass) -> Self {
        if class != CapabilityClass::Core {
            self.classes.remove(&class);
        }
        self
    }

    pub fn allows(&self, class: CapabilityClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn classes(&self) -> impl Iterator<Item = CapabilityClass> + '_ {
        self.classes.iter().copied()
    }

    /// Registry entries of every global this set installs.
    pub fn globals(&self) -> impl Iterator<Item = &'static GlobalInfo> + '_ {
        globals::GLOBALS.iter().filter(|g| self.allows(g.class))
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grants_every_global() {
        let set = CapabilitySet::standard();
        assert_eq!(set.globals().count(), globals::GLOBALS.len());
    }

    #[test]
    fn test_core_cannot_be_revoked() {
        let set = CapabilitySet::empty().without(CapabilityClass::Core);
        assert!(set.allows(CapabilityClass::Core));
        assert!(set.globals().all(|g| g.class == CapabilityClass::Core));
    }

    #[test]
    fn test_without_removes_class_globals() {
        let set = CapabilitySet::standard().without(CapabilityClass::Console);
        assert!(!set.globals().any(|g| g.name == "console"));
        assert!(set.globals().any(|g| g.name == "Math"));
    }
}
