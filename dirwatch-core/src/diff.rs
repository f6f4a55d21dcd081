//! Added/removed path sets between two listings.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Difference between the previously tracked paths and a fresh listing.
///
/// `added` and `removed` are always disjoint, and applying them to the old
/// key set yields exactly the new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
}

impl ChangeSet {
    /// `added = new - old`, `removed = old - new`.
    pub fn between<'a, O, N>(old: O, new: N) -> Self
    where
        O: IntoIterator<Item = &'a PathBuf>,
        N: IntoIterator<Item = &'a PathBuf>,
    {
        let old: BTreeSet<&PathBuf> = old.into_iter().collect();
        let new: BTreeSet<&PathBuf> = new.into_iter().collect();
        Self {
            added: new.difference(&old).map(|p| (*p).clone()).collect(),
            removed: old.difference(&new).map(|p| (*p).clone()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn set(names: &[&str]) -> BTreeSet<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/w/{n}"))).collect()
    }

    #[rstest]
    #[case(&[], &[], &[], &[])]
    #[case(&[], &["a"], &["a"], &[])]
    #[case(&["a"], &[], &[], &["a"])]
    #[case(&["a", "b"], &["a", "b"], &[], &[])]
    #[case(&["a", "b"], &["b", "c"], &["c"], &["a"])]
    #[case(&["a", "b", "c"], &["d", "e"], &["d", "e"], &["a", "b", "c"])]
    fn computes_added_and_removed(
        #[case] old: &[&str],
        #[case] new: &[&str],
        #[case] added: &[&str],
        #[case] removed: &[&str],
    ) {
        let old = set(old);
        let new = set(new);
        let changes = ChangeSet::between(&old, &new);

        assert_eq!(changes.added, set(added));
        assert_eq!(changes.removed, set(removed));
        assert!(changes.added.is_disjoint(&changes.removed));

        let rebuilt: BTreeSet<PathBuf> = old
            .difference(&changes.removed)
            .cloned()
            .chain(changes.added.iter().cloned())
            .collect();
        assert_eq!(rebuilt, new, "(old - removed) + added must equal new");
    }

    #[test]
    fn identical_sets_are_empty() {
        let keys = set(&["a", "b"]);
        assert!(ChangeSet::between(&keys, &keys).is_empty());
    }
}
