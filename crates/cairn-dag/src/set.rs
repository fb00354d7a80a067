use std::collections::{HashMap, HashSet};

use cairn_types::Cid;

/// A grow-only set of content identifiers with visit-once semantics.
///
/// Not synchronized: a `CidSet` belongs to exactly one walk.
#[derive(Clone, Debug, Default)]
pub struct CidSet {
    seen: HashSet<Cid>,
}

impl CidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `cid`. Returns `true` only the first time it is seen.
    pub fn visit(&mut self, cid: Cid) -> bool {
        self.seen.insert(cid)
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.seen.contains(cid)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cid> {
        self.seen.iter()
    }
}

impl FromIterator<Cid> for CidSet {
    fn from_iter<I: IntoIterator<Item = Cid>>(iter: I) -> Self {
        Self {
            seen: iter.into_iter().collect(),
        }
    }
}

/// How far below each identifier a walk has already been allowed to go.
///
/// Kept apart from the emitted set: an identifier that was reported but not
/// expanded (a direct pin, or a node at a depth limit) must still be expanded
/// when a later walk reaches it with levels to spare.
#[derive(Clone, Debug, Default)]
pub struct ExpansionRecord {
    budgets: HashMap<Cid, Option<u32>>,
}

impl ExpansionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reach of `cid` with `remaining` levels open below it
    /// (`None` is unbounded).
    ///
    /// Returns `true` if this reach goes deeper than every earlier one, in
    /// which case the caller should expand `cid` again.
    pub fn admit(&mut self, cid: Cid, remaining: Option<u32>) -> bool {
        let covered = match (self.budgets.get(&cid), remaining) {
            (None, _) => false,
            (Some(None), _) => true,
            (Some(Some(_)), None) => false,
            (Some(Some(prev)), Some(r)) => r <= *prev,
        };
        if !covered {
            self.budgets.insert(cid, remaining);
        }
        !covered
    }

    /// The deepest reach recorded for `cid`, if any.
    pub fn budget(&self, cid: &Cid) -> Option<Option<u32>> {
        self.budgets.get(cid).copied()
    }

    pub fn len(&self) -> usize {
        self.budgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.budgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cid(n: u8) -> Cid {
        Cid::raw([n; 32])
    }

    #[test]
    fn first_visit_is_true_then_false() {
        let mut set = CidSet::new();
        assert!(set.visit(cid(1)));
        assert!(!set.visit(cid(1)));
        assert!(set.contains(&cid(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set() {
        let set = CidSet::new();
        assert!(set.is_empty());
        assert!(!set.contains(&cid(0)));
    }

    #[test]
    fn collect_from_iterator() {
        let set: CidSet = [cid(1), cid(2), cid(1)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    // ---- ExpansionRecord ----

    #[test]
    fn deeper_reach_is_admitted_again() {
        let mut record = ExpansionRecord::new();
        assert!(record.admit(cid(1), Some(0)));
        assert!(!record.admit(cid(1), Some(0)));
        assert!(record.admit(cid(1), Some(2)));
        assert!(!record.admit(cid(1), Some(1)));
        assert!(record.admit(cid(1), None));
        assert!(!record.admit(cid(1), None));
        assert!(!record.admit(cid(1), Some(u32::MAX)));
        assert_eq!(record.budget(&cid(1)), Some(None));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn unknown_ids_have_no_budget() {
        let record = ExpansionRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.budget(&cid(9)), None);
    }

    proptest! {
        #[test]
        fn true_visits_equal_distinct_ids(ids in proptest::collection::vec(any::<u8>(), 0..200)) {
            let mut set = CidSet::new();
            let firsts = ids.iter().filter(|n| set.visit(cid(**n))).count();
            let distinct: std::collections::HashSet<u8> = ids.iter().copied().collect();
            prop_assert_eq!(firsts, distinct.len());
            prop_assert_eq!(set.len(), distinct.len());
        }

        #[test]
        fn admits_track_the_running_maximum(budgets in proptest::collection::vec(0u32..6, 1..50)) {
            let mut record = ExpansionRecord::new();
            let mut best: Option<u32> = None;
            for b in budgets {
                let deeper = best.map_or(true, |prev| b > prev);
                prop_assert_eq!(record.admit(cid(1), Some(b)), deeper);
                if deeper {
                    best = Some(b);
                }
            }
            prop_assert_eq!(record.budget(&cid(1)), best.map(Some));
        }
    }
}
