// src/cluster.rs

use crate::model::*;
use std::collections::HashMap;

/// Union-find forest over dense indices, with path halving and union by size
#[derive(Debug, Default)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    /// Adds a singleton set and returns its index
    pub fn push(&mut self) -> usize {
        let index = self.parent.len();
        self.parent.push(index);
        self.size.push(1);
        index
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets holding `a` and `b`; returns the surviving root, or
    /// `None` when they already shared one
    pub fn union(&mut self, a: usize, b: usize) -> Option<usize> {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return None;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        Some(ra)
    }
}

/// Incrementally groups files that ever changed together.
///
/// Each change set is a hyperedge; every file it names is united with the
/// others in one step, so a change set bridging several existing groups
/// fuses all of them at once.
#[derive(Debug, Default)]
pub struct ClusterEngine {
    /// Files in discovery order; a file's position is its forest index
    files: Vec<FileId>,
    index: HashMap<FileId, usize>,
    forest: DisjointSet,
    groups: usize,
}

impl ClusterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, change_set: &ChangeSet) {
        let mut members = change_set.iter().map(|file| self.intern(file));
        let Some(first) = members.next() else {
            return;
        };
        let rest: Vec<usize> = members.collect();
        for other in rest {
            if self.forest.union(first, other).is_some() {
                self.groups -= 1;
            }
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// Builds the partition; groups are ordered by their earliest-seen file
    pub fn finish(mut self) -> Partition {
        let mut slot_of_root: HashMap<usize, usize> = HashMap::with_capacity(self.groups);
        let mut partition: Partition = Vec::with_capacity(self.groups);

        for (index, file) in self.files.into_iter().enumerate() {
            let root = self.forest.find(index);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                partition.push(Group::new());
                partition.len() - 1
            });
            partition[slot].insert(file);
        }
        partition
    }

    fn intern(&mut self, file: &FileId) -> usize {
        if let Some(&index) = self.index.get(file) {
            return index;
        }
        let index = self.forest.push();
        self.files.push(file.clone());
        self.index.insert(file.clone(), index);
        self.groups += 1;
        index
    }
}

/// Computes the coarsest partition in which every change set lies inside one group
pub fn cluster<'a, I>(commits: I) -> Partition
where
    I: IntoIterator<Item = &'a ChangeSet>,
{
    let mut engine = ClusterEngine::new();
    for change_set in commits {
        engine.add(change_set);
    }
    engine.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(files: &[&str]) -> ChangeSet {
        files.iter().map(|f| f.to_string()).collect()
    }

    fn run(commits: &[&[&str]]) -> Partition {
        let sets: Vec<ChangeSet> = commits.iter().map(|c| set(c)).collect();
        cluster(&sets)
    }

    /// Partition as an order-free value for comparisons
    fn normalized(partition: &Partition) -> BTreeSet<Group> {
        partition.iter().cloned().collect()
    }

    fn assert_valid(commits: &[&[&str]], partition: &Partition) {
        let mut seen = BTreeSet::new();
        for group in partition {
            assert!(!group.is_empty(), "empty group in {partition:?}");
            for file in group {
                assert!(seen.insert(file.clone()), "{file} appears in two groups");
            }
        }
        let expected: BTreeSet<String> =
            commits.iter().flat_map(|c| c.iter().map(|f| f.to_string())).collect();
        assert_eq!(seen, expected, "groups must cover every file");
        for commit in commits {
            assert!(
                partition.iter().any(|g| commit.iter().all(|f| g.contains(*f))),
                "{commit:?} is split across groups"
            );
        }
    }

    #[test]
    fn chained_change_sets_share_a_group() {
        let partition = run(&[&["A", "B"], &["B", "C"], &["D", "E"]]);
        assert_eq!(partition, vec![set(&["A", "B", "C"]), set(&["D", "E"])]);
    }

    #[test]
    fn bridging_change_set_merges_every_touched_group() {
        let partition = run(&[&["A", "B"], &["C", "D"], &["B", "C"]]);
        assert_eq!(partition, vec![set(&["A", "B", "C", "D"])]);
    }

    #[test]
    fn bridge_across_many_groups_merges_in_one_step() {
        let commits: &[&[&str]] = &[&["a"], &["b"], &["c"], &["d", "e"], &["x"], &["e", "c", "a", "b"]];
        let mut engine = ClusterEngine::new();
        for commit in &commits[..5] {
            engine.add(&set(commit));
        }
        assert_eq!(engine.group_count(), 5);
        engine.add(&set(commits[5]));
        assert_eq!(engine.group_count(), 2);
        assert_eq!(engine.file_count(), 6);

        let partition = engine.finish();
        assert_eq!(partition, vec![set(&["a", "b", "c", "d", "e"]), set(&["x"])]);
        assert_valid(commits, &partition);
    }

    #[test]
    fn single_file_commit_forms_its_own_group() {
        assert_eq!(run(&[&["A"]]), vec![set(&["A"])]);
    }

    #[test]
    fn empty_input_yields_empty_partition() {
        assert!(run(&[]).is_empty());
        assert!(run(&[&[], &[], &[]]).is_empty());
    }

    #[test]
    fn empty_change_sets_are_skipped() {
        let partition = run(&[&[], &["A", "B"], &[], &["C"]]);
        assert_eq!(partition, vec![set(&["A", "B"]), set(&["C"])]);
    }

    #[test]
    fn paths_are_compared_exactly() {
        let partition = run(&[&["src/Main.rs", "a"], &["src/main.rs", "b"]]);
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn groups_follow_discovery_order() {
        let partition = run(&[&["z"], &["m", "n"], &["a"], &["n", "z"]]);
        assert_eq!(partition, vec![set(&["m", "n", "z"]), set(&["a"])]);
    }

    #[test]
    fn result_is_independent_of_commit_order() {
        let commits: &[&[&str]] = &[
            &["a", "b"],
            &["c"],
            &["d", "e", "f"],
            &["b", "g"],
            &["h", "i"],
            &["f", "c"],
            &[],
            &["j"],
            &["i", "a"],
        ];
        let expected = normalized(&run(commits));
        assert_eq!(expected.len(), 3);

        let mut permuted = commits.to_vec();
        for step in 0..commits.len() * 3 {
            let (i, j) = (step % commits.len(), (step * 7 + 3) % commits.len());
            permuted.swap(i, j);
            let partition = run(&permuted);
            assert_valid(&permuted, &partition);
            assert_eq!(normalized(&partition), expected);
        }
        permuted.reverse();
        assert_eq!(normalized(&run(&permuted)), expected);
    }

    #[test]
    fn groups_are_coarsest() {
        let commits: &[&[&str]] = &[&["a", "b"], &["c", "d"], &["e"], &["b", "c"], &["f", "g"]];
        let partition = run(commits);
        assert_valid(commits, &partition);

        // Any split of a group must cut some change set
        for group in &partition {
            let files: Vec<&String> = group.iter().collect();
            for mask in 1..(1u32 << files.len()) - 1 {
                let left: BTreeSet<&str> = files
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1u32 << *i) != 0)
                    .map(|(_, f)| f.as_str())
                    .collect();
                let cut = commits.iter().any(|c| {
                    c.iter().any(|f| left.contains(f))
                        && c.iter().any(|f| group.contains(*f) && !left.contains(f))
                });
                assert!(cut, "group {group:?} could be split at {left:?}");
            }
        }
    }

    #[test]
    fn counts_follow_unions() {
        let mut engine = ClusterEngine::new();
        engine.add(&set(&["a", "b"]));
        engine.add(&set(&["c"]));
        engine.add(&set(&["a", "b"]));
        assert_eq!((engine.file_count(), engine.group_count()), (3, 2));
        engine.add(&set(&["c", "b"]));
        assert_eq!((engine.file_count(), engine.group_count()), (3, 1));
    }

    #[test]
    fn union_by_size_keeps_larger_root() {
        let mut forest = DisjointSet::default();
        let ids: Vec<usize> = (0..4).map(|_| forest.push()).collect();
        let big = forest.union(ids[0], ids[1]).unwrap();
        let big = forest.union(big, ids[2]).unwrap();
        assert_eq!(forest.union(ids[3], ids[0]), Some(big));
        for &id in &ids {
            assert_eq!(forest.find(id), big);
        }
    }

    #[test]
    fn union_of_joined_sets_reports_no_merge() {
        let mut forest = DisjointSet::default();
        let (a, b, c) = (forest.push(), forest.push(), forest.push());
        assert!(forest.union(a, b).is_some());
        assert!(forest.union(b, c).is_some());
        assert_eq!(forest.union(c, a), None);
        assert_eq!(forest.union(b, b), None);
    }
}
