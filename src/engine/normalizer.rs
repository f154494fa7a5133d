// Inclusion and conflict normalization
//
// Expands the transitive closure of each selection's inclusion edges,
// credits every satisfied key to exactly one descriptor, and resolves
// conflict groups deterministically.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::catalog::{ConflictGroup, ModCatalog, ModDescriptor};

use super::ComputationWarning;

/// A key satisfied through another selection rather than on its own.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SuppressedKey {
    pub key: String,
    /// Key of the descriptor whose closure credits this key
    pub included_by: String,
}

/// Outcome of resolving one conflict-group collision. The loser is recorded,
/// never silently dropped.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConflictResolution {
    pub group: ConflictGroup,
    pub winner: String,
    pub loser: String,
}

/// A selection set after hierarchy expansion and conflict resolution.
///
/// `active` holds the descriptors that contribute gains, in the caller's
/// input order. `active_keys` is every key whose benefit is present in the
/// build (contributing keys plus their closures, minus conflict losers);
/// `suppressed` is the subset of those that are satisfied through another
/// selection instead of contributing independently.
#[derive(Debug)]
pub struct NormalizedSelection<'a> {
    pub active: Vec<&'a ModDescriptor>,
    pub active_keys: Vec<String>,
    pub suppressed: Vec<SuppressedKey>,
    pub removed_conflicts: Vec<ConflictResolution>,
    pub warnings: Vec<ComputationWarning>,
}

/// Transitive closure of a descriptor's inclusion edges, in breadth-first
/// order starting at the descriptor itself. Cycle-safe.
fn inclusion_closure<'a>(
    root: &'a ModDescriptor,
    catalog: &'a ModCatalog,
) -> Vec<&'a ModDescriptor> {
    let mut visited: HashSet<&str> = HashSet::from([root.key.as_str()]);
    let mut ordered = vec![root];
    let mut queue: VecDeque<&str> = root.included_keys.iter().map(String::as_str).collect();
    while let Some(key) = queue.pop_front() {
        if !visited.insert(key) {
            continue;
        }
        // inclusion edges are validated at catalog construction; a key
        // missing here means the caller built the catalog by hand, and the
        // closure simply skips it
        if let Some(descriptor) = catalog.get(key) {
            ordered.push(descriptor);
            queue.extend(descriptor.included_keys.iter().map(String::as_str));
        }
    }
    ordered
}

/// Normalize explicitly selected descriptors against the catalog.
///
/// Resolution is deterministic: within a conflict group the highest
/// `hierarchy_rank` wins, and equal ranks fall back to the most recently
/// selected member (later in the caller's input order).
pub fn normalize<'a>(
    explicit: &[&'a ModDescriptor],
    catalog: &'a ModCatalog,
) -> NormalizedSelection<'a> {
    let mut warnings = Vec::new();
    let mut suppressed_explicit: Vec<SuppressedKey> = Vec::new();
    let mut removed_conflicts: Vec<ConflictResolution> = Vec::new();

    let closures: Vec<Vec<&ModDescriptor>> = explicit
        .iter()
        .map(|d| inclusion_closure(d, catalog))
        .collect();
    let closure_sets: Vec<HashSet<&str>> = closures
        .iter()
        .map(|closure| closure.iter().map(|d| d.key.as_str()).collect())
        .collect();

    // An explicit selection already covered by another selection's closure
    // is redundant, not a conflict: it stays satisfied but contributes
    // nothing of its own. Credit goes to the highest-ranked subsumer.
    let mut contributing: Vec<bool> = vec![true; explicit.len()];
    for (i, descriptor) in explicit.iter().enumerate() {
        let creditor = explicit
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i && closure_sets[*j].contains(descriptor.key.as_str()))
            .max_by_key(|(j, other)| (other.hierarchy_rank, *j));
        if let Some((_, creditor)) = creditor {
            log::debug!(
                "'{}' is subsumed by '{}', suppressing",
                descriptor.key,
                creditor.key
            );
            contributing[i] = false;
            suppressed_explicit.push(SuppressedKey {
                key: descriptor.key.clone(),
                included_by: creditor.key.clone(),
            });
            warnings.push(ComputationWarning::RedundantSelection {
                key: descriptor.key.clone(),
                included_by: creditor.key.clone(),
            });
        }
    }

    // Conflict resolution among the contributing selections themselves.
    let mut groups: BTreeMap<ConflictGroup, Vec<usize>> = BTreeMap::new();
    for (i, descriptor) in explicit.iter().enumerate() {
        if contributing[i] {
            if let Some(group) = descriptor.conflict_group {
                groups.entry(group).or_default().push(i);
            }
        }
    }
    for (group, members) in &groups {
        if members.len() < 2 {
            continue;
        }
        let winner = *members
            .iter()
            .max_by_key(|i| (explicit[**i].hierarchy_rank, **i))
            .unwrap();
        for &loser in members.iter().filter(|i| **i != winner) {
            log::debug!(
                "conflict in {}: '{}' loses to '{}'",
                group,
                explicit[loser].key,
                explicit[winner].key
            );
            contributing[loser] = false;
            removed_conflicts.push(ConflictResolution {
                group: *group,
                winner: explicit[winner].key.clone(),
                loser: explicit[loser].key.clone(),
            });
            warnings.push(ComputationWarning::ConflictResolved {
                winner: explicit[winner].key.clone(),
                loser: explicit[loser].key.clone(),
                group: *group,
            });
        }
    }

    // Gather the included-key candidates of the surviving selections and
    // credit each to the highest-ranked selection containing it.
    let root_keys: HashSet<&str> = explicit
        .iter()
        .enumerate()
        .filter(|(i, _)| contributing[*i])
        .map(|(_, d)| d.key.as_str())
        .collect();
    let already_suppressed: HashSet<String> = suppressed_explicit
        .iter()
        .map(|s| s.key.clone())
        .collect();

    struct Candidate<'a> {
        descriptor: &'a ModDescriptor,
        creditor: &'a ModDescriptor,
        /// input position of the crediting selection, for recency tie-breaks
        creditor_position: usize,
    }
    let mut candidate_keys: HashSet<&str> = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    for (i, closure) in closures.iter().enumerate() {
        if !contributing[i] {
            continue;
        }
        for &descriptor in closure.iter().skip(1) {
            if root_keys.contains(descriptor.key.as_str())
                || !candidate_keys.insert(descriptor.key.as_str())
            {
                continue;
            }
            let (creditor_position, creditor) = explicit
                .iter()
                .enumerate()
                .filter(|(j, _)| {
                    contributing[*j] && closure_sets[*j].contains(descriptor.key.as_str())
                })
                .max_by_key(|(j, root)| (root.hierarchy_rank, *j))
                .map(|(j, root)| (j, *root))
                .expect("candidate came from at least one contributing closure");
            candidates.push(Candidate {
                descriptor,
                creditor,
                creditor_position,
            });
        }
    }

    // Included candidates can still collide with contributing selections in
    // their conflict group (a bundled turbo versus an explicitly selected
    // bigger one), or with candidates from another bundle. Losers move to
    // removed_conflicts; a losing contributing selection also stops
    // contributing.
    struct GroupMember<'a> {
        descriptor: &'a ModDescriptor,
        /// input position of the contributing selection this member rides on
        position: usize,
    }
    let mut removed_keys: HashSet<String> = HashSet::new();
    let mut candidate_groups: BTreeMap<ConflictGroup, Vec<GroupMember>> = BTreeMap::new();
    for candidate in &candidates {
        if let Some(group) = candidate.descriptor.conflict_group {
            candidate_groups.entry(group).or_default().push(GroupMember {
                descriptor: candidate.descriptor,
                position: candidate.creditor_position,
            });
        }
    }
    for (group, members) in candidate_groups.iter_mut() {
        // root-versus-root collisions were resolved above, so at most one
        // contributing selection per group remains
        if let Some((position, root)) = explicit
            .iter()
            .enumerate()
            .filter(|(i, d)| contributing[*i] && d.conflict_group == Some(*group))
            .max_by_key(|(i, d)| (d.hierarchy_rank, *i))
            .map(|(i, d)| (i, *d))
        {
            members.push(GroupMember {
                descriptor: root,
                position,
            });
        }
        if members.len() < 2 {
            continue;
        }
        let winner = members
            .iter()
            .max_by_key(|m| (m.descriptor.hierarchy_rank, m.position))
            .map(|m| m.descriptor.key.clone())
            .unwrap();
        for member in members.iter().filter(|m| m.descriptor.key != winner) {
            log::debug!(
                "conflict in {}: '{}' loses to '{}'",
                group,
                member.descriptor.key,
                winner
            );
            removed_keys.insert(member.descriptor.key.clone());
            removed_conflicts.push(ConflictResolution {
                group: *group,
                winner: winner.clone(),
                loser: member.descriptor.key.clone(),
            });
            warnings.push(ComputationWarning::ConflictResolved {
                winner: winner.clone(),
                loser: member.descriptor.key.clone(),
                group: *group,
            });
        }
    }

    let active: Vec<&ModDescriptor> = explicit
        .iter()
        .enumerate()
        .filter(|(i, d)| contributing[*i] && !removed_keys.contains(&d.key))
        .map(|(_, d)| *d)
        .collect();

    let mut active_keys: Vec<String> = active.iter().map(|d| d.key.clone()).collect();
    let mut suppressed = suppressed_explicit;
    for candidate in &candidates {
        if removed_keys.contains(&candidate.descriptor.key) {
            continue;
        }
        active_keys.push(candidate.descriptor.key.clone());
        if !already_suppressed.contains(&candidate.descriptor.key) {
            suppressed.push(SuppressedKey {
                key: candidate.descriptor.key.clone(),
                included_by: candidate.creditor.key.clone(),
            });
        }
    }

    NormalizedSelection {
        active,
        active_keys,
        suppressed,
        removed_conflicts,
        warnings,
    }
}
