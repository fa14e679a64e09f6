//! Toolchain matcher.
//!
//! Turns probed candidates into toolchains:
//!
//! 1. Candidates with a known version are grouped by family and suffix
//!    within their search directory. Candidates without a version are not
//!    grouped but stay available as donors.
//! 2. A group's identity comes from its canonical role: the first of
//!    `cc, cxx, f77, fc` it has.
//! 3. Empty roles are backfilled from any candidate of the same family,
//!    preferring the empty suffix, then the group's own suffix, then the
//!    shortest and lexically first other suffix. A donor whose own probe
//!    reports a different version is never used, and a group never takes
//!    back its own members whose probe failed.
//! 4. Of several toolchains with the same spec, only the one with the
//!    empty (or else shortest, lexically first) suffix is kept.

use std::collections::HashMap;

use tracing::debug;

use super::candidate::CompilerCandidate;
use super::family::Family;
use super::probe::{probe_all, VersionProbe, VersionProber};
use super::toolchain::{CompilerSpec, Role, RolePaths, Toolchain};

/// Probes candidates and assembles the results into toolchains.
pub struct ToolchainMatcher<'p, P: VersionProber + ?Sized> {
    prober: &'p P,
}

impl<'p, P: VersionProber + ?Sized> ToolchainMatcher<'p, P> {
    pub fn new(prober: &'p P) -> Self {
        Self { prober }
    }

    /// Probe every candidate and assemble toolchains from the results.
    pub fn match_candidates(&self, candidates: &[CompilerCandidate]) -> Vec<Toolchain> {
        let probes = probe_all(self.prober, candidates);
        assemble(candidates, &probes)
    }
}

/// Assemble toolchains from candidates and their probe results.
///
/// `probes[i]` must belong to `candidates[i]`.
pub fn assemble(candidates: &[CompilerCandidate], probes: &[VersionProbe]) -> Vec<Toolchain> {
    debug_assert_eq!(candidates.len(), probes.len());

    let mut builders: Vec<ToolchainBuilder> = Vec::new();
    for (index, (candidate, probe)) in candidates.iter().zip(probes).enumerate() {
        if !probe.is_known() {
            continue;
        }
        match builders.iter_mut().find(|b| b.is_group_of(candidate)) {
            Some(builder) => builder.add_member(index, candidate),
            None => {
                let mut builder = ToolchainBuilder::new(
                    candidate.parsed.family,
                    candidate.parsed.suffix.clone(),
                    candidate.search_index,
                );
                builder.add_member(index, candidate);
                builders.push(builder);
            }
        }
    }

    let built: Vec<(usize, Toolchain)> = builders
        .iter_mut()
        .filter_map(|builder| {
            builder.backfill(candidates, probes);
            builder
                .build(candidates, probes)
                .map(|toolchain| (builder.search_index, toolchain))
        })
        .collect();

    prefer_unsuffixed(built)
}

/// Fills role slots for one primary group, then emits a [`Toolchain`].
#[derive(Debug, Clone)]
pub struct ToolchainBuilder {
    family: Family,
    suffix: String,
    search_index: usize,
    /// Candidate index per role, in [`Role::ALL`] order.
    slots: [Option<usize>; 4],
}

impl ToolchainBuilder {
    pub fn new(family: Family, suffix: impl Into<String>, search_index: usize) -> Self {
        Self {
            family,
            suffix: suffix.into(),
            search_index,
            slots: [None; 4],
        }
    }

    /// Whether `candidate` belongs to this primary group.
    pub fn is_group_of(&self, candidate: &CompilerCandidate) -> bool {
        candidate.parsed.family == self.family
            && candidate.search_index == self.search_index
            && candidate.parsed.suffix == self.suffix
    }

    /// Assign `candidate` to each of its roles that is still empty.
    pub fn add_member(&mut self, index: usize, candidate: &CompilerCandidate) {
        for role in candidate.parsed.roles {
            let slot = &mut self.slots[slot_of(*role)];
            if slot.is_none() {
                *slot = Some(index);
            }
        }
    }

    /// Candidate index filling `role`, if any.
    pub fn slot(&self, role: Role) -> Option<usize> {
        self.slots[slot_of(role)]
    }

    /// Vendor and version of the canonical role.
    pub fn identity<'a>(&self, probes: &'a [VersionProbe]) -> Option<(&'static str, &'a str)> {
        Role::ALL.into_iter().find_map(|role| {
            let probe = &probes[self.slot(role)?];
            probe.vendor.zip(probe.version.as_deref())
        })
    }

    /// Fill empty roles from donors of the same family.
    pub fn backfill(&mut self, candidates: &[CompilerCandidate], probes: &[VersionProbe]) {
        let Some((_, version)) = self.identity(probes) else {
            return;
        };

        for role in Role::ALL {
            if self.slot(role).is_some() {
                continue;
            }

            let donor = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.parsed.family == self.family && c.parsed.fills(role))
                .filter(|(i, c)| match probes[*i].version.as_deref() {
                    Some(v) => v == version,
                    // A failed member of this group stays excluded.
                    None => !self.is_group_of(c),
                })
                .min_by_key(|(i, c)| self.donor_rank(*i, c));

            if let Some((index, donor)) = donor {
                debug!(
                    "Backfilling {} of {}-{:?} with {}",
                    role,
                    self.family,
                    self.suffix,
                    donor.path.display()
                );
                self.slots[slot_of(role)] = Some(index);
            }
        }
    }

    /// Sort key for donors; smallest wins.
    fn donor_rank<'c>(
        &self,
        index: usize,
        candidate: &'c CompilerCandidate,
    ) -> (u8, usize, &'c str, bool, usize, usize) {
        let suffix = candidate.parsed.suffix.as_str();
        let tier = if suffix.is_empty() {
            0
        } else if suffix == self.suffix {
            1
        } else {
            2
        };
        (
            tier,
            suffix.len(),
            suffix,
            candidate.search_index != self.search_index,
            candidate.search_index,
            index,
        )
    }

    /// Emit the toolchain, or `None` when no role has a versioned compiler.
    pub fn build(&self, candidates: &[CompilerCandidate], probes: &[VersionProbe]) -> Option<Toolchain> {
        let (vendor, version) = self.identity(probes)?;

        let mut paths = RolePaths::default();
        for role in Role::ALL {
            if let Some(index) = self.slot(role) {
                paths.set(role, candidates[index].path.clone());
            }
        }
        if paths.is_empty() {
            return None;
        }

        Some(Toolchain {
            spec: CompilerSpec::new(vendor, version),
            family: self.family,
            paths,
            suffix: self.suffix.clone(),
        })
    }
}

fn slot_of(role: Role) -> usize {
    role as usize
}

/// Keep one toolchain per spec, preserving discovery order.
fn prefer_unsuffixed(built: Vec<(usize, Toolchain)>) -> Vec<Toolchain> {
    let rank = |(search_index, t): &(usize, Toolchain)| {
        (!t.suffix.is_empty(), t.suffix.len(), t.suffix.clone(), *search_index)
    };

    let mut best: HashMap<&CompilerSpec, usize> = HashMap::new();
    for (i, entry) in built.iter().enumerate() {
        best.entry(&entry.1.spec)
            .and_modify(|b| {
                if rank(entry) < rank(&built[*b]) {
                    *b = i;
                }
            })
            .or_insert(i);
    }
    let keep: Vec<bool> = (0..built.len())
        .map(|i| best.get(&built[i].1.spec) == Some(&i))
        .collect();

    built
        .into_iter()
        .zip(keep)
        .filter_map(|((_, toolchain), keep)| {
            if !keep {
                debug!(
                    "Discarding {} with suffix {:?} in favor of a preferred variant",
                    toolchain.spec, toolchain.suffix
                );
            }
            keep.then_some(toolchain)
        })
        .collect()
}
