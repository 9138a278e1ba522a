//! Built-in assignment policies.
//!
//! A policy decides which roster member covers the next occurrence of an
//! activity. The generator owns all bookkeeping (the count-sorted
//! snapshot, live participation counts); policies only pick.
//!
//! # Policies
//!
//! - **rotation**: cycle through the snapshot taken at the start of the
//!   activity, wrapping modulo roster size. The snapshot is not re-sorted
//!   mid-activity.
//! - **random**: uniform pick from the snapshot, independent each
//!   occurrence.
//! - **balanced**: stable re-sort of the working set by live count before
//!   every occurrence, then pick the minimum. Sensitive to counts updated
//!   by earlier activities in the same run.
//! - **first-up**: always the first member of the snapshot. Not a real
//!   policy; the fallback for unrecognized algorithm names.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::Algorithm;

/// A per-activity member picker.
///
/// `begin_activity` is called once per activity with the roster snapshot
/// (member slots sorted ascending by participation count, stable), then
/// `pick` once per occurrence with the live counts.
pub trait AssignmentPolicy: fmt::Debug {
    /// Policy name as it appears in settings.
    fn name(&self) -> &'static str;

    /// Starts a new activity with the given count-sorted snapshot.
    fn begin_activity(&mut self, snapshot: &[usize]);

    /// Picks the member slot for the next occurrence.
    ///
    /// `counts` are live participation counts indexed by slot. `None`
    /// only when the snapshot was empty.
    fn pick(&mut self, counts: &[u32]) -> Option<usize>;
}

/// Creates the policy for an algorithm selector.
///
/// `seed` fixes the random policy's generator for reproducible runs;
/// the other policies ignore it.
pub fn policy_for(algorithm: Algorithm, seed: Option<u64>) -> Box<dyn AssignmentPolicy> {
    match algorithm {
        Algorithm::Rotation => Box::new(Rotation::default()),
        Algorithm::Random => Box::new(match seed {
            Some(seed) => Random::seeded(seed),
            None => Random::new(),
        }),
        Algorithm::Balanced => Box::new(Balanced::default()),
        Algorithm::Unknown => Box::new(FirstUp::default()),
    }
}

/// Cyclic pick over the activity snapshot.
#[derive(Debug, Default)]
pub struct Rotation {
    order: Vec<usize>,
    cursor: usize,
}

impl AssignmentPolicy for Rotation {
    fn name(&self) -> &'static str {
        "rotation"
    }

    fn begin_activity(&mut self, snapshot: &[usize]) {
        self.order = snapshot.to_vec();
        self.cursor = 0;
    }

    fn pick(&mut self, _counts: &[u32]) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        let slot = self.order[self.cursor % self.order.len()];
        self.cursor += 1;
        Some(slot)
    }
}

/// Uniform random pick over the activity snapshot.
pub struct Random {
    order: Vec<usize>,
    rng: SmallRng,
}

impl Random {
    /// Creates a random policy seeded from the OS.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Creates a random policy with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            order: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentPolicy for Random {
    fn name(&self) -> &'static str {
        "random"
    }

    fn begin_activity(&mut self, snapshot: &[usize]) {
        self.order = snapshot.to_vec();
    }

    fn pick(&mut self, _counts: &[u32]) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.order.len());
        Some(self.order[index])
    }
}

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Random").field("order", &self.order).finish()
    }
}

/// Fewest-assignments-first pick.
///
/// Keeps a working copy of the snapshot and stable-sorts it by live count
/// before every pick, so ties fall to whoever was earlier in the previous
/// ordering.
#[derive(Debug, Default)]
pub struct Balanced {
    working: Vec<usize>,
}

impl AssignmentPolicy for Balanced {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn begin_activity(&mut self, snapshot: &[usize]) {
        self.working = snapshot.to_vec();
    }

    fn pick(&mut self, counts: &[u32]) -> Option<usize> {
        self.working.sort_by_key(|&slot| counts[slot]);
        self.working.first().copied()
    }
}

/// Fallback pick: always the first member of the snapshot.
#[derive(Debug, Default)]
pub struct FirstUp {
    order: Vec<usize>,
}

impl AssignmentPolicy for FirstUp {
    fn name(&self) -> &'static str {
        "first-up"
    }

    fn begin_activity(&mut self, snapshot: &[usize]) {
        self.order = snapshot.to_vec();
    }

    fn pick(&mut self, _counts: &[u32]) -> Option<usize> {
        self.order.first().copied()
    }
}
