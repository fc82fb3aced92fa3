use coevo_types::{IndividualKind, ProgramId, TestId};
use std::collections::HashMap;
use std::fmt;

/// Stable handle of a repair candidate. Survives text replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RepairKey {
    Program(ProgramId),
    Test(TestId),
}

impl RepairKey {
    pub fn kind(&self) -> IndividualKind {
        match self {
            RepairKey::Program(_) => IndividualKind::Program,
            RepairKey::Test(_) => IndividualKind::Test,
        }
    }
}

impl fmt::Display for RepairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairKey::Program(id) => write!(f, "{}", id),
            RepairKey::Test(id) => write!(f, "{}", id),
        }
    }
}

/// Attempts and last-repair iteration per individual for one Stage-1 run.
#[derive(Clone, Debug)]
pub struct RepairState {
    attempts: HashMap<RepairKey, u32>,
    last_repaired: HashMap<RepairKey, usize>,
    max_tries: u32,
    cooldown: usize,
}

impl RepairState {
    pub fn new(max_tries: u32, cooldown: usize) -> Self {
        Self {
            attempts: HashMap::new(),
            last_repaired: HashMap::new(),
            max_tries,
            cooldown,
        }
    }

    pub fn attempts(&self, key: &RepairKey) -> u32 {
        self.attempts.get(key).copied().unwrap_or(0)
    }

    pub fn last_repaired(&self, key: &RepairKey) -> Option<usize> {
        self.last_repaired.get(key).copied()
    }

    pub fn is_exhausted(&self, key: &RepairKey) -> bool {
        self.attempts(key) >= self.max_tries
    }

    /// Repaired within the last `cooldown` iterations.
    pub fn is_cooling(&self, key: &RepairKey, iteration: usize) -> bool {
        self.last_repaired(key)
            .map(|last| iteration.saturating_sub(last) <= self.cooldown)
            .unwrap_or(false)
    }

    /// Repaired in the iteration immediately before `iteration`.
    pub fn repaired_just_before(&self, key: &RepairKey, iteration: usize) -> bool {
        self.last_repaired(key)
            .map(|last| last + 1 >= iteration)
            .unwrap_or(false)
    }

    pub fn is_eligible(&self, key: &RepairKey, iteration: usize) -> bool {
        !self.is_exhausted(key) && !self.is_cooling(key, iteration)
    }

    pub fn record(&mut self, key: RepairKey, iteration: usize) {
        *self.attempts.entry(key).or_insert(0) += 1;
        self.last_repaired.insert(key, iteration);
    }

    pub fn total_repairs(&self) -> u32 {
        self.attempts.values().sum()
    }
}

/// Which population the fallback picks from next. Flips after every use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CatastropheTarget {
    #[default]
    Program,
    Test,
}

impl CatastropheTarget {
    pub fn kind(self) -> IndividualKind {
        match self {
            CatastropheTarget::Program => IndividualKind::Program,
            CatastropheTarget::Test => IndividualKind::Test,
        }
    }

    /// Return the current kind and move to the other one.
    pub fn advance(&mut self) -> IndividualKind {
        let kind = self.kind();
        *self = match self {
            CatastropheTarget::Program => CatastropheTarget::Test,
            CatastropheTarget::Test => CatastropheTarget::Program,
        };
        kind
    }
}
