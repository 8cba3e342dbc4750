//! Anatomical convention tables: per-region directionality priors and
//! post-hoc presentational flips. Both ship as built-in TSVs and accept a
//! user overlay whose rows replace built-in rows with the same key.

mod loader;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;

use crate::geometry::orient::{DirectionTargets, DirectionalityPolicy};

pub use loader::{
    load_builtin_flips_v1, load_builtin_priors_v1, load_flip_tsv, load_prior_tsv, merge_flips,
    merge_priors, parse_flip_tsv, parse_prior_tsv,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorTable {
    entries: BTreeMap<u32, DirectionTargets>,
}

impl PriorTable {
    pub fn new(entries: BTreeMap<u32, DirectionTargets>) -> Self {
        Self { entries }
    }

    pub fn get(&self, region: u32) -> Option<&DirectionTargets> {
        self.entries.get(&region)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &DirectionTargets)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Caller direction wins over the table; unknown regions fall back.
    pub fn policy_for(&self, region: u32, explicit: Option<DirectionTargets>) -> DirectionalityPolicy {
        match (explicit, self.entries.get(&region)) {
            (Some(t), _) => DirectionalityPolicy::Explicit(t),
            (None, Some(t)) => DirectionalityPolicy::Prior(*t),
            (None, None) => DirectionalityPolicy::Fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipRule {
    pub rule: String,
    /// 1-based axis rank.
    pub axis: usize,
    /// Label the axis must carry for the rule to apply.
    pub from: String,
    /// Label the axis carries after the flip.
    pub label: String,
    pub regions: BTreeSet<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlipRules {
    rules: Vec<FlipRule>,
}

impl FlipRules {
    pub fn new(rules: Vec<FlipRule>) -> Self {
        Self { rules }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[FlipRule] {
        &self.rules
    }

    /// First rule covering `(region, axis)`.
    pub fn matching(&self, region: u32, axis: usize) -> Option<&FlipRule> {
        self.rules
            .iter()
            .find(|r| r.axis == axis && r.regions.contains(&region))
    }
}

pub fn load_priors(user: Option<&Path>) -> Result<PriorTable> {
    let builtin = load_builtin_priors_v1()?;
    match user {
        Some(path) => Ok(merge_priors(builtin, load_prior_tsv(path)?)),
        None => Ok(builtin),
    }
}

pub fn load_flips(user: Option<&Path>) -> Result<FlipRules> {
    let builtin = load_builtin_flips_v1()?;
    match user {
        Some(path) => Ok(merge_flips(builtin, load_flip_tsv(path)?)),
        None => Ok(builtin),
    }
}
