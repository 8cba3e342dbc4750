use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::geometry::orient::{DirectionTargets, ImageAxis};
use crate::priors::{FlipRule, FlipRules, PriorTable};

pub fn load_builtin_priors_v1() -> Result<PriorTable> {
    let content = include_str!("../../assets/priors/directionality_v1.tsv");
    parse_prior_tsv(content, "built-in priors v1")
}

pub fn load_builtin_flips_v1() -> Result<FlipRules> {
    let content = include_str!("../../assets/priors/posthoc_flips_v1.tsv");
    parse_flip_tsv(content, "built-in flips v1")
}

pub fn load_prior_tsv(path: &Path) -> Result<PriorTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read priors TSV {}", path.display()))?;
    parse_prior_tsv(&content, &path.display().to_string())
}

pub fn load_flip_tsv(path: &Path) -> Result<FlipRules> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read flips TSV {}", path.display()))?;
    parse_flip_tsv(&content, &path.display().to_string())
}

pub fn merge_priors(builtin: PriorTable, user: PriorTable) -> PriorTable {
    let mut entries: BTreeMap<u32, DirectionTargets> =
        builtin.iter().map(|(k, v)| (*k, *v)).collect();
    for (region, targets) in user.iter() {
        entries.insert(*region, *targets);
    }
    PriorTable::new(entries)
}

/// User rules replace built-in rules of the same name; new names append.
pub fn merge_flips(builtin: FlipRules, user: FlipRules) -> FlipRules {
    let mut user_rules = user.rules().to_vec();
    let mut merged = Vec::with_capacity(builtin.rules().len() + user_rules.len());
    for rule in builtin.rules() {
        if let Some(pos) = user_rules.iter().position(|u| u.rule == rule.rule) {
            merged.push(user_rules.remove(pos));
        } else {
            merged.push(rule.clone());
        }
    }
    merged.extend(user_rules);
    FlipRules::new(merged)
}

pub fn parse_prior_tsv(content: &str, source: &str) -> Result<PriorTable> {
    let mut entries = BTreeMap::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if parts.len() != 4 {
            bail!("{}:{} malformed TSV (expected 4 columns)", source, line_no);
        }
        let region: u32 = parts[0]
            .parse()
            .with_context(|| format!("{}:{} invalid region code '{}'", source, line_no, parts[0]))?;
        let mut targets = [ImageAxis::X; 3];
        for (axis, token) in parts[1..].iter().enumerate() {
            targets[axis] = ImageAxis::parse(token).with_context(|| {
                format!("{}:{} invalid image axis '{}'", source, line_no, token)
            })?;
        }
        if entries.insert(region, targets).is_some() {
            bail!("{}:{} duplicate prior for region {}", source, line_no, region);
        }
    }
    Ok(PriorTable::new(entries))
}

pub fn parse_flip_tsv(content: &str, source: &str) -> Result<FlipRules> {
    let mut rules: Vec<FlipRule> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if parts.len() != 5 {
            bail!("{}:{} malformed TSV (expected 5 columns)", source, line_no);
        }
        let rule = parts[0];
        let from = parts[2];
        let label = parts[3];
        if rule.is_empty() || from.is_empty() || label.is_empty() {
            bail!("{}:{} empty field in TSV", source, line_no);
        }
        let axis: usize = parts[1]
            .parse()
            .with_context(|| format!("{}:{} invalid axis '{}'", source, line_no, parts[1]))?;
        if !(1..=3).contains(&axis) {
            bail!("{}:{} axis must be 1-3", source, line_no);
        }
        let mut regions = BTreeSet::new();
        for token in parts[4].split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let code: u32 = token
                .parse()
                .with_context(|| format!("{}:{} invalid region code '{}'", source, line_no, token))?;
            regions.insert(code);
        }
        if rules.iter().any(|r| r.rule == rule) {
            bail!("{}:{} duplicate flip rule '{}'", source, line_no, rule);
        }
        rules.push(FlipRule {
            rule: rule.to_string(),
            axis,
            from: from.to_string(),
            label: label.to_string(),
            regions,
        });
    }
    Ok(FlipRules::new(rules))
}
