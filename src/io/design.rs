use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

const REQUIRED: [&str; 4] = ["group", "subject", "map", "seg"];
const ALT_SEG: &str = "alt_seg";

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSpec {
    pub id: String,
    /// Quantitative parameter map.
    pub map: PathBuf,
    /// Label volume holding the regions of interest.
    pub seg: PathBuf,
    /// Optional label volume the alternative axes are fitted on.
    pub alt_seg: Option<PathBuf>,
    /// Covariate values, aligned with `Design::covariate_names`.
    pub covariates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub name: String,
    pub subjects: Vec<SubjectSpec>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Design {
    pub covariate_names: Vec<String>,
    pub groups: Vec<GroupSpec>,
}

impl Design {
    pub fn n_subjects(&self) -> usize {
        self.groups.iter().map(|g| g.subjects.len()).sum()
    }
}

pub fn load_design(path: &Path) -> Result<Design> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read design TSV {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_design(&content, base, &path.display().to_string())
}

/// Header row names the columns; `group`, `subject`, `map` and `seg` are
/// required, `alt_seg` is optional, anything else is a covariate. Relative
/// paths resolve against `base`.
pub fn parse_design(content: &str, base: &Path, source: &str) -> Result<Design> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    let (_, header) = lines
        .next()
        .with_context(|| format!("{}: design has no header row", source))?;
    let columns: Vec<String> = header.split('\t').map(|c| c.trim().to_string()).collect();
    let find = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));

    let mut required = [0usize; 4];
    for (slot, name) in required.iter_mut().zip(REQUIRED) {
        *slot = find(name).with_context(|| format!("{}: missing '{}' column", source, name))?;
    }
    let [group_col, subject_col, map_col, seg_col] = required;
    let alt_col = find(ALT_SEG);
    let covariate_cols: Vec<usize> = (0..columns.len())
        .filter(|i| !required.contains(i) && Some(*i) != alt_col)
        .collect();

    let mut design = Design {
        covariate_names: covariate_cols.iter().map(|&i| columns[i].clone()).collect(),
        groups: Vec::new(),
    };
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() != columns.len() {
            bail!(
                "{}:{} expected {} columns, found {}",
                source,
                line_no,
                columns.len(),
                fields.len()
            );
        }
        let group = fields[group_col];
        let subject = fields[subject_col];
        if group.is_empty() || subject.is_empty() || fields[map_col].is_empty() || fields[seg_col].is_empty() {
            bail!("{}:{} empty required field", source, line_no);
        }
        if !seen.insert((group.to_string(), subject.to_string())) {
            bail!("{}:{} duplicate subject '{}' in group '{}'", source, line_no, subject, group);
        }

        let spec = SubjectSpec {
            id: subject.to_string(),
            map: resolve(base, fields[map_col]),
            seg: resolve(base, fields[seg_col]),
            alt_seg: alt_col
                .map(|i| fields[i])
                .filter(|f| !f.is_empty())
                .map(|f| resolve(base, f)),
            covariates: covariate_cols.iter().map(|&i| fields[i].to_string()).collect(),
        };

        match design.groups.iter_mut().find(|g| g.name == group) {
            Some(g) => g.subjects.push(spec),
            None => design.groups.push(GroupSpec {
                name: group.to_string(),
                subjects: vec![spec],
            }),
        }
    }

    if design.groups.is_empty() {
        bail!("{}: design lists no subjects", source);
    }
    Ok(design)
}

fn resolve(base: &Path, field: &str) -> PathBuf {
    let p = PathBuf::from(field);
    if p.is_absolute() { p } else { base.join(p) }
}
