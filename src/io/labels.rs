use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::io::open_maybe_gz;

/// Maps numeric region codes to names. Region identity elsewhere is the
/// opaque `(code, name)` pair this returns.
pub trait LabelResolver {
    fn name(&self, code: u32) -> Option<&str>;
    fn code(&self, name: &str) -> Option<u32>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub code: u32,
    pub name: Option<String>,
}

impl Region {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.code.to_string())
    }
}

/// FreeSurfer `ColorLUT` style table: `code name r g b a`, `#` comments.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    names: BTreeMap<u32, String>,
}

impl LookupTable {
    pub fn builtin() -> Result<Self> {
        let content = include_str!("../../assets/lut/subcortical_lut.txt");
        Self::parse(content, "built-in LUT")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut content = String::new();
        open_maybe_gz(path)
            .with_context(|| format!("failed to open LUT {}", path.display()))?
            .read_to_string(&mut content)
            .with_context(|| format!("failed to read LUT {}", path.display()))?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, source: &str) -> Result<Self> {
        let mut names = BTreeMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut parts = trimmed.split_whitespace();
            let code = parts.next().unwrap_or_default();
            let name = parts
                .next()
                .with_context(|| format!("{}:{} missing region name", source, idx + 1))?;
            let code: u32 = code
                .parse()
                .with_context(|| format!("{}:{} invalid region code '{}'", source, idx + 1, code))?;
            names.insert(code, name.to_string());
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a CLI token: a numeric code (name optional) or a LUT name.
    pub fn resolve(&self, token: &str) -> Result<Region> {
        let token = token.trim();
        if let Ok(code) = token.parse::<u32>() {
            return Ok(Region {
                code,
                name: self.name(code).map(str::to_string),
            });
        }
        match self.code(token) {
            Some(code) => Ok(Region {
                code,
                name: self.name(code).map(str::to_string),
            }),
            None => bail!("unknown region '{}' (not a code and not in the LUT)", token),
        }
    }
}

impl LabelResolver for LookupTable {
    fn name(&self, code: u32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    fn code(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(c, _)| *c)
    }
}
