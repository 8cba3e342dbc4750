use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::profile::region::RegionResult;

pub const SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize)]
pub struct RegionMeta {
    pub code: u32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub design: String,
    pub groups: Vec<String>,
    pub n_subjects: usize,
    pub regions: Vec<RegionMeta>,
}

/// Top-level `gradients.json` document. Non-finite numbers serialize as
/// `null`.
#[derive(Debug, Clone, Serialize)]
pub struct GradientsV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input: InputMeta,
    pub config: AnalysisConfig,
    pub results: Vec<RegionResult>,
    pub warnings: Vec<String>,
}
