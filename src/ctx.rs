use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::io::design::Design;
use crate::io::labels::{LookupTable, Region};
use crate::io::volume::{NiftiLoader, VolumeLoader};
use crate::priors::{FlipRules, PriorTable};
use crate::profile::{RegionResult, SubjectRecord};
use crate::schema::v1::GradientsV1;

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
    pub profiles_path: PathBuf,
}

pub struct Ctx {
    pub design_path: PathBuf,
    pub roi_tokens: Vec<String>,
    pub alt_roi_token: Option<String>,
    pub lut_path: Option<PathBuf>,
    pub priors_path: Option<PathBuf>,
    pub flips_path: Option<PathBuf>,
    pub config: AnalysisConfig,
    pub threads: usize,
    pub write_json: bool,
    pub write_tsv: bool,
    pub tool_version: String,
    pub loader: Arc<dyn VolumeLoader>,
    pub design: Option<Design>,
    pub lut: Option<LookupTable>,
    pub regions: Vec<Region>,
    pub priors: Option<PriorTable>,
    pub flips: Option<FlipRules>,
    pub records: Vec<SubjectRecord>,
    pub results: Vec<RegionResult>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: Option<GradientsV1>,
}

impl Ctx {
    pub fn new(
        design_path: PathBuf,
        out_dir: PathBuf,
        roi_tokens: Vec<String>,
        config: AnalysisConfig,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("gradients.json");
        let tsv_path = out_dir.join("gradients.tsv");
        let profiles_path = out_dir.join("profiles.tsv");
        Self {
            design_path,
            roi_tokens,
            alt_roi_token: None,
            lut_path: None,
            priors_path: None,
            flips_path: None,
            config,
            threads: 0,
            write_json,
            write_tsv,
            tool_version: tool_version.to_string(),
            loader: Arc::new(NiftiLoader),
            design: None,
            lut: None,
            regions: Vec::new(),
            priors: None,
            flips: None,
            records: Vec::new(),
            results: Vec::new(),
            warnings: Vec::new(),
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
                profiles_path,
            },
            report: None,
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn VolumeLoader>) -> Self {
        self.loader = loader;
        self
    }
}
