use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-gradients",
    version,
    about = "Principal-axis gradient profiles of MRI parameter maps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Validate(ValidateArgs),
    Priors(PriorsArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Design TSV: group, subject, map, seg[, alt_seg, covariates...]")]
    pub design: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(
        long,
        required = true,
        num_args = 1..,
        help = "Region code or lookup-table name (repeatable)"
    )]
    pub roi: Vec<String>,

    #[arg(long, help = "Label lookup table (code name ...), replaces the built-in one")]
    pub lut: Option<PathBuf>,

    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        help = "Segments per axis: one value for all, or one per selected axis"
    )]
    pub segments: Vec<usize>,

    #[arg(long, value_enum, default_value_t = PolicyArg::Equidistance)]
    pub policy: PolicyArg,

    #[arg(long, value_enum, default_value_t = StatArg::Median)]
    pub stat: StatArg,

    #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
    pub axes: Vec<usize>,

    #[arg(long, default_value_t = false, help = "Erode region masks by one voxel")]
    pub erode: bool,

    #[arg(long, default_value_t = false, help = "Use reciprocal map values")]
    pub invert: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Subtract the whole-region statistic from every segment"
    )]
    pub baseline: bool,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Target image axis per computed axis, e.g. y,z,x"
    )]
    pub direction: Option<Vec<String>>,

    #[arg(long, help = "Directionality prior TSV to overlay on the built-in table")]
    pub priors: Option<PathBuf>,

    #[arg(long, help = "Post-hoc flip rule TSV to overlay on the built-in rules")]
    pub flips: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_posthoc_flips: bool,

    #[arg(long, help = "Region whose voxels define the axes")]
    pub alt_roi: Option<String>,

    #[arg(long, default_value_t = false, help = "Abort on the first subject failure")]
    pub strict: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub design: PathBuf,

    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct PriorsArgs {
    #[command(subcommand)]
    pub command: PriorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PriorsCommand {
    Show(PriorsShowArgs),
}

#[derive(Debug, Args)]
pub struct PriorsShowArgs {
    #[arg(long, help = "Optional prior TSV to overlay on the built-in table")]
    pub priors: Option<PathBuf>,

    #[arg(long, help = "Optional flip rule TSV to overlay on the built-in rules")]
    pub flips: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Equidistance,
    Equivolume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatArg {
    Median,
    Mean,
}
