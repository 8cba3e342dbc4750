use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kira_gradients::cli::{
    Cli, Commands, PolicyArg, PriorsCommand, PriorsShowArgs, RunArgs, StatArg, ValidateArgs,
};
use kira_gradients::config::{AnalysisConfig, parse_direction};
use kira_gradients::ctx::Ctx;
use kira_gradients::geometry::segment::SegmentPolicy;
use kira_gradients::io;
use kira_gradients::pipeline::Pipeline;
use kira_gradients::pipeline::stage1_design::Stage1Design;
use kira_gradients::pipeline::stage2_check::Stage2Check;
use kira_gradients::priors;
use kira_gradients::profile::Statistic;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => handle_run(args)?,
        Commands::Validate(args) => handle_validate(args)?,
        Commands::Priors(args) => match args.command {
            PriorsCommand::Show(show) => handle_priors_show(show)?,
        },
    }

    Ok(())
}

fn handle_run(args: RunArgs) -> Result<()> {
    let config = build_config(&args)?;
    let mut ctx = Ctx::new(
        args.design,
        args.out,
        args.roi,
        config,
        args.json,
        args.tsv,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.alt_roi_token = args.alt_roi;
    ctx.lut_path = args.lut;
    ctx.priors_path = args.priors;
    ctx.flips_path = args.flips;
    ctx.threads = args.threads;

    Pipeline::standard().run(&mut ctx)?;

    print_summary(&ctx)
}

fn build_config(args: &RunArgs) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::default();
    config.set_axes(&args.axes)?;
    config.set_segments(&args.segments)?;
    config.policy = match args.policy {
        PolicyArg::Equidistance => SegmentPolicy::Equidistance,
        PolicyArg::Equivolume => SegmentPolicy::Equivolume,
    };
    config.statistic = match args.stat {
        StatArg::Median => Statistic::Median,
        StatArg::Mean => Statistic::Mean,
    };
    config.erode = args.erode;
    config.invert = args.invert;
    config.baseline = args.baseline;
    config.direction = match &args.direction {
        Some(tokens) => Some(parse_direction(tokens)?),
        None => None,
    };
    config.strict = args.strict;
    config.posthoc_flips = !args.no_posthoc_flips;
    Ok(config)
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let config = AnalysisConfig {
        strict: args.strict,
        ..AnalysisConfig::default()
    };
    let mut ctx = Ctx::new(
        args.design,
        std::path::PathBuf::from("."),
        Vec::new(),
        config,
        false,
        false,
        env!("CARGO_PKG_VERSION"),
    );
    let pipeline = Pipeline::new(vec![
        Box::new(Stage1Design::new()),
        Box::new(Stage2Check::new()),
    ]);
    pipeline.run(&mut ctx)?;

    print_validate_summary(&ctx);
    Ok(())
}

fn handle_priors_show(args: PriorsShowArgs) -> Result<()> {
    let table = priors::load_priors(args.priors.as_deref())?;
    let rules = priors::load_flips(args.flips.as_deref())?;

    println!("directionality priors (version v1):");
    for (region, targets) in table.iter() {
        let axes: Vec<&str> = targets.iter().map(|t| t.label()).collect();
        println!("{}\t{}", region, axes.join("\t"));
    }
    println!("posthoc flips:");
    for rule in rules.rules() {
        let regions: Vec<String> = rule.regions.iter().map(u32::to_string).collect();
        println!(
            "{}\t{}\t{}\t{}\t{}",
            rule.rule,
            rule.axis,
            rule.from,
            rule.label,
            regions.join(",")
        );
    }
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    print_warnings(&ctx.warnings);
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) {
    if ctx.warnings.is_empty() {
        println!("kira-gradients validate ok");
    } else {
        println!("kira-gradients validate: {} problem(s)", ctx.warnings.len());
    }
    if let Some(design) = &ctx.design {
        println!("groups: {}", design.groups.len());
        println!("subjects: {}", design.n_subjects());
    }
    print_warnings(&ctx.warnings);
}

fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
}
