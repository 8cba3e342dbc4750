use clap::Parser;
use kira_gradients::cli::{Cli, Commands, PolicyArg, PriorsCommand, StatArg};

#[test]
fn run_args_parse() {
    let cli = Cli::parse_from([
        "kira-gradients",
        "run",
        "--design",
        "d.tsv",
        "--out",
        "o",
        "--roi",
        "17",
        "Left-Putamen",
        "--segments",
        "5,7",
        "--axes",
        "1,3",
        "--policy",
        "equivolume",
        "--stat",
        "mean",
        "--direction",
        "y,z,x",
        "--erode",
        "--no-posthoc-flips",
    ]);
    let Commands::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.roi, vec!["17", "Left-Putamen"]);
    assert_eq!(args.segments, vec![5, 7]);
    assert_eq!(args.axes, vec![1, 3]);
    assert_eq!(args.policy, PolicyArg::Equivolume);
    assert_eq!(args.stat, StatArg::Mean);
    assert_eq!(
        args.direction,
        Some(vec!["y".to_string(), "z".to_string(), "x".to_string()])
    );
    assert!(args.erode);
    assert!(args.no_posthoc_flips);
    assert!(!args.strict);
    assert_eq!(args.threads, 0);
}

#[test]
fn run_defaults() {
    let cli = Cli::parse_from([
        "kira-gradients",
        "run",
        "--design",
        "d.tsv",
        "--out",
        "o",
        "--roi",
        "17",
    ]);
    let Commands::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert!(args.segments.is_empty());
    assert_eq!(args.axes, vec![1, 2, 3]);
    assert_eq!(args.policy, PolicyArg::Equidistance);
    assert_eq!(args.stat, StatArg::Median);
    assert!(args.direction.is_none());
}

#[test]
fn priors_show_parse() {
    let cli = Cli::parse_from(["kira-gradients", "priors", "show"]);
    let Commands::Priors(args) = cli.command else {
        panic!("expected priors");
    };
    let PriorsCommand::Show(show) = args.command;
    assert!(show.priors.is_none());
}
