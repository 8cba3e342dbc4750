use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::ctx::Ctx;
use crate::error::GradientError;
use crate::geometry::orient::Confidence;
use crate::io::design::SubjectSpec;
use crate::io::labels::Region;
use crate::io::volume::VolumeLoader;
use crate::pipeline::Stage;
use crate::priors::PriorTable;
use crate::profile::region::{SubjectOutcome, SubjectRecord};
use crate::profile::subject::{load_subject, profile_region};

#[cfg(feature = "mt")]
use rayon::prelude::*;

pub struct Stage3Subjects;

impl Stage3Subjects {
    pub fn new() -> Self {
        Self
    }
}

struct SubjectTask<'a> {
    group: usize,
    subject: usize,
    group_name: &'a str,
    spec: &'a SubjectSpec,
}

/// Shared read-only inputs of every subject task.
struct TaskEnv<'a> {
    loader: &'a dyn VolumeLoader,
    regions: &'a [Region],
    config: &'a AnalysisConfig,
    priors: &'a PriorTable,
}

impl Stage for Stage3Subjects {
    fn name(&self) -> &'static str {
        "stage3_subjects"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let design = ctx.design.as_ref().context("design not loaded")?;
        let priors = ctx.priors.as_ref().context("priors not loaded")?;
        let env = TaskEnv {
            loader: ctx.loader.as_ref(),
            regions: &ctx.regions,
            config: &ctx.config,
            priors,
        };

        let tasks: Vec<SubjectTask<'_>> = design
            .groups
            .iter()
            .enumerate()
            .flat_map(|(gi, group)| {
                group
                    .subjects
                    .iter()
                    .enumerate()
                    .map(move |(si, spec)| SubjectTask {
                        group: gi,
                        subject: si,
                        group_name: &group.name,
                        spec,
                    })
            })
            .collect();

        let per_subject = run_tasks(&tasks, &env, ctx.threads)?;
        let records: Vec<SubjectRecord> = per_subject.into_iter().flatten().collect();

        let mut warnings = Vec::new();
        for record in &records {
            let group = &design.groups[record.group];
            let subject = &group.subjects[record.subject].id;
            match &record.outcome {
                SubjectOutcome::Missing { reason } => warnings.push(format!(
                    "{}/{} region {}: missing ({})",
                    group.name, subject, record.region, reason
                )),
                SubjectOutcome::Profiled(p) if p.confidence == Confidence::Degraded => {
                    warnings.push(format!(
                        "{}/{} region {}: axis signs not guaranteed consistent across subjects",
                        group.name, subject, record.region
                    ))
                }
                SubjectOutcome::Profiled(_) => {}
            }
        }

        info!(
            tasks = tasks.len(),
            records = records.len(),
            warnings = warnings.len(),
            "subject_profiles_ready"
        );
        ctx.warnings.extend(warnings);
        ctx.records = records;
        Ok(())
    }
}

#[cfg(feature = "mt")]
fn run_tasks(
    tasks: &[SubjectTask<'_>],
    env: &TaskEnv<'_>,
    threads: usize,
) -> Result<Vec<Vec<SubjectRecord>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
    let out = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| run_subject(task, env))
            .collect::<Result<Vec<_>, GradientError>>()
    })?;
    Ok(out)
}

#[cfg(not(feature = "mt"))]
fn run_tasks(
    tasks: &[SubjectTask<'_>],
    env: &TaskEnv<'_>,
    threads: usize,
) -> Result<Vec<Vec<SubjectRecord>>> {
    let _ = threads;
    let out = tasks
        .iter()
        .map(|task| run_subject(task, env))
        .collect::<Result<Vec<_>, GradientError>>()?;
    Ok(out)
}

/// One subject, every requested region. Recoverable failures become
/// missing records; anything else (or any failure in strict mode) aborts.
fn run_subject(
    task: &SubjectTask<'_>,
    env: &TaskEnv<'_>,
) -> Result<Vec<SubjectRecord>, GradientError> {
    let record = |region: u32, outcome: SubjectOutcome| SubjectRecord {
        group: task.group,
        subject: task.subject,
        region,
        outcome,
    };

    let volumes = match load_subject(task.spec, env.loader) {
        Ok(v) => v,
        Err(err) if err.is_recoverable() && !env.config.strict => {
            warn!(
                group = task.group_name,
                subject = %task.spec.id,
                error = %err,
                "subject skipped"
            );
            let reason = err.to_string();
            return Ok(env
                .regions
                .iter()
                .map(|r| {
                    record(
                        r.code,
                        SubjectOutcome::Missing {
                            reason: reason.clone(),
                        },
                    )
                })
                .collect());
        }
        Err(err) => return Err(err),
    };

    let mut out = Vec::with_capacity(env.regions.len());
    for region in env.regions {
        let policy = env.priors.policy_for(region.code, env.config.direction);
        match profile_region(&volumes, region.code, env.config, &policy) {
            Ok(profiles) => {
                if profiles.confidence == Confidence::Degraded {
                    warn!(
                        group = task.group_name,
                        subject = %task.spec.id,
                        region = region.code,
                        notes = ?profiles.notes,
                        "axis orientation degraded"
                    );
                }
                out.push(record(region.code, SubjectOutcome::Profiled(profiles)));
            }
            Err(err) if err.is_recoverable() && !env.config.strict => {
                warn!(
                    group = task.group_name,
                    subject = %task.spec.id,
                    region = region.code,
                    error = %err,
                    "region skipped"
                );
                out.push(record(
                    region.code,
                    SubjectOutcome::Missing {
                        reason: err.to_string(),
                    },
                ));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}
