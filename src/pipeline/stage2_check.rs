use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::profile::subject::load_subject;

/// Load every subject once and report unreadable files or mismatched
/// shapes without computing anything.
pub struct Stage2Check;

impl Stage2Check {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Check {
    fn name(&self) -> &'static str {
        "stage2_check"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let design = ctx.design.as_ref().context("design not loaded")?;
        let mut problems = 0usize;
        for group in &design.groups {
            for subject in &group.subjects {
                match load_subject(subject, ctx.loader.as_ref()) {
                    Ok(volumes) => info!(
                        group = %group.name,
                        subject = %subject.id,
                        dims = ?volumes.seg.dims,
                        "subject_ok"
                    ),
                    Err(err) => {
                        warn!(group = %group.name, subject = %subject.id, error = %err, "subject_invalid");
                        ctx.warnings
                            .push(format!("{}/{}: {}", group.name, subject.id, err));
                        problems += 1;
                    }
                }
            }
        }
        if problems > 0 && ctx.config.strict {
            bail!("{} subject(s) failed validation", problems);
        }
        Ok(())
    }
}
