use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::profile::region::{SubjectOutcome, combine_region};

pub struct Stage4Cohort;

impl Stage4Cohort {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Cohort {
    fn name(&self) -> &'static str {
        "stage4_cohort"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let design = ctx.design.as_ref().context("design not loaded")?;
        let flips = ctx.flips.as_ref().context("flip rules not loaded")?;

        let index: HashMap<(usize, usize, u32), &SubjectOutcome> = ctx
            .records
            .iter()
            .map(|r| ((r.group, r.subject, r.region), &r.outcome))
            .collect();

        let mut results = Vec::with_capacity(design.groups.len() * ctx.regions.len());
        for (gi, group) in design.groups.iter().enumerate() {
            for region in &ctx.regions {
                let outcomes: Vec<Option<&SubjectOutcome>> = (0..group.subjects.len())
                    .map(|si| index.get(&(gi, si, region.code)).copied())
                    .collect();
                let result = combine_region(
                    group,
                    &design.covariate_names,
                    region,
                    &outcomes,
                    &ctx.config,
                    flips,
                );
                info!(
                    group = %group.name,
                    region = region.code,
                    subjects = result.subjects.len(),
                    missing = result.n_missing(),
                    "region_combined"
                );
                results.push(result);
            }
        }

        ctx.results = results;
        Ok(())
    }
}
