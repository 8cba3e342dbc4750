use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::design::load_design;
use crate::io::labels::{LookupTable, Region};
use crate::pipeline::Stage;
use crate::priors;

pub struct Stage1Design;

impl Stage1Design {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Design {
    fn name(&self) -> &'static str {
        "stage1_design"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let design = load_design(&ctx.design_path)?;
        info!(
            design = %ctx.design_path.display(),
            groups = design.groups.len(),
            subjects = design.n_subjects(),
            "design_loaded"
        );

        let lut = match &ctx.lut_path {
            Some(path) => LookupTable::load(path)?,
            None => LookupTable::builtin()?,
        };

        let mut regions = Vec::with_capacity(ctx.roi_tokens.len());
        for token in &ctx.roi_tokens {
            let region = lut
                .resolve(token)
                .with_context(|| format!("failed to resolve region '{}'", token))?;
            if regions.iter().any(|r: &Region| r.code == region.code) {
                continue;
            }
            regions.push(region);
        }

        if let Some(token) = &ctx.alt_roi_token {
            let alt = lut
                .resolve(token)
                .with_context(|| format!("failed to resolve alternative region '{}'", token))?;
            info!(alt_roi = alt.code, "alternative_axes_region");
            ctx.config.alt_roi = Some(alt.code);
        }

        let prior_table = priors::load_priors(ctx.priors_path.as_deref())?;
        let flip_rules = priors::load_flips(ctx.flips_path.as_deref())?;

        for region in &regions {
            if ctx.config.direction.is_none() && prior_table.get(region.code).is_none() {
                let msg = format!(
                    "no directionality prior for region {}; axis signs use the dominant-loading fallback",
                    region.display_name()
                );
                warn!("{}", msg);
                ctx.warnings.push(msg);
            }
        }

        info!(
            regions = regions.len(),
            priors = prior_table.len(),
            flip_rules = flip_rules.rules().len(),
            "conventions_ready"
        );

        ctx.design = Some(design);
        ctx.lut = Some(lut);
        ctx.regions = regions;
        ctx.priors = Some(prior_table);
        ctx.flips = Some(flip_rules);
        Ok(())
    }
}
