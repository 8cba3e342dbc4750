use std::fmt::Write;

use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let design = ctx.design.as_ref().context("design not loaded")?;

    let mut out = String::new();
    writeln!(out, "kira-gradients v{}", version)?;
    writeln!(
        out,
        "Design: {} groups, {} subjects, {} regions",
        design.groups.len(),
        design.n_subjects(),
        ctx.regions.len()
    )?;
    let axes: Vec<String> = ctx.config.axes.iter().map(|a| a.to_string()).collect();
    writeln!(
        out,
        "Axes: {} ({:?}, {:?})",
        axes.join(","),
        ctx.config.policy,
        ctx.config.statistic
    )?;

    for result in &ctx.results {
        let name = result
            .region_name
            .clone()
            .unwrap_or_else(|| result.region.to_string());
        let labels: Vec<&str> = result.axes.iter().map(|a| a.label.as_str()).collect();
        writeln!(
            out,
            "{}/{}: {} subjects, {} missing, {} degraded, axes {}",
            result.group,
            name,
            result.subjects.len(),
            result.n_missing(),
            result.n_degraded(),
            labels.join(",")
        )?;
    }

    Ok(out)
}
