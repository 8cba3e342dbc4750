use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::error::GradientError;
use crate::schema::v1::{GradientsV1, InputMeta, RegionMeta, SCHEMA_VERSION};

pub fn build_report(ctx: &Ctx) -> Result<GradientsV1> {
    let design = ctx.design.as_ref().context("design not loaded")?;
    let input = InputMeta {
        design: ctx.design_path.display().to_string(),
        groups: design.groups.iter().map(|g| g.name.clone()).collect(),
        n_subjects: design.n_subjects(),
        regions: ctx
            .regions
            .iter()
            .map(|r| RegionMeta {
                code: r.code,
                name: r.name.clone(),
            })
            .collect(),
    };

    Ok(GradientsV1 {
        tool: "kira-gradients".to_string(),
        version: ctx.tool_version.clone(),
        schema_version: SCHEMA_VERSION.to_string(),
        input,
        config: ctx.config.clone(),
        results: ctx.results.clone(),
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &GradientsV1) -> Result<(), GradientError> {
    let file = std::fs::File::create(path).map_err(|e| GradientError::persistence(path, e))?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| GradientError::persistence(path, e.into()))?;
    writer
        .flush()
        .map_err(|e| GradientError::persistence(path, e))?;
    Ok(())
}
