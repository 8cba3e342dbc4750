use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage5Output;

impl Stage5Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Output {
    fn name(&self) -> &'static str {
        "stage5_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = json_writer::build_report(ctx)?;

        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, &report)?;
        }
        if ctx.write_tsv {
            tsv_writer::write_tsv(&ctx.output.tsv_path, &ctx.results)?;
            tsv_writer::write_profiles_tsv(&ctx.output.profiles_path, &ctx.results)?;
        }

        ctx.report = Some(report);
        info!(
            out_dir = %ctx.output.out_dir.display(),
            json = ctx.write_json,
            tsv = ctx.write_tsv,
            "stage5_output_ready"
        );
        Ok(())
    }
}
