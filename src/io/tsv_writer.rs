use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::GradientError;
use crate::profile::region::RegionResult;

/// Cohort summary: one row per (group, region, axis, segment).
pub fn write_tsv(path: &Path, results: &[RegionResult]) -> Result<(), GradientError> {
    write_with(path, |w| write_summary_rows(w, results))
}

/// Per-subject profiles in long form, one row per (subject, axis, segment).
pub fn write_profiles_tsv(path: &Path, results: &[RegionResult]) -> Result<(), GradientError> {
    write_with(path, |w| write_profile_rows(w, results))
}

fn write_with<F>(path: &Path, body: F) -> Result<(), GradientError>
where
    F: FnOnce(&mut BufWriter<std::fs::File>) -> std::io::Result<()>,
{
    let file = std::fs::File::create(path).map_err(|e| GradientError::persistence(path, e))?;
    let mut w = BufWriter::new(file);
    body(&mut w)
        .and_then(|_| w.flush())
        .map_err(|e| GradientError::persistence(path, e))
}

fn write_summary_rows<W: Write>(w: &mut W, results: &[RegionResult]) -> std::io::Result<()> {
    writeln!(
        w,
        "group\tregion\tregion_name\taxis\tlabel\tflip\tsegment\tcoord\tmean\tstd\tsem\tn_valid"
    )?;
    for result in results {
        let name = result.region_name.as_deref().unwrap_or("NA");
        for axis in &result.axes {
            let flip = axis.flip.as_ref().map(|f| f.rule.as_str()).unwrap_or("NA");
            for s in 0..axis.n_segments {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t{}\t{}\t{}\t{}",
                    result.group,
                    result.region,
                    name,
                    axis.axis,
                    axis.label,
                    flip,
                    s + 1,
                    axis.coords[s],
                    fmt_value(axis.mean[s]),
                    fmt_value(axis.std[s]),
                    fmt_value(axis.sem[s]),
                    axis.n_valid[s]
                )?;
            }
        }
    }
    Ok(())
}

fn write_profile_rows<W: Write>(w: &mut W, results: &[RegionResult]) -> std::io::Result<()> {
    write!(w, "group\tsubject\tregion\taxis\tlabel\tsegment\tcoord\tvalue")?;
    let covariate_names = results
        .first()
        .map(|r| r.covariate_names.as_slice())
        .unwrap_or(&[]);
    for name in covariate_names {
        write!(w, "\t{}", name)?;
    }
    writeln!(w)?;

    for result in results {
        for (j, subject) in result.subjects.iter().enumerate() {
            let covariates = &result.covariates[j];
            for axis in &result.axes {
                for s in 0..axis.n_segments {
                    write!(
                        w,
                        "{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t{}",
                        result.group,
                        subject,
                        result.region,
                        axis.axis,
                        axis.label,
                        s + 1,
                        axis.coords[s],
                        fmt_value(axis.matrix[s][j])
                    )?;
                    for value in covariates {
                        write!(w, "\t{}", value)?;
                    }
                    writeln!(w)?;
                }
            }
        }
    }
    Ok(())
}

fn fmt_value(v: f64) -> String {
    if v.is_finite() {
        format!("{:.6}", v)
    } else {
        "NA".to_string()
    }
}
