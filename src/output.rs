//! CLI output formatting for job reports.
//!
//! Each upload prints as a header line (its path) followed by one indented
//! line per requested format:
//!
//! ```text
//! uploads/cat.jpg
//!     thumb: 200x200 → cat.jpg:thumb
//!     cover: 630x630, backdrop fallback, watermark → cat.jpg:cover
//!     (unnamed): skipped
//!     banner: failed: failed to create ...
//! ```
//!
//! `format_*` functions return lines for testability; `print_*` wrappers
//! write them to stdout.

use crate::job::{BackdropSource, JobReport, VariantOutcome, VariantReport};
use crate::validate::ValidationError;
use std::path::Path;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn variant_line(variant: &VariantReport) -> String {
    let name = if variant.format.is_empty() {
        "(unnamed)"
    } else {
        variant.format.as_str()
    };

    match &variant.outcome {
        VariantOutcome::Written {
            path,
            width,
            height,
            watermarked,
            backdrop,
        } => {
            let mut details = vec![format!("{width}x{height}")];
            match backdrop {
                BackdropSource::None => {}
                BackdropSource::Asset => details.push("backdrop".into()),
                BackdropSource::Fallback => details.push("backdrop fallback".into()),
            }
            if *watermarked {
                details.push("watermark".into());
            }
            format!("    {name}: {} → {}", details.join(", "), file_name(path))
        }
        VariantOutcome::Skipped => format!("    {name}: skipped"),
        VariantOutcome::Failed(e) => format!("    {name}: failed: {e}"),
    }
}

/// Lines for one finished job.
pub fn format_report(report: &JobReport) -> Vec<String> {
    let mut lines = vec![report.key.display().to_string()];
    if report.variants.is_empty() {
        lines.push("    no formats requested".to_string());
    }
    lines.extend(report.variants.iter().map(variant_line));
    lines
}

pub fn print_report(report: &JobReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

/// Line for an upload rejected before queuing.
pub fn format_rejection(path: &Path, error: &ValidationError) -> String {
    format!("{}\n    rejected: {}", path.display(), error)
}

/// Summary after all jobs have reported.
pub fn format_summary(reports: usize, written: usize, failed: usize, rejected: usize) -> String {
    format!(
        "Processed {} {}: {} variants written, {} failed, {} rejected",
        reports,
        if reports == 1 { "upload" } else { "uploads" },
        written,
        failed,
        rejected
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RenderError;
    use std::path::PathBuf;

    fn report() -> JobReport {
        let mut report = JobReport::new("uploads/cat.jpg");
        report.variants = vec![
            VariantReport {
                format: "thumb".into(),
                outcome: VariantOutcome::Written {
                    path: PathBuf::from("uploads/cat.jpg:thumb"),
                    width: 200,
                    height: 200,
                    watermarked: false,
                    backdrop: BackdropSource::None,
                },
            },
            VariantReport {
                format: "cover".into(),
                outcome: VariantOutcome::Written {
                    path: PathBuf::from("uploads/cat.jpg:cover"),
                    width: 630,
                    height: 630,
                    watermarked: true,
                    backdrop: BackdropSource::Fallback,
                },
            },
            VariantReport {
                format: String::new(),
                outcome: VariantOutcome::Skipped,
            },
            VariantReport {
                format: "odd".into(),
                outcome: VariantOutcome::Failed(RenderError::UnknownFormat("cat.bmp".into())),
            },
        ];
        report
    }

    #[test]
    fn report_lines() {
        let lines = format_report(&report());
        assert_eq!(
            lines,
            vec![
                "uploads/cat.jpg",
                "    thumb: 200x200 → cat.jpg:thumb",
                "    cover: 630x630, backdrop fallback, watermark → cat.jpg:cover",
                "    (unnamed): skipped",
                "    odd: failed: cannot determine output format for cat.bmp",
            ]
        );
    }

    #[test]
    fn empty_report_says_so() {
        let lines = format_report(&JobReport::new("a.png"));
        assert_eq!(lines, vec!["a.png", "    no formats requested"]);
    }

    #[test]
    fn rejection_line() {
        let line = format_rejection(Path::new("notes.txt"), &ValidationError::NotAnImage);
        assert_eq!(line, "notes.txt\n    rejected: not an image");
    }

    #[test]
    fn summary_pluralizes() {
        assert_eq!(
            format_summary(1, 2, 0, 0),
            "Processed 1 upload: 2 variants written, 0 failed, 0 rejected"
        );
        assert!(format_summary(3, 0, 1, 2).starts_with("Processed 3 uploads"));
    }
}
