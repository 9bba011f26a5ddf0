//! Plain-text rendering of key reports.

use keyfinder::{spelled_name, KeyEstimate, KeyMode, KeyReport};
use kfconf::ReportConfig;

fn key_label(est: &KeyEstimate, opts: &ReportConfig) -> String {
    format!("{} {}", spelled_name(est.tonic, opts.spelling), est.mode)
}

/// Correlation table (optional) followed by the two most likely keys.
pub fn text(report: &KeyReport, opts: &ReportConfig) -> String {
    let mut out = String::new();

    if opts.show_table {
        for (heading, mode) in [
            ("Major key coefficients:", KeyMode::Major),
            ("Minor key coefficients:", KeyMode::Minor),
        ] {
            out.push_str(heading);
            out.push('\n');
            for est in report.table.iter().filter(|e| e.mode == mode) {
                out.push_str(&format!(
                    "{}: {:.*}\n",
                    spelled_name(est.tonic, opts.spelling),
                    opts.precision,
                    est.score
                ));
            }
            out.push('\n');
        }
    }

    out.push_str(&format!("Most likely: {}\n", key_label(&report.best, opts)));
    out.push_str(&format!(
        "Also possible: {}\n",
        key_label(&report.alternate, opts)
    ));
    out
}

/// One-line summary used by batch mode.
pub fn summary_line(source: &str, report: &KeyReport, opts: &ReportConfig) -> String {
    format!(
        "{}: {} ({:.*}), also possible: {}",
        source,
        key_label(&report.best, opts),
        opts.precision,
        report.best.score,
        key_label(&report.alternate, opts)
    )
}
