//! Text formatting of analysis results.

use crate::domain::RootCrossing;
use crate::report::AnalysisSummary;

/// Format the full run summary as terminal lines.
pub fn format_run_summary(summary: &AnalysisSummary, baseline_fixed: bool) -> String {
    let mut out = String::new();

    let source = if baseline_fixed {
        "fixed".to_string()
    } else {
        format!("mean of `{}`", summary.metric)
    };
    out.push_str(&format!("Baseline: {} ({source})\n", summary.baseline));
    out.push_str(&format!(
        "Rows: {} | degree: {} | accumulation: {:?}\n",
        summary.rows, summary.degree, summary.accumulation
    ));
    out.push_str(&format!(
        "Fitting took {:.3}s (rss={:.6e})\n",
        summary.fit_seconds, summary.rss
    ));
    out.push_str(&format!("Coefficients: {}\n", fmt_vec(&summary.params)));
    out.push('\n');

    out.push_str(&format!(
        "max_slope {}: {} ({})\n",
        summary.axis,
        summary.max_slope.axis_value,
        fmt_pct(summary.max_slope.fraction)
    ));

    out.push_str(&format!("grad1 roots: {}\n", fmt_indices(&summary.grad1_roots)));
    out.push_str(&format!(
        "grad1 root metrics: {}\n",
        fmt_list(summary.grad1_roots.iter().map(format_crossing))
    ));
    out.push_str(&format!("grad2 roots: {}\n", fmt_indices(&summary.grad2_roots)));
    out.push_str(&format!(
        "grad2 root metrics: {}\n",
        fmt_list(summary.grad2_roots.iter().map(format_crossing))
    ));

    out
}

/// `"<fraction>% <axis>"`, plus `" <slope>%"` when the crossing carries a slope.
pub fn format_crossing(root: &RootCrossing) -> String {
    match root.slope {
        Some(slope) => format!("{} {} {}", fmt_pct(root.fraction), root.axis_value, fmt_pct(slope)),
        None => format!("{} {}", fmt_pct(root.fraction), root.axis_value),
    }
}

fn fmt_pct(v: f64) -> String {
    format!("{:.3}%", v * 100.0)
}

fn fmt_indices(roots: &[RootCrossing]) -> String {
    let parts: Vec<String> = roots.iter().map(|r| r.index.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_list(items: impl Iterator<Item = String>) -> String {
    let parts: Vec<String> = items.map(|s| format!("{s:?}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Accumulation, Degree, MaxSlope};

    fn crossing(index: usize, fraction: f64, axis: &str, slope: Option<f64>) -> RootCrossing {
        RootCrossing {
            index,
            fraction,
            axis_value: axis.to_string(),
            slope,
        }
    }

    #[test]
    fn crossing_formats_percentages() {
        assert_eq!(format_crossing(&crossing(3, 0.125, "1500", None)), "12.500% 1500");
        assert_eq!(
            format_crossing(&crossing(3, 0.5, "x", Some(0.0123))),
            "50.000% x 1.230%"
        );
    }

    #[test]
    fn summary_lists_roots() {
        let summary = AnalysisSummary {
            rows: 4,
            metric: "test_score".to_string(),
            axis: "nodes".to_string(),
            baseline: 0.5,
            accumulation: Accumulation::RunningMean,
            degree: Degree(2),
            params: vec![1.0, 2.0, 3.0],
            rss: 0.0,
            fit_seconds: 0.25,
            max_slope: MaxSlope {
                index: 2,
                fraction: 0.75,
                axis_value: "300".to_string(),
                slope: 0.9,
            },
            grad1_roots: vec![crossing(1, 0.5, "200", None)],
            grad2_roots: vec![],
        };

        let txt = format_run_summary(&summary, false);
        assert!(txt.contains("Baseline: 0.5 (mean of `test_score`)"));
        assert!(txt.contains("Fitting took 0.250s"));
        assert!(txt.contains("max_slope nodes: 300 (75.000%)"));
        assert!(txt.contains("grad1 roots: [1]\n"));
        assert!(txt.contains("grad1 root metrics: [\"50.000% 200\"]\n"));
        assert!(txt.contains("grad2 roots: []\n"));
        assert!(txt.contains("grad2 root metrics: []\n"));
    }
}
