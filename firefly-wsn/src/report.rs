//! Deployment reports (JSON, plain text, SVG).
//!
//! Everything renders to a `String`; writing files is left to the caller.
//!
//! - pretty-printed JSON of any run or comparison
//! - a fixed-width summary table for console logs
//! - a self-contained SVG of the final layout with sensing disks

use serde::Serialize;

use crate::compare::VariantComparison;
use crate::DeploymentReport;

/// Pretty-print any report as JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// One line per variant: rank, name, final and peak coverage, evaluations.
pub fn render_summary(comparison: &VariantComparison) -> String {
    let mut out = format!(
        "{} sensors, radius {}, field {}x{}, seed {}\n",
        comparison.problem.sensor_count,
        comparison.problem.radius,
        comparison.problem.area_side,
        comparison.problem.area_side,
        comparison.rng_seed,
    );
    out.push_str(&format!(
        "{:<4} {:<18} {:>9} {:>9} {:>8}\n",
        "rank", "variant", "coverage", "peak", "evals"
    ));
    for (rank, outcome) in comparison.outcomes.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<18} {:>8.2}% {:>8.2}% {:>8}\n",
            rank + 1,
            outcome.variant.name(),
            outcome.coverage * 100.0,
            outcome.peak_coverage * 100.0,
            outcome.fitness_calls,
        ));
    }
    out
}

/// Draw the returned layout: field outline, one disk of the sensing radius
/// per sensor, sensor points and a title with the final coverage.
pub fn render_layout_svg(report: &DeploymentReport) -> String {
    let problem = &report.deployment.problem;
    let size = 600.0;
    let margin = 40.0;
    let scale = size / problem.area_side;
    let width = size + 2.0 * margin;
    let height = width + 20.0;
    let px = |v: f64| margin + v * scale;
    // SVG y grows downward; the field's y axis grows upward.
    let py = |v: f64| 20.0 + margin + (problem.area_side - v) * scale;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\">"
    ));
    svg.push_str("<style>.t{font:16px ui-monospace, SFMono-Regular, Menlo, Monaco, monospace}.f{stroke:#222;stroke-width:2;fill:none}.d{fill:#1f77b4;fill-opacity:0.18;stroke:#1f77b4;stroke-width:1}.p{fill:#d62728}</style>");
    svg.push_str(&format!(
        "<text class=\"t\" x=\"{margin}\" y=\"30\">{} | coverage {:.2}%</text>",
        escape_xml(report.deployment.variant.name()),
        report.coverage() * 100.0
    ));
    svg.push_str(&format!(
        "<rect class=\"f\" x=\"{}\" y=\"{}\" width=\"{size}\" height=\"{size}\"/>",
        px(0.0),
        py(problem.area_side)
    ));

    let r = problem.radius * scale;
    for (x, y) in report.sensors() {
        svg.push_str(&format!(
            "<circle class=\"d\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{r:.2}\"/>",
            px(x),
            py(y)
        ));
    }
    for (x, y) in report.sensors() {
        svg.push_str(&format!(
            "<circle class=\"p\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"2.5\"/>",
            px(x),
            py(y)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_variants;
    use crate::{CoverageProblem, Deployment, FireflyConfig, Variant};

    fn small_problem() -> CoverageProblem {
        CoverageProblem::default()
            .with_sensor_count(6)
            .with_radius(10.0)
            .with_grid_resolution(16)
    }

    fn small_config() -> FireflyConfig {
        FireflyConfig::builder()
            .population_size(4)
            .max_generations(2)
            .build()
    }

    fn small_report() -> DeploymentReport {
        Deployment::builder()
            .problem(small_problem())
            .config(small_config())
            .variant(Variant::elitist_attractor())
            .build()
            .run()
            .unwrap()
    }

    #[test]
    fn json_round_trips_a_deployment() {
        let report = small_report();
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"kind\": \"elitist_attractor\""));
        let back: DeploymentReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.deployment, report.deployment);
        assert_eq!(back.result.convergence.len(), 2);
        assert!(back.result.best.max_abs_diff(&report.result.best) < 1e-9);
    }

    #[test]
    fn summary_lists_every_variant() {
        let comparison = compare_variants(small_problem(), &small_config(), 1).unwrap();
        let summary = render_summary(&comparison);
        assert_eq!(summary.lines().count(), 2 + 4);
        for name in ["standard", "decaying-alpha", "levy-flight", "elitist-attractor"] {
            assert!(summary.contains(name));
        }
        assert!(summary.lines().nth(2).unwrap().starts_with("1 "));
    }

    #[test]
    fn svg_draws_one_disk_and_point_per_sensor() {
        let report = small_report();
        let svg = render_layout_svg(&report);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"d\"").count(), 6);
        assert_eq!(svg.matches("class=\"p\"").count(), 6);
        assert!(svg.contains("elitist-attractor | coverage"));
    }
}
