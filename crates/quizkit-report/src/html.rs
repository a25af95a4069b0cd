//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use quizkit_core::report::{expected_summary, submitted_summary, AttemptReport};
use quizkit_core::results::ScoreSummary;
use quizkit_core::time::format_duration;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a graded attempt.
pub fn generate_html(report: &AttemptReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Quiz results: {}</title>\n",
        html_escape(&report.quiz.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.quiz.name)));
    html.push_str(&format!(
        "<p class=\"meta\">Participant: <strong>{}</strong> | Time: {} | {} questions | Difficulty: {} ({}) | {}</p>\n",
        html_escape(report.participant_name()),
        format_duration(report.elapsed_seconds),
        report.quiz.question_count,
        report.quiz.difficulty,
        report.quiz.difficulty_score,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    let s = &report.score;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">{}%</p>\n<p class=\"meta\">{} of {} auto-graded questions correct</p>\n",
        s.percentage,
        s.correct,
        s.auto_gradable_total()
    ));
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Correct</th><th>Incorrect</th><th>Manual review</th><th>Unanswered</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td class=\"correct\">{}</td><td class=\"incorrect\">{}</td><td class=\"manual\">{}</td><td>{}</td></tr></tbody>\n",
        s.correct,
        s.incorrect,
        s.manual,
        s.unanswered()
    ));
    html.push_str("</table>\n");
    if s.total > 0 {
        html.push_str(&generate_bar_chart(s));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Details</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Question</th><th onclick=\"sortTable(2)\">Kind</th><th onclick=\"sortTable(3)\">Result</th><th>Your answer</th><th>Expected</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, o) in report.outcomes.iter().enumerate() {
        let class = o.marker().to_lowercase();
        let (given, expected) = match &o.answer {
            Some(a) => (submitted_summary(a), expected_summary(a).unwrap_or_default()),
            None => (String::new(), String::new()),
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            i + 1,
            html_escape(&o.resolved_prompt()),
            o.kind,
            o.marker(),
            html_escape(&given),
            html_escape(&expected)
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AttemptReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Stacked horizontal bar of the verdict counts.
fn generate_bar_chart(score: &ScoreSummary) -> String {
    let max_width = 600.0;
    let bar_height = 24;

    let segments = [
        (score.correct, "#22c55e", "correct"),
        (score.incorrect, "#ef4444", "incorrect"),
        (score.manual, "#eab308", "manual"),
        (score.unanswered(), "#9ca3af", "unanswered"),
    ];

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width as u32,
        bar_height
    );

    let mut x = 0.0;
    for (count, color, label) in segments {
        if count == 0 {
            continue;
        }
        let width = count as f64 / score.total as f64 * max_width;
        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"0\" width=\"{width:.1}\" height=\"{bar_height}\" fill=\"{color}\"><title>{count} {label}</title></rect>\n"
        ));
        x += width;
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --correct: #dcfce7; --incorrect: #fde2e2; --manual: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --correct: #064e3b; --incorrect: #7f1d1d; --manual: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 3rem; font-weight: bold; margin: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.correct { background: var(--correct); }
.incorrect { background: var(--incorrect); }
.manual { background: var(--manual); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = Number(va), nb = Number(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
