//! Plain-text result sheet.

use quizkit_core::report::{expected_summary, submitted_summary, AttemptReport};
use quizkit_core::time::format_duration;

const WIDTH: usize = 60;

/// Render a report as a plain-text result sheet.
pub fn render_text(report: &AttemptReport) -> String {
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);
    let mut lines = Vec::new();

    lines.push(heavy.clone());
    lines.push(format!("QUIZ RESULTS: {}", report.quiz.name));
    lines.push(heavy.clone());
    lines.push(format!("Participant: {}", report.participant_name()));
    lines.push(format!("Time taken:  {}", format_duration(report.elapsed_seconds)));
    lines.push(format!(
        "Graded:      {}",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(String::new());

    let s = &report.score;
    lines.push(light.clone());
    lines.push("SUMMARY".to_string());
    lines.push(light.clone());
    lines.push(format!(
        "Score:      {}% ({}/{})",
        s.percentage,
        s.correct,
        s.auto_gradable_total()
    ));
    lines.push(format!("Correct:    {}", s.correct));
    lines.push(format!("Incorrect:  {}", s.incorrect));
    if s.manual > 0 {
        lines.push(format!("Manual:     {} (needs review)", s.manual));
    }
    if s.unanswered() > 0 {
        lines.push(format!("Unanswered: {}", s.unanswered()));
    }
    lines.push(String::new());

    lines.push(light.clone());
    lines.push("DETAILS".to_string());
    lines.push(light);

    for (i, outcome) in report.outcomes.iter().enumerate() {
        lines.push(format!(
            "{}. [{}] {}",
            i + 1,
            outcome.marker(),
            outcome.resolved_prompt()
        ));
        match &outcome.answer {
            Some(answer) => {
                lines.push(format!("   Your answer: {}", submitted_summary(answer)));
                if outcome.marker() != "CORRECT" {
                    if let Some(expected) = expected_summary(answer) {
                        lines.push(format!("   Expected:    {expected}"));
                    }
                }
            }
            None => lines.push("   No answer given".to_string()),
        }
        lines.push(String::new());
    }

    lines.push(heavy.clone());
    lines.push("End of results".to_string());
    lines.push(heavy);

    lines.join("\n")
}
