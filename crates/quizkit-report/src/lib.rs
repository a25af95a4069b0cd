//! quizkit-report: Rendering of graded attempt reports.
//!
//! Plain-text result sheets and self-contained HTML documents.

pub mod html;
pub mod text;
