//! quizkit-core: Quiz model, grading engine, and corpus estimation.
//!
//! This crate defines the question and answer model, the per-kind grading
//! rules, score aggregation, and the time/difficulty estimation that is
//! normalized across a whole quiz corpus.

pub mod answer;
pub mod config;
pub mod corpus;
pub mod difficulty;
pub mod error;
pub mod grading;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod statistics;
pub mod time;
