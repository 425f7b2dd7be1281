//! Decision support: choosing what to ask next.

pub mod voi;

pub use voi::{information_gain, rank_questions, QuestionCandidate};
