//! Rule-based analysis of normalized paper text.
//!
//! The extractors are independent pure functions over `&str` and a shared
//! [`RuleSet`](paperlens_rules::RuleSet), so they can run in any order.
//! None of them fail: finding nothing is the expected outcome for many
//! documents and is reported through empty fields.

pub mod classify;
pub mod info;
pub mod innovation;
pub mod text;

pub use classify::classify;
pub use info::{MAX_AUTHORS, MAX_INSTITUTIONS, extract_paper_info};
pub use innovation::extract_innovation;
pub use text::{normalize, paragraphs};
