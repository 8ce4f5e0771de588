// Resume analysis and chat: model fallback chain, output normalization and
// the local synthesis used when no model answers.

pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod synthesis;
