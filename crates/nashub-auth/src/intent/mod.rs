//! The intent permission evaluator.

pub mod evaluator;

pub use evaluator::IntentEvaluator;
