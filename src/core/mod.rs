pub mod catalog;
pub mod classify;
pub mod delta;
pub mod engine;
pub mod history;
pub mod matching;
pub mod normalize;
pub mod state;
pub mod types;
