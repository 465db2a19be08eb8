use smartstring::{LazyCompact, SmartString};

pub mod config;
pub mod context;
pub mod continuation;
pub mod engine;
pub mod indent;
pub mod input;
pub mod pairs;
pub mod plan;
pub mod view;
pub mod xml;

pub type Tendril = SmartString<LazyCompact>;
