//! Material resolution for imported scenes

mod resolver;

pub use resolver::{MaterialResolver, PbrChannel};
