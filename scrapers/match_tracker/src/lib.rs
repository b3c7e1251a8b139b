pub mod assembler;
pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod fixture_page;
pub mod markup;
pub mod render;
pub mod resolver;
pub mod selection;
pub mod status;
pub mod timestamp;
pub mod types;

pub use resolver::resolve;
pub use status::{classify, Status};
pub use timestamp::{parse, DISPLAY_TZ};
pub use types::{Goals, MatchId, MatchRecord};
