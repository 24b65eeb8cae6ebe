//! CLI command implementations.

mod ask;
mod config;
mod doctor;
mod listen;
mod serve;
mod speak;
mod summarize;
mod transcript;

pub use ask::run_ask;
pub use config::run_config;
pub use doctor::run_doctor;
pub use listen::run_listen;
pub use serve::{router, run_serve};
pub use speak::run_speak;
pub use summarize::run_summarize;
pub use transcript::run_transcript;
