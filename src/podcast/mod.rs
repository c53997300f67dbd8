pub mod cli;
pub mod clock;
pub mod commands;
mod config;
mod irclog;
mod pipeline;
mod segment;

pub use cli::AnnotateArgs;
pub use commands::handle_annotate;
