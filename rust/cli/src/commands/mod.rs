//! Handlers behind `tessera-arena`.
//!
//! Each handler takes its output streams as `&mut dyn Write` and reports
//! failure through [`crate::error::CliError`].

mod arena;
mod cfg;

pub use arena::handle_arena_command;
pub use cfg::handle_show_config;
