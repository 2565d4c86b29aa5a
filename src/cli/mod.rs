//! CLI subcommand implementations for the formfill binary.

pub mod doctor;
pub mod fill_cmd;
pub mod output;
pub mod profile_cmd;
pub mod serve_cmd;
