mod config_cmd;
mod export_cmd;
mod import_cmd;

pub use config_cmd::ConfigCommand;
pub use export_cmd::ExportCommand;
pub use import_cmd::ImportCommand;
