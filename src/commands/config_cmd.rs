use clap::{Args, Subcommand, ValueEnum};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => print!("{}", render_text(config)),
                }
                Ok(())
            }
        }
    }
}

fn render_text(config: &Config) -> String {
    let mut out = String::from("Configuration\n=============\n\n");

    match &config.config_file {
        Some(path) => out.push_str(&format!("Config file: {}\n\n", path.display())),
        None => out.push_str(&format!(
            "Config file: {} (not found)\n\n",
            Config::default_config_path().display()
        )),
    }

    out.push_str(&format!("api_base_url: {}\n", config.api_base_url.value));
    out.push_str(&format!("  source: {}\n\n", config.api_base_url.source));

    out.push_str(&format!("token_file: {}\n", config.token_file.value.display()));
    out.push_str(&format!("  source: {}\n\n", config.token_file.source));

    match &config.access_token {
        Some(token) => {
            out.push_str("access_token: (set)\n");
            out.push_str(&format!("  source: {}\n\n", token.source));
        }
        None => out.push_str("access_token: (not set)\n\n"),
    }

    out.push_str(&format!("page_size: {}\n", config.page_size.value));
    out.push_str(&format!("  source: {}\n\n", config.page_size.source));

    match config.ftp.value {
        Some(ftp) => out.push_str(&format!("ftp: {}\n", ftp)),
        None => out.push_str("ftp: (not set)\n"),
    }
    out.push_str(&format!("  source: {}\n", config.ftp.source));
    out
}
