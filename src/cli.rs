use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tdl", about = "Terminal client for a to-do list server")]
pub struct Cli {
    /// Server base URL [default: from config, else http://localhost:3000]
    #[arg(long, env = "TDL_SERVER", global = true)]
    pub server: Option<String>,

    /// Path to the config file [default: ~/.tdl/config.toml]
    #[arg(long, env = "TDL_CONFIG", global = true)]
    pub config: Option<String>,

    /// Login used when the session is not authenticated yet
    #[arg(long, env = "TDL_LOGIN", global = true)]
    pub login: Option<String>,

    /// Password used together with --login
    #[arg(long, env = "TDL_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Launch the interactive client (default)
    Tui,

    /// Print all task lists with their task counts
    Lists {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tasks of one list
    Show {
        /// Task list name
        list: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
