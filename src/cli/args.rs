// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an account; a confirmation code is emailed
    Signup {
        #[arg(value_name = "EMAIL")]
        email: String,

        /// Password (read from SCRATCH_PASSWORD or prompted when omitted)
        #[arg(long, env = "SCRATCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Confirm a new account with the emailed code and sign in
    Confirm {
        #[arg(value_name = "EMAIL")]
        email: String,

        #[arg(value_name = "CODE")]
        code: String,

        #[arg(long, env = "SCRATCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Send a new confirmation code
    Resend {
        #[arg(value_name = "EMAIL")]
        email: String,
    },

    /// Sign in
    Login {
        #[arg(value_name = "EMAIL")]
        email: String,

        #[arg(long, env = "SCRATCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Login location carrying the redirect target, e.g. /login?redirect=%2Fnotes%2F1
        #[arg(long, value_name = "URL")]
        location: Option<String>,
    },

    /// Sign out
    Logout,

    /// List your notes
    List,

    /// Create a note
    New {
        #[arg(value_name = "CONTENT")]
        content: String,

        /// File to attach
        #[arg(short, long, value_name = "FILE")]
        attach: Option<PathBuf>,
    },

    /// Show a note
    Show {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        /// Output note as JSON
        #[arg(long, conflicts_with = "browser")]
        json: bool,

        /// Open the note in the browser
        #[arg(long)]
        browser: bool,
    },

    /// Replace a note's content, optionally with a new attachment
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        #[arg(value_name = "CONTENT")]
        content: String,

        #[arg(short, long, value_name = "FILE")]
        attach: Option<PathBuf>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },

    /// Open an in-app location such as /notes/123
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },
}
