use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{color::Color, render::Output, samples::SampleName};

pub const STORE_DIR_ENV: &str = "PREFS_STORE_DIR";

#[derive(Parser, Clone)]
#[command(name = "prefs", version, about = "Preference store demo", long_about = None)]
pub struct Cli {
    // Optional as a workaround for https://github.com/clap-rs/clap/issues/3572
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short = 'o', long, global = true, value_enum, default_value_t = Output::JSON)]
    pub output: Output,

    #[arg(short = 'c', long, global = true, value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    #[arg(
        long,
        global = true,
        env = STORE_DIR_ENV,
        help = "Folder holding the store files. Defaults to ~/.config/preference-store."
    )]
    pub store_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Keep the store in memory. Nothing is persisted between runs."
    )]
    pub memory: bool,

    #[arg(
        short = 's',
        long,
        global = true,
        default_value = "app_preferences",
        help = "Name of the store to open."
    )]
    pub store: String,

    #[arg(
        short = 'q',
        long,
        global = true,
        help = "Don't return anything to stdout."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    #[command(long_about = "Show every sample preference with its current value.")]
    Show,

    #[command(
        long_about = "Write the default of every bounded sample preference that isn't set yet."
    )]
    Init,

    #[command(long_about = "Set a sample preference. String sets are comma separated, \
                            structured values are JSON.")]
    Set {
        #[arg(value_enum)]
        preference: SampleName,
        value: String,
    },

    #[command(long_about = "Remove a sample preference from the store.")]
    Remove {
        #[arg(value_enum)]
        preference: SampleName,
    },

    #[command(long_about = "List the keys held by the store.")]
    List,

    #[command(long_about = "Remove every sample preference from the store.")]
    Reset,

    #[command(long_about = "Walk through initializing, reading and writing the sample \
                            preferences.")]
    Demo,
}
