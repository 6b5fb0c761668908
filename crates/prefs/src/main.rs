#![doc = include_str!("../README.md")]

use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use preference_store::{
    CommitMode, HandlerConfig, PreferenceError, PreferenceHandler, StoreProvider,
};
use serde_json::json;
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

use crate::{
    color::install_color_eyre,
    command::*,
    render::{CommandOutput, CommandResult},
    samples::{SampleName, Samples},
};

mod color;
mod command;
mod render;
mod samples;
mod state;

fn main() -> Result<()> {
    // the log level hierarchy is determined by:
    //    - if RUST_LOG is detected at runtime
    //    - if RUST_LOG is provided at compile time
    //    - default to WARN
    let filter = EnvFilter::builder()
        .with_default_directive(
            option_env!("RUST_LOG")
                .unwrap_or("warn")
                .parse()
                .expect("should provide valid log level at compile time."),
        )
        // parse directives from the RUST_LOG environment variable,
        // overriding the default directive for matching targets.
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    install_color_eyre(cli.color)?;
    let render_config = render::RenderConfig::new(&cli);

    let Some(command) = cli.command.clone() else {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        return Ok(());
    };

    let result = process_commands(command, &cli);

    // Render the result of the command
    render_config.render_result(result)
}

fn process_commands(command: Commands, cli: &Cli) -> CommandResult {
    let configuration = state::get_store_config(cli.memory, cli.store_dir.clone())?;
    let provider = StoreProvider::new(configuration);
    // The process may exit right after a write, so every write must be durable on return.
    let config = HandlerConfig::new(cli.store.clone())
        .editable(true)
        .commit_mode(CommitMode::Commit);
    let mut handler = PreferenceHandler::new(&provider, config)?;
    let samples = Samples::new()?;

    match command {
        Commands::Show => Ok(CommandOutput::Object(json!(samples.entries(&handler)?))),

        Commands::Init => {
            handler.initialize(&samples)?;
            Ok(CommandOutput::Object(json!(samples.entries(&handler)?)))
        }

        Commands::Set { preference, value } => {
            let written = samples.set(&mut handler, preference, &value)?;
            Ok(written.into())
        }

        Commands::Remove { preference } => {
            samples.remove(&mut handler, preference)?;
            Ok(().into())
        }

        Commands::List => Ok(CommandOutput::Object(json!(handler.keys()?))),

        Commands::Reset => {
            samples.reset(&mut handler)?;
            Ok(().into())
        }

        Commands::Demo => demo(&mut handler, &samples),
    }
}

/// Initialize the samples, change a few of them, and show the result.
fn demo(handler: &mut PreferenceHandler, samples: &Samples) -> CommandResult {
    handler.initialize(samples)?;

    samples.set(handler, SampleName::Theme, "dark")?;
    samples.set(handler, SampleName::LastUser, "alice")?;
    samples.set(handler, SampleName::Tags, "work,home")?;
    samples.set(handler, SampleName::Recent, r#"{"index":2,"name":"zzz"}"#)?;

    let rejected = match samples.set(handler, SampleName::Theme, "purple") {
        Ok(_) => None,
        Err(e) => match e.downcast_ref::<PreferenceError>() {
            Some(PreferenceError::UnsupportedValue(_)) => Some(e.to_string()),
            _ => return Err(e),
        },
    };

    Ok(CommandOutput::Object(json!({
        "rejected": rejected,
        "preferences": samples.entries(handler)?,
    })))
}
