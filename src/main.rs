//! confr CLI - Back up and restore configuration files.

use confr::cli::{Cli, Commands};
use confr::commands::{
    self, ExportOptions, ImportOptions, Output, RestoreOptions, SaveOptions, UpdateOptions,
};
use confr::config::{ConfigOverrides, OutputFormat, Settings, resolve_settings};
use confr::logging;
use confr::prompt::{self, StdioPrompter};
use confr::storage::RecordStore;
use confr::sys::NativeMetadata;
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let mut overrides = ConfigOverrides::new();
    if let Some(path) = cli.store_path {
        overrides = overrides.with_store_path(path);
    }
    if cli.json {
        overrides = overrides.with_output_format(OutputFormat::Json);
    }

    // Until settings resolve, only the flag decides how errors look.
    let settings = match resolve_settings(&overrides) {
        Ok(settings) => settings,
        Err(e) => {
            report_error(&e, !cli.json);
            process::exit(1);
        }
    };

    let human = settings.human();
    if let Err(e) = run_command(cli.command, &settings) {
        report_error(&e, human);
        process::exit(1);
    }
}

fn report_error(e: &confr::Error, human: bool) {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
}

fn run_command(command: Commands, settings: &Settings) -> Result<(), confr::Error> {
    let human = settings.human();
    let mut store = RecordStore::open(settings.store_path());
    let mut prompter = StdioPrompter::stdin(prompt::interaction_writer(human));
    let metadata = NativeMetadata;

    tracing::debug!(
        store = %settings.store_path().display(),
        source = %settings.store_path.source,
        "resolved store path"
    );

    match command {
        Commands::Ls { extra } => {
            let result = commands::ls(&mut store, extra)?;
            output(&result, human);
        }

        Commands::Save {
            name,
            path,
            tags,
            ignore_time,
        } => {
            let options = SaveOptions {
                name,
                path,
                tags,
                ignore_time,
            };
            let result = commands::save(&mut store, options, &mut prompter, &metadata)?;
            output(&result, human);
        }

        Commands::Rm { name } => {
            let result = commands::rm(&mut store, &name)?;
            output(&result, human);
        }

        Commands::Init => {
            let result = commands::init(&mut store)?;
            output(&result, human);
        }

        Commands::Restore { search, force } => {
            let options = RestoreOptions { search, force };
            let result = commands::restore(&mut store, options, &mut prompter, &metadata)?;
            output(&result, human);
        }

        Commands::Update { yes } => {
            let options = UpdateOptions { yes };
            let result = commands::update(&mut store, options, &mut prompter, &metadata)?;
            output(&result, human);
        }

        Commands::Export { output: path } => {
            let options = ExportOptions {
                output: path,
                compression_level: settings.compression_level(),
            };
            let result =
                commands::export(&mut store, options, settings.export_path().to_path_buf())?;
            output(&result, human);
        }

        Commands::Import { source, force } => {
            let options = ImportOptions { source, force };
            let result = commands::import(
                &mut store,
                options,
                settings.export_path().to_path_buf(),
                &mut prompter,
            )?;
            output(&result, human);
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
