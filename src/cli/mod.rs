//! CLI argument definitions for confr.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Long `--version` text with build metadata.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("CONFR_GIT_COMMIT"),
    "\nbuilt: ",
    env!("CONFR_BUILD_TIMESTAMP"),
);

/// confr - Back up configuration files into a single document.
///
/// Save files with `confr save`, bring them back with `confr restore`.
#[derive(Parser, Debug)]
#[command(name = "confr")]
#[command(author, version, long_version = LONG_VERSION, about = "Back up, restore and sync configuration files", long_about = None)]
pub struct Cli {
    /// Output in JSON format instead of human-readable text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path of the JSON document holding saved configs.
    /// Can also be set via CONFR_STORE environment variable.
    #[arg(long = "store", global = true)]
    pub store_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List saved configs
    ///
    /// One line per config: `name (tags) path`.
    #[command(visible_alias = "list")]
    Ls {
        /// Print size and modification time as well
        #[arg(short, long)]
        extra: bool,
    },

    /// Save a file to configs
    ///
    /// Tags are single words separated by spaces; join words with dashes
    /// or underscores (arch-linux).
    Save {
        /// Display name of the config
        name: String,

        /// File to save
        path: PathBuf,

        /// Tags for later searching
        tags: Vec<String>,

        /// Save even if the modification time has not changed
        #[arg(long)]
        ignore_time: bool,
    },

    /// Remove a saved config
    Rm {
        /// Name (or part of it) of the config to remove
        name: String,
    },

    /// Record the current user and home directory in the store
    Init,

    /// Restore saved configs to disk
    ///
    /// Matching configs are listed with a number; answer with a selection
    /// such as `1,3-5,!4`.
    Restore {
        /// Text to look for in names and paths, or an exact tag
        search: String,

        /// Overwrite files that are newer on disk without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Check saved configs for newer files on disk
    Update {
        /// Accept every update without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Export all configs into a compressed save file
    Export {
        /// Save file to write (default: confr.save)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import configs from a save file or URL
    Import {
        /// Save file path or http(s) URL (default: confr.save)
        source: Option<String>,

        /// Replace existing configs without asking
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save_with_tags() {
        let cli = Cli::try_parse_from([
            "confr",
            "save",
            "zshrc",
            "/home/alice/.zshrc",
            "linux",
            "zsh",
            "--ignore-time",
        ])
        .unwrap();

        match cli.command {
            Commands::Save {
                name,
                path,
                tags,
                ignore_time,
            } => {
                assert_eq!(name, "zshrc");
                assert_eq!(path, PathBuf::from("/home/alice/.zshrc"));
                assert_eq!(tags, vec!["linux", "zsh"]);
                assert!(ignore_time);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_alias_and_global_flags() {
        let cli = Cli::try_parse_from(["confr", "list", "-e", "--json", "--store", "x.json"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Ls { extra: true }));
        assert!(cli.json);
        assert_eq!(cli.store_path, Some(PathBuf::from("x.json")));
    }

    #[test]
    fn test_save_requires_name_and_path() {
        assert!(Cli::try_parse_from(["confr", "save", "only-name"]).is_err());
    }

    #[test]
    fn test_parse_import_without_source() {
        let cli = Cli::try_parse_from(["confr", "import", "-f"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Import {
                source: None,
                force: true
            }
        ));
    }
}
