use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Deserialize;

use crate::config::Config;
use crate::dispatch::Arguments;

/// Long flags that historically take a single dash (`-fileName users.json`).
const LEGACY_FLAGS: &[&str] = &["fileName", "operation", "item", "id"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact JSON and plain messages, no trailing newline
    #[default]
    Raw,
    Json,
    Table,
}

#[derive(Parser)]
#[command(name = "userstore")]
#[command(about = "Manage user records kept in a JSON file", version)]
#[command(after_help = "EXAMPLES:
    userstore -fileName users.json -operation add -item '{\"id\":\"1\",\"email\":\"a@x.com\",\"age\":30}'
    userstore -fileName users.json -operation list
    userstore -fileName users.json -operation findById -id 1
    userstore -fileName users.json -operation remove -id 1
    userstore --fileName users.json --operation list --format table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON file holding the users (falls back to USERSTORE_FILE, then the config file)
    #[arg(long = "fileName", short = 'f', visible_alias = "file-name")]
    pub file_name: Option<PathBuf>,

    /// Operation to perform: add, list, findById, remove
    #[arg(long)]
    pub operation: Option<String>,

    /// User JSON object for 'add'
    #[arg(long)]
    pub item: Option<String>,

    /// User id for 'findById' and 'remove'
    #[arg(long)]
    pub id: Option<String>,

    /// Output format (raw, json, table)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logs and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Exit with an error when a lookup reports a problem instead of data
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    userstore completions bash > ~/.bash_completion.d/userstore
    userstore completions zsh > ~/.zfunc/_userstore")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Cli {
    /// Effective output format: --json, then --format, then the config file.
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format.or(config.format).unwrap_or_default()
        }
    }

    pub fn into_arguments(self, config: &Config) -> Arguments {
        let format = self.output_format(config);

        Arguments {
            file_name: config.resolve_file_name(self.file_name),
            operation: self.operation,
            item: self.item,
            id: self.id,
            format,
            quiet: self.quiet,
            strict: self.strict,
        }
    }
}

/// Rewrite `-fileName`, `-operation`, `-item` and `-id` (optionally with
/// `=value`) to their double-dash form so clap accepts them.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some(s) if is_legacy_flag(s) => OsString::from(format!("-{s}")),
            _ => arg,
        })
        .collect()
}

fn is_legacy_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split('=').next().unwrap_or(rest);
    LEGACY_FLAGS.contains(&name)
}
