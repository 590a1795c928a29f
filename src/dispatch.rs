use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::cli::OutputFormat;
use crate::commands::users;
use crate::error::{Result, StoreError};
use crate::output::Output;
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    List,
    FindById,
    Remove,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::List => "list",
            Operation::FindById => "findById",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Operation::Add),
            "list" => Ok(Operation::List),
            "findById" => Ok(Operation::FindById),
            "remove" => Ok(Operation::Remove),
            other => Err(StoreError::UnknownOperation(other.to_string())),
        }
    }
}

/// Everything one invocation needs, independent of how it was parsed.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    pub file_name: Option<PathBuf>,
    pub operation: Option<String>,
    pub item: Option<String>,
    pub id: Option<String>,
    pub format: OutputFormat,
    pub quiet: bool,
    pub strict: bool,
}

/// Run the requested operation and write its result to `sink`.
///
/// Missing or invalid arguments and write failures are returned as errors.
/// Open, empty, parse and not-found problems are printed to `sink` instead,
/// unless `strict` is set.
pub fn perform<W: Write>(args: &Arguments, sink: W) -> Result<()> {
    let operation = required(args.operation.as_deref(), "operation")?;
    let file_name = args
        .file_name
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(StoreError::MissingFlag("fileName"))?;
    let operation: Operation = operation.parse()?;

    let store = UserStore::new(file_name);
    debug!(%operation, path = %store.path().display(), "performing operation");

    let mut output = Output::new(sink, args.format, args.quiet);

    let result = match operation {
        Operation::Add => {
            let item = required(args.item.as_deref(), "item")?;
            users::add(&store, item, &mut output)
        }
        Operation::List => users::list(&store, &mut output),
        Operation::FindById => {
            let id = required(args.id.as_deref(), "id")?;
            users::find_by_id(&store, id, &mut output)
        }
        Operation::Remove => {
            let id = required(args.id.as_deref(), "id")?;
            users::remove(&store, id, &mut output)
        }
    };

    match result {
        Err(e) if e.is_diagnostic() && !args.strict => {
            debug!(error = %e, "reporting diagnostic");
            output.print_diagnostic(&e.to_string())
        }
        other => other,
    }
}

fn required<'a>(value: Option<&'a str>, flag: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(StoreError::MissingFlag(flag))
}
