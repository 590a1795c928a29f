use std::io::Write;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::Output;
use crate::store::{AddOutcome, UserStore, parse_item};

pub fn add<W: Write>(store: &UserStore, item: &str, output: &mut Output<W>) -> Result<()> {
    let user = parse_item(item)?;
    let id = user.id.clone();

    match store.add(user)? {
        AddOutcome::Added => output.print_success(&format!("Added user {id}")),
        AddOutcome::AlreadyExists => {
            output.print_message(&format!("Item with id {id} already exists"))
        }
    }
}

/// Raw output is the file byte for byte; other formats parse it first.
pub fn list<W: Write>(store: &UserStore, output: &mut Output<W>) -> Result<()> {
    match output.format() {
        OutputFormat::Raw => {
            let contents = store.read_raw()?;
            output.print_raw(&contents)
        }
        OutputFormat::Json | OutputFormat::Table => {
            let users = store.list()?;
            output.print_users(&users)
        }
    }
}

pub fn find_by_id<W: Write>(store: &UserStore, id: &str, output: &mut Output<W>) -> Result<()> {
    let user = store.find_by_id(id)?;
    output.print_user(user.as_ref())
}

pub fn remove<W: Write>(store: &UserStore, id: &str, output: &mut Output<W>) -> Result<()> {
    let removed = store.remove(id)?;
    output.print_success(&format!("Removed user {}", removed.id))
}
