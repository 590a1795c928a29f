use std::io::Write;

use serde::Serialize;
use serde_json::json;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::{Result, StoreError};
use crate::types::User;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Age")]
    age: i64,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            age: user.age,
        }
    }
}

/// Renders operation results to a sink in the selected format.
///
/// `Raw` reproduces the historical output byte for byte: compact JSON, no
/// trailing newlines and nothing at all on success.
pub struct Output<W: Write> {
    sink: W,
    format: OutputFormat,
    quiet: bool,
}

impl<W: Write> Output<W> {
    pub fn new(sink: W, format: OutputFormat, quiet: bool) -> Self {
        Self {
            sink,
            format,
            quiet,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Write bytes exactly as given.
    pub fn print_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_all(bytes)?;
        Ok(())
    }

    pub fn print_users(&mut self, users: &[User]) -> Result<()> {
        match self.format {
            OutputFormat::Raw => self.print_compact(users),
            OutputFormat::Json => self.print_pretty(users),
            OutputFormat::Table => {
                let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
                let table = Table::new(rows).with(Style::rounded()).to_string();
                writeln!(self.sink, "{table}")?;
                Ok(())
            }
        }
    }

    /// A lookup result. Nothing is printed in raw mode when the user is absent.
    pub fn print_user(&mut self, user: Option<&User>) -> Result<()> {
        match (self.format, user) {
            (OutputFormat::Raw, Some(user)) => self.print_compact(user),
            (OutputFormat::Raw, None) => Ok(()),
            (OutputFormat::Json, user) => self.print_pretty(&user),
            (OutputFormat::Table, Some(user)) => self.print_users(std::slice::from_ref(user)),
            (OutputFormat::Table, None) => {
                writeln!(self.sink, "User not found")?;
                Ok(())
            }
        }
    }

    /// A message the caller always needs to see.
    pub fn print_message(&mut self, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Raw => self.print_raw(message.as_bytes()),
            OutputFormat::Json => self.print_pretty(&json!({ "message": message })),
            OutputFormat::Table => {
                writeln!(self.sink, "{message}")?;
                Ok(())
            }
        }
    }

    /// Confirmation of a completed mutation. Skipped in raw mode and with --quiet.
    pub fn print_success(&mut self, message: &str) -> Result<()> {
        if self.quiet || matches!(self.format, OutputFormat::Raw) {
            return Ok(());
        }
        self.print_message(message)
    }

    /// A data-path failure reported in band.
    pub fn print_diagnostic(&mut self, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Raw => self.print_raw(message.as_bytes()),
            OutputFormat::Json => self.print_pretty(&json!({ "error": message })),
            OutputFormat::Table => {
                writeln!(self.sink, "{message}")?;
                Ok(())
            }
        }
    }

    fn print_compact<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.sink, value)
            .map_err(StoreError::Serialize)?;
        Ok(())
    }

    fn print_pretty<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, value)
            .map_err(StoreError::Serialize)?;
        writeln!(self.sink)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: OutputFormat, quiet: bool, f: impl FnOnce(&mut Output<Vec<u8>>)) -> String {
        let mut output = Output::new(Vec::new(), format, quiet);
        f(&mut output);
        String::from_utf8(output.into_inner()).unwrap()
    }

    fn sample() -> User {
        User {
            id: "1".to_string(),
            email: "a@x.com".to_string(),
            age: 30,
        }
    }

    #[test]
    fn test_raw_user_is_compact() {
        let text = render(OutputFormat::Raw, false, |o| {
            o.print_user(Some(&sample())).unwrap()
        });
        assert_eq!(text, r#"{"id":"1","email":"a@x.com","age":30}"#);
    }

    #[test]
    fn test_raw_missing_user_prints_nothing() {
        let text = render(OutputFormat::Raw, false, |o| o.print_user(None).unwrap());
        assert_eq!(text, "");
    }

    #[test]
    fn test_json_missing_user_is_null() {
        let text = render(OutputFormat::Json, false, |o| o.print_user(None).unwrap());
        assert_eq!(text.trim(), "null");
    }

    #[test]
    fn test_json_diagnostic_is_error_object() {
        let text = render(OutputFormat::Json, false, |o| {
            o.print_diagnostic("File \"x\" is empty").unwrap()
        });
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"], "File \"x\" is empty");
    }

    #[test]
    fn test_table_lists_users() {
        let text = render(OutputFormat::Table, false, |o| {
            o.print_users(&[sample()]).unwrap()
        });
        assert!(text.contains("Email"));
        assert!(text.contains("a@x.com"));
    }

    #[test]
    fn test_success_skipped_in_raw_and_quiet() {
        assert_eq!(
            render(OutputFormat::Raw, false, |o| o.print_success("Added user 1").unwrap()),
            ""
        );
        assert_eq!(
            render(OutputFormat::Table, true, |o| o.print_success("Added user 1").unwrap()),
            ""
        );
        assert_eq!(
            render(OutputFormat::Table, false, |o| o.print_success("Added user 1").unwrap()),
            "Added user 1\n"
        );
    }
}
