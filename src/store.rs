use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::types::User;

/// Result of [`UserStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// A JSON array of users kept in a single file.
///
/// There is no index and no cache: every call reads the whole file, and
/// every mutation truncates it and writes the full collection back. No
/// locking either, so concurrent writers against the same path can lose
/// updates.
#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

/// Parse a single user from the JSON text given on the command line.
pub fn parse_item(item: &str) -> Result<User> {
    serde_json::from_str(item).map_err(StoreError::InvalidItem)
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents, exactly as stored.
    pub fn read_raw(&self) -> Result<Vec<u8>> {
        let mut file = self.open_read()?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| self.open_error(source))?;
        Ok(contents)
    }

    /// All users for listing. A blank file counts as zero records.
    pub fn list(&self) -> Result<Vec<User>> {
        let contents = self.read_raw()?;
        if is_blank(&contents) {
            return Ok(Vec::new());
        }
        self.parse(&contents)
    }

    /// Load the collection, failing on a missing, empty or malformed file.
    pub fn load(&self) -> Result<Vec<User>> {
        let mut file = self.open_read()?;
        self.read_users(&mut file)
    }

    /// Load the collection, falling back to an empty one when the file
    /// can't be read or parsed.
    pub fn load_or_default(&self) -> Vec<User> {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file does not exist yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable store file, starting fresh");
                return Vec::new();
            }
        };

        match self.parse(&contents) {
            Ok(users) => users,
            Err(e) => {
                if !is_blank(&contents) {
                    warn!(error = %e, "discarding unparseable store contents");
                }
                Vec::new()
            }
        }
    }

    pub fn add(&self, user: User) -> Result<AddOutcome> {
        let mut users = self.load_or_default();

        if users.iter().any(|existing| existing.id == user.id) {
            debug!(id = %user.id, "user already exists");
            return Ok(AddOutcome::AlreadyExists);
        }

        debug!(id = %user.id, count = users.len() + 1, "adding user");
        users.push(user);
        self.save(&users)?;

        Ok(AddOutcome::Added)
    }

    /// First user in file order with the given id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.load()?;
        Ok(users.into_iter().find(|user| user.id == id))
    }

    /// Remove the first user with the given id and rewrite the file in place.
    pub fn remove(&self, id: &str) -> Result<User> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|source| self.open_error(source))?;

        let mut users = self.read_users(&mut file)?;
        let position = users
            .iter()
            .position(|user| user.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = users.remove(position);

        let bytes = serde_json::to_vec(&users).map_err(StoreError::Serialize)?;
        file.set_len(0).map_err(|source| self.write_error(source))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|source| self.write_error(source))?;
        file.write_all(&bytes)
            .map_err(|source| self.write_error(source))?;

        debug!(id, remaining = users.len(), "removed user");
        Ok(removed)
    }

    /// Replace the file contents with the given collection, creating it if needed.
    pub fn save(&self, users: &[User]) -> Result<()> {
        let bytes = serde_json::to_vec(users).map_err(StoreError::Serialize)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| self.write_error(source))?;
        file.write_all(&bytes)
            .map_err(|source| self.write_error(source))?;

        Ok(())
    }

    fn open_read(&self) -> Result<File> {
        File::open(&self.path).map_err(|source| self.open_error(source))
    }

    fn read_users(&self, file: &mut File) -> Result<Vec<User>> {
        let metadata = file.metadata().map_err(|source| self.open_error(source))?;
        if metadata.len() == 0 {
            return Err(StoreError::Empty {
                path: self.path.clone(),
            });
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| self.open_error(source))?;
        self.parse(&contents)
    }

    /// Invalid UTF-8 surfaces as a parse error like any other malformed input.
    fn parse(&self, contents: &[u8]) -> Result<Vec<User>> {
        serde_json::from_slice(contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn open_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Open {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn is_blank(contents: &[u8]) -> bool {
    contents.iter().all(u8::is_ascii_whitespace)
}
