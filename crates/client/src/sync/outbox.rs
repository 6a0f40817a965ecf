//! Durable queue of pending mirror operations.

use std::{
    collections::VecDeque,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MirrorOp, SyncError};

/// What an [`OutboxStore`] persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxState {
    /// Account the operations were queued for.
    pub owner: Option<Uuid>,

    /// Operations, oldest first.
    pub ops: Vec<MirrorOp>,
}

/// Where the outbox keeps its operations between sessions.
pub trait OutboxStore: Send {
    /// The state saved last.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored state cannot be read.
    fn load(&self) -> Result<OutboxState, SyncError>;

    /// Replace the stored state.
    ///
    /// # Errors
    ///
    /// Returns an error when the state cannot be written.
    fn save(&mut self, state: &OutboxState) -> Result<(), SyncError>;
}

/// Keeps operations for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryOutboxStore {
    state: OutboxState,
}

impl OutboxStore for MemoryOutboxStore {
    fn load(&self) -> Result<OutboxState, SyncError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &OutboxState) -> Result<(), SyncError> {
        self.state.clone_from(state);

        Ok(())
    }
}

/// Keeps operations in a JSON file. Writes go to a sibling temporary file that is then
/// renamed over the original, so a crash never leaves a truncated outbox.
#[derive(Debug, Clone)]
pub struct FileOutboxStore {
    path: PathBuf,
}

impl FileOutboxStore {
    /// Store backed by the JSON file at `path`; the file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");

        self.path.with_file_name(name)
    }
}

impl OutboxStore for FileOutboxStore {
    fn load(&self) -> Result<OutboxState, SyncError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(OutboxState::default()),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&mut self, state: &OutboxState) -> Result<(), SyncError> {
        let temp = self.temp_path();

        fs::write(&temp, serde_json::to_vec(state)?)?;
        fs::rename(&temp, &self.path)?;

        Ok(())
    }
}

/// FIFO of operations queued for one account, persisted after every change.
#[derive(Debug)]
pub struct Outbox<S> {
    owner: Option<Uuid>,
    ops: VecDeque<MirrorOp>,
    store: S,
}

impl<S: OutboxStore> Outbox<S> {
    /// Resume the operations left in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    pub fn open(store: S) -> Result<Self, SyncError> {
        let OutboxState { owner, ops } = store.load()?;

        Ok(Self {
            owner,
            ops: ops.into(),
            store,
        })
    }

    /// Account the queued operations belong to.
    #[must_use]
    pub const fn owner(&self) -> Option<Uuid> {
        self.owner
    }

    /// Hand the outbox to `owner`. Operations queued for anyone else are discarded and
    /// their count returned.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn claim(&mut self, owner: Option<Uuid>) -> Result<usize, SyncError> {
        if self.owner == owner {
            return Ok(0);
        }

        let discarded = self.ops.len();

        self.owner = owner;
        self.ops.clear();
        self.persist()?;

        Ok(discarded)
    }

    /// Queue `op` behind every pending operation.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn push(&mut self, op: MirrorOp) -> Result<(), SyncError> {
        self.ops.push_back(op);
        self.persist()
    }

    /// The oldest pending operation.
    #[must_use]
    pub fn front(&self) -> Option<MirrorOp> {
        self.ops.front().copied()
    }

    /// Remove the oldest pending operation.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn pop_front(&mut self) -> Result<Option<MirrorOp>, SyncError> {
        let op = self.ops.pop_front();

        if op.is_some() {
            self.persist()?;
        }

        Ok(op)
    }

    /// Drop every pending operation. The owner is kept.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub fn clear(&mut self) -> Result<(), SyncError> {
        self.ops.clear();
        self.persist()
    }

    /// Number of pending operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Pending operations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MirrorOp> {
        self.ops.iter()
    }

    fn persist(&mut self) -> Result<(), SyncError> {
        let state = OutboxState {
            owner: self.owner,
            ops: self.ops.iter().copied().collect(),
        };

        self.store.save(&state)
    }
}
