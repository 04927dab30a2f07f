use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use shared::{
    domain::{Gesture, LikertAnswer, MaterialId, SessionId},
    error::ProtocolError,
};
use thiserror::Error;
use tracing::{debug, info};

pub const HEADER: [&str; 6] = ["ID", "Category", "Gesture", "Material", "Feeling", "Answer"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to prepare results file '{}': {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to write results row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush results: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// One timestamped reading taken while a target was live.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub elapsed_ms: u128,
    pub pressure: f32,
    pub x: f32,
    pub y: f32,
}

/// A single target (press ring or slider box) and the contacts made while
/// it was shown. `params` are the widget dimensions when it appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRun {
    pub params: (f32, f32),
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureLog {
    pub gesture: Gesture,
    pub material: MaterialId,
    pub targets: Vec<TargetRun>,
}

impl GestureLog {
    pub fn new(gesture: Gesture, material: MaterialId, first_params: (f32, f32)) -> Self {
        Self {
            gesture,
            material,
            targets: vec![TargetRun {
                params: first_params,
                contacts: Vec::new(),
            }],
        }
    }

    pub fn push_contact(&mut self, contact: Contact) {
        if let Some(current) = self.targets.last_mut() {
            current.contacts.push(contact);
        }
    }

    pub fn start_target(&mut self, params: (f32, f32)) {
        self.targets.push(TargetRun {
            params,
            contacts: Vec::new(),
        });
    }
}

/// Append-only CSV output for one survey session.
pub struct ResultStore<W: Write = File> {
    session: SessionId,
    writer: csv::Writer<W>,
    path: Option<PathBuf>,
}

impl ResultStore<File> {
    /// Creates `<dir>/<session>.csv`, creating `dir` if needed.
    pub fn create(dir: &Path, session: SessionId) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|source| StorageError::Create {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(format!("{session}.csv"));
        let file = File::create(&path).map_err(|source| StorageError::Create {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), %session, "opened results file");

        let mut store = Self::from_writer(session, file)?;
        store.path = Some(path);
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl<W: Write> ResultStore<W> {
    pub fn from_writer(session: SessionId, writer: W) -> Result<Self, StorageError> {
        // rows differ in width: responses and gesture traces are variable length
        let writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        let mut store = Self {
            session,
            writer,
            path: None,
        };
        store.write_row(HEADER.iter().map(|s| s.to_string()).collect())?;
        Ok(store)
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn record_likert(
        &mut self,
        gesture: Gesture,
        material: MaterialId,
        answer: &LikertAnswer,
    ) -> Result<(), StorageError> {
        let category = answer.category()?;
        debug!(%gesture, %material, name = %answer.name, value = answer.value, "recording likert answer");
        self.write_row(vec![
            self.session.to_string(),
            category.to_string(),
            gesture.to_string(),
            material.to_string(),
            answer.name.clone(),
            answer.value.to_string(),
        ])
    }

    pub fn record_response(
        &mut self,
        name: &str,
        materials: &[MaterialId],
    ) -> Result<(), StorageError> {
        debug!(name, count = materials.len(), "recording material response");
        let mut row = vec![self.session.to_string(), name.to_string()];
        row.extend(materials.iter().map(MaterialId::to_string));
        self.write_row(row)
    }

    /// Writes one row per target: id, gesture, material, both target
    /// parameters, then every contact as `(ms - pressure - x - y)`.
    pub fn record_gesture(&mut self, log: &GestureLog) -> Result<(), StorageError> {
        debug!(
            gesture = %log.gesture,
            material = %log.material,
            targets = log.targets.len(),
            "recording gesture trace"
        );
        for target in &log.targets {
            let mut row = vec![
                self.session.to_string(),
                log.gesture.to_string(),
                log.material.to_string(),
                target.params.0.to_string(),
                target.params.1.to_string(),
            ];
            row.extend(target.contacts.iter().map(|c| {
                format!("({} - {} - {} - {})", c.elapsed_ms, c.pressure, c.x, c.y)
            }));
            self.write_row(row)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, StorageError> {
        self.writer
            .into_inner()
            .map_err(|err| StorageError::Io(err.into_error()))
    }

    fn write_row(&mut self, row: Vec<String>) -> Result<(), StorageError> {
        self.writer.write_record(&row)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
