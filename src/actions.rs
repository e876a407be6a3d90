//! Deferred builder actions.
//!
//! An [`ActionRecord`] describes a builder operation as data. Records are
//! collected in an [`ActionQueue`] and replayed later, in list order, against
//! a [`Builder`]. Each record is played at most once.

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::builder::{AddFileOptions, Builder};
use crate::error::{Error, Result};

/// A builder operation. The serialized form carries its kind in `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    AddFile {
        file: String,
        #[serde(flatten)]
        options: AddFileOptions,
    },
    DeleteFile {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        folder: Option<String>,
    },
    SetCurrentFolder {
        folder: String,
    },
    RunCommand {
        command: String,
    },
    RunScript {
        script: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        folder: Option<String>,
    },
    OpenInEditor {
        file: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        folder: Option<String>,
    },
    Browse {
        target: String,
    },
    /// A record that could not be decoded: an unrecognized kind or a broken
    /// payload. Replaying it fails with `reason`.
    #[serde(skip)]
    Invalid { kind: String, reason: String },
}

impl Action {
    pub fn kind(&self) -> &str {
        match self {
            Action::AddFile { .. } => "add_file",
            Action::DeleteFile { .. } => "delete_file",
            Action::SetCurrentFolder { .. } => "set_current_folder",
            Action::RunCommand { .. } => "run_command",
            Action::RunScript { .. } => "run_script",
            Action::OpenInEditor { .. } => "open_in_editor",
            Action::Browse { .. } => "browse",
            Action::Invalid { kind, .. } => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(flatten)]
    pub action: Action,
    #[serde(default)]
    pub played: bool,
}

impl ActionRecord {
    /// An unplayed record. Nothing is executed.
    pub fn new(action: Action) -> Self {
        Self { action, played: false }
    }

    /// Decodes a record. A record with an unrecognized kind or an invalid
    /// payload decodes to [`Action::Invalid`] so that replay can report it
    /// without dropping the records around it.
    ///
    /// # Errors
    /// * `Error::ActionError` if the record has no `action` kind
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let kind = value
            .get("action")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::ActionError(format!("record has no action kind: {value}")))?;
        let played = value.get("played").and_then(serde_json::Value::as_bool).unwrap_or(false);

        match serde_json::from_value(value) {
            Ok(record) => Ok(record),
            Err(e) => {
                debug!("Undecodable '{kind}' record: {e}");
                Ok(Self { action: Action::Invalid { kind, reason: e.to_string() }, played })
            }
        }
    }
}

/// Counts from one [`ActionQueue::play_all`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub executed: usize,
    pub failed: usize,
    /// Records that were already played.
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionQueue {
    records: Vec<ActionRecord>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes every value with [`ActionRecord::from_value`].
    pub fn from_values<I: IntoIterator<Item = serde_json::Value>>(values: I) -> Result<Self> {
        let records = values
            .into_iter()
            .map(ActionRecord::from_value)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Appends an unplayed record for `action`.
    pub fn record(&mut self, action: Action) -> &mut Self {
        self.records.push(ActionRecord::new(action));
        self
    }

    pub fn push(&mut self, record: ActionRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [ActionRecord] {
        &mut self.records
    }

    pub fn pending(&self) -> usize {
        self.records.iter().filter(|r| !r.played).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Plays every unplayed record in list order and marks it played.
    ///
    /// A record that fails (including an undecodable one) is logged and marked
    /// played; the remaining records still run.
    pub fn play_all(&mut self, builder: &mut Builder<'_>) -> PlaySummary {
        let mut summary = PlaySummary::default();

        for (index, record) in self.records.iter_mut().enumerate() {
            if record.played {
                summary.skipped += 1;
                continue;
            }

            debug!("Playing action #{} ({})", index, record.action.kind());
            match play(&record.action, builder) {
                Ok(()) => summary.executed += 1,
                Err(e) => {
                    error!("Action #{} ({}) failed: {}", index, record.action.kind(), e);
                    summary.failed += 1;
                }
            }
            record.played = true;
        }

        info!(
            "Played {} action(s): {} failed, {} already played",
            summary.executed + summary.failed,
            summary.failed,
            summary.skipped
        );
        summary
    }
}

fn play(action: &Action, builder: &mut Builder<'_>) -> Result<()> {
    match action {
        Action::AddFile { file, options } => {
            builder.add_file(file, options.clone())?;
        }
        Action::DeleteFile { file, folder } => {
            builder.delete_file(file, folder.as_deref())?;
        }
        Action::SetCurrentFolder { folder } => {
            builder.set_current_folder(folder)?;
        }
        Action::RunCommand { command } => {
            builder.run_command(command)?;
        }
        Action::RunScript { script, folder } => {
            builder.run_script(script, folder.as_deref())?;
        }
        Action::OpenInEditor { file, folder } => {
            builder.open_file(file, folder.as_deref())?;
        }
        Action::Browse { target } => {
            builder.browse(target);
        }
        Action::Invalid { kind, reason } => {
            return Err(Error::ActionError(format!("invalid '{kind}' record: {reason}")));
        }
    }
    Ok(())
}
