use crate::config::RcbookConfig;
use crate::model::Vehicle;
use std::path::{Path, PathBuf};

pub mod config;
pub mod dashboard;
pub mod export;
pub mod form;
pub mod sample;
pub mod selection;

const STORE_DIR: &str = "store";

/// Where rcbook keeps its state.
#[derive(Debug, Clone)]
pub struct RcbookPaths {
    pub data_dir: PathBuf,
}

impl RcbookPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root of the filesystem storage backend.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join(STORE_DIR)
    }

    /// Directory holding `config.json`.
    pub fn config_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Counters shown by the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleStats {
    pub total: usize,
    pub selected: usize,
    pub light_vehicles: usize,
    pub electric: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_vehicles: Vec<Vehicle>,
    pub listed_vehicles: Vec<Vehicle>,
    pub files: Vec<PathBuf>,
    pub stats: Option<VehicleStats>,
    pub config: Option<RcbookConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_vehicles(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.affected_vehicles = vehicles;
        self
    }

    pub fn with_listed_vehicles(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.listed_vehicles = vehicles;
        self
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn with_stats(mut self, stats: VehicleStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_config(mut self, config: RcbookConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// True when any notice is error-level.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
