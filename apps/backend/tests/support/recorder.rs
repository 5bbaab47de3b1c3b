//! A match recorder that keeps records in memory for assertions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use collection_wars_backend::error::AppError;
use collection_wars_backend::services::match_recorder::{MatchRecord, MatchRecorder};

#[derive(Default, Clone)]
pub struct RecordingRecorder {
    records: Arc<Mutex<Vec<MatchRecord>>>,
}

impl RecordingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MatchRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchRecorder for RecordingRecorder {
    async fn record(&self, record: MatchRecord) -> Result<(), AppError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
