use std::fmt;
use std::sync::{Arc, Mutex};

use log::info;

use crate::model::MatchSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardError {
    Unreachable(String),
    Rejected(String),
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardError::Unreachable(msg) => write!(f, "remote unreachable: {}", msg),
            ForwardError::Rejected(msg) => write!(f, "remote rejected snapshot: {}", msg),
        }
    }
}

impl std::error::Error for ForwardError {}

/// Best-effort downstream for committed snapshots.
///
/// The publisher calls `forward` after the local cache write and
/// notification succeed. A failure never rolls the local commit back and
/// never blocks it - the publisher logs and moves on. Retry and backoff
/// are the implementation's concern. Implementations might include an
/// HTTP client posting to a stats API, or a queue producer.
pub trait RemoteSink: Send + Sync {
    fn forward(&self, snapshot: &MatchSnapshot) -> Result<(), ForwardError>;
}

/// Sink that records each forwarded snapshot as a line, either into a
/// shared buffer or to the log.
pub struct LogSink {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    pub fn new() -> Self {
        LogSink { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogSink {
            buffer: Some(buffer),
        }
    }
}

impl RemoteSink for LogSink {
    fn forward(&self, snapshot: &MatchSnapshot) -> Result<(), ForwardError> {
        let line = format!(
            "match {} v{} {:?} {}-{}",
            snapshot.match_id,
            snapshot.version,
            snapshot.status,
            snapshot.series_score_a,
            snapshot.series_score_b
        );
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer
                .lock()
                .map_err(|_| ForwardError::Unreachable("forward buffer poisoned".into()))?;
            buffer.push(line);
        } else {
            info!("{}", line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::model::MatchStatus;

    #[test]
    fn forwards_to_buffer() {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = LogSink::with_buffer(Arc::clone(&buffer));
        let snapshot = MatchSnapshot {
            match_id: "m1".into(),
            best_of: 3,
            series_score_a: 1,
            series_score_b: 0,
            current_map_index: 2,
            maps: Vec::new(),
            team_a: Vec::new(),
            team_b: Vec::new(),
            status: MatchStatus::Live,
            version: 5,
            updated_at: SystemTime::now(),
        };

        sink.forward(&snapshot).unwrap();

        let lines = buffer.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("m1"));
        assert!(lines[0].contains("v5"));
    }
}
