//! Transcript storage trait and file-backed implementation

use crate::codec;
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use version_manager::{Transcript, TracingObserver, VersionObserver};

/// Transcript storage trait
#[async_trait]
pub trait TranscriptStorage: Send + Sync {
    /// Load a transcript, migrating legacy messages on read
    async fn load_transcript(&self, transcript_id: &str) -> Result<Transcript>;

    /// Save a transcript
    async fn save_transcript(&self, transcript_id: &str, transcript: &Transcript) -> Result<()>;

    /// Check if a transcript exists
    async fn transcript_exists(&self, transcript_id: &str) -> bool;

    /// Delete a transcript
    async fn delete_transcript(&self, transcript_id: &str) -> Result<()>;
}

/// File-based transcript storage, one pretty-printed JSON document per
/// transcript.
#[derive(Clone)]
pub struct FileTranscriptStorage {
    base_path: PathBuf,
    observer: Arc<dyn VersionObserver>,
}

impl FileTranscriptStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self::with_observer(base_path, Arc::new(TracingObserver))
    }

    pub fn with_observer<P: AsRef<Path>>(base_path: P, observer: Arc<dyn VersionObserver>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            observer,
        }
    }

    fn transcript_path(&self, transcript_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", transcript_id))
    }
}

#[async_trait]
impl TranscriptStorage for FileTranscriptStorage {
    async fn load_transcript(&self, transcript_id: &str) -> Result<Transcript> {
        let path = self.transcript_path(transcript_id);

        if !path.exists() {
            return Err(StoreError::NotFound);
        }

        let contents = fs::read_to_string(&path).await?;
        let transcript = codec::deserialize_transcript(&contents, self.observer.as_ref())?;

        let messages = transcript
            .messages
            .into_iter()
            .map(codec::migrate_legacy_message)
            .collect();
        Ok(Transcript::from_messages(messages))
    }

    async fn save_transcript(&self, transcript_id: &str, transcript: &Transcript) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.transcript_path(transcript_id);
        let contents = codec::serialize_transcript(transcript)?;

        fs::write(&path, contents).await?;

        Ok(())
    }

    async fn transcript_exists(&self, transcript_id: &str) -> bool {
        self.transcript_path(transcript_id).exists()
    }

    async fn delete_transcript(&self, transcript_id: &str) -> Result<()> {
        let path = self.transcript_path(transcript_id);

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use version_manager::Message;

    #[tokio::test]
    async fn test_file_storage_save_and_load() {
        let dir = tempdir().unwrap();
        let storage = FileTranscriptStorage::new(dir.path());

        let transcript = Transcript::from_messages(vec![
            Message::user("Hello"),
            Message::assistant("Hi there"),
        ]);
        storage.save_transcript("test", &transcript).await.unwrap();

        let loaded = storage.load_transcript("test").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.messages[0].id, transcript.messages[0].id);
    }

    #[tokio::test]
    async fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileTranscriptStorage::new(dir.path());

        let result = storage.load_transcript("nonexistent").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileTranscriptStorage::new(dir.path());

        let transcript = Transcript::from_messages(vec![Message::user("Hello")]);
        storage.save_transcript("test", &transcript).await.unwrap();

        assert!(storage.transcript_exists("test").await);

        storage.delete_transcript("test").await.unwrap();

        assert!(!storage.transcript_exists("test").await);
    }

    #[tokio::test]
    async fn test_load_migrates_legacy_messages() {
        let dir = tempdir().unwrap();
        let storage = FileTranscriptStorage::new(dir.path());

        let legacy = r#"[
            {"id": "m1", "role": "user", "content": [{"type": "text", "text": "Hi"}], "created": 100}
        ]"#;
        fs::write(dir.path().join("legacy.json"), legacy)
            .await
            .unwrap();

        let loaded = storage.load_transcript("legacy").await.unwrap();
        let message = &loaded.messages[0];
        let versions = message.versions.as_ref().unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version_number, 1);
        assert_eq!(versions[0].timestamp, 100);
        assert_eq!(message.current_version_index, Some(0));
    }
}
