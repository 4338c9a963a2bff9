//! `transcript_store` persists chat transcripts: a JSON codec that tolerates
//! partial version records, migration of legacy pre-versioning documents,
//! and a file-backed storage trait.

pub mod codec;
pub mod error;
mod raw;
pub mod storage;

pub use codec::{
    deserialize_message, deserialize_transcript, has_version_data, migrate_legacy_message,
    serialize_message, serialize_transcript,
};
pub use error::{Result, StoreError};
pub use storage::{FileTranscriptStorage, TranscriptStorage};
