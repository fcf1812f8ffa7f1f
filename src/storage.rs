use crate::domain::event::Event;
use crate::domain::participant::EventParticipant;
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Certificate PDF artifact storage. `store` returns a serving URL; `delete`
/// is the compensating action when the issuing transaction fails after the
/// artifact was written.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn store(&self, path: &str, bytes: Vec<u8>) -> Result<String>;
    async fn delete(&self, path: &str) -> Result<()>;
}

pub struct LocalArtifactStore {
    pub root: PathBuf,
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.context("create artifact dir")?;
        }
        tokio::fs::write(&full, bytes).await.context("write artifact")?;
        Ok(format!("/artifacts/{path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full = self.root.join(path);
        tokio::fs::remove_file(full).await.context("delete artifact")?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryArtifactStore {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn store(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        self.files
            .lock()
            .map_err(|_| anyhow!("artifact store lock poisoned"))?
            .insert(path.to_string(), bytes);
        Ok(format!("mem://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.files
            .lock()
            .map_err(|_| anyhow!("artifact store lock poisoned"))?
            .remove(path);
        Ok(())
    }
}

/// Renders the certificate artifact. The real PDF layout lives outside the
/// engine; the placeholder renderer keeps the seam honest in prod wiring.
pub trait CertificateRenderer: Send + Sync {
    fn render(&self, event: &Event, participant: &EventParticipant) -> Result<Vec<u8>>;
}

pub struct PlaceholderPdfRenderer;

impl CertificateRenderer for PlaceholderPdfRenderer {
    fn render(&self, event: &Event, participant: &EventParticipant) -> Result<Vec<u8>> {
        let body = format!(
            "CERTIFICATE OF COMPLETION\n{}\nparticipant {}\nregistration {}\n",
            event.title, participant.participant_id, participant.registration_number
        );
        Ok(body.into_bytes())
    }
}
