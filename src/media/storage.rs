use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

/// Where normalized product images live. Names are flat, relative keys.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores `bytes` under `name`, or under a free variant of it if `name`
    /// is taken, and returns the name actually used.
    async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<String>;

    async fn open(&self, name: &str) -> io::Result<Vec<u8>>;

    async fn delete(&self, name: &str) -> io::Result<()>;
}

/// Media storage backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> io::Result<PathBuf> {
        let relative = Path::new(name);
        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(relative)),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid media name: {:?}", name),
            )),
        }
    }

    /// Writes a new file; fails with `AlreadyExists` if `name` is taken.
    async fn create_new(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(name)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        if let Err(err) = write_all(&mut file, bytes).await {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(err);
        }
        Ok(())
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// `photo.jpg` -> `photo_1a2b3c4.jpg`
fn suffixed(name: &str) -> String {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let token = Uuid::new_v4().simple().to_string();
    let suffix = &token[..7];
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
        None => format!("{}_{}", stem, suffix),
    }
}

#[async_trait]
impl MediaStorage for FileSystemStorage {
    async fn save(&self, name: &str, bytes: &[u8]) -> io::Result<String> {
        fs::create_dir_all(&self.root).await?;
        let mut candidate = name.to_string();
        loop {
            match self.create_new(&candidate, bytes).await {
                Ok(()) => {
                    debug!(name = %candidate, len = bytes.len(), "stored media file");
                    return Ok(candidate);
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = suffixed(name);
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn open(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(name)?).await
    }

    async fn delete(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path_for(name)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn taken_names_get_a_suffix() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path());

        let first = storage.save("phone.jpg", b"one").await.unwrap();
        let second = storage.save("phone.jpg", b"two").await.unwrap();

        assert_eq!(first, "phone.jpg");
        assert_ne!(second, first);
        assert!(second.starts_with("phone_") && second.ends_with(".jpg"));
        assert_eq!(storage.open(&first).await.unwrap(), b"one");
        assert_eq!(storage.open(&second).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn names_cannot_escape_the_root() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path().join("media"));

        for name in ["../secret.jpg", "nested/file.jpg", "/etc/passwd", ""] {
            let err = storage.open(name).await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{name}");
        }
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path());

        let name = storage.save("laptop.jpg", b"jpeg").await.unwrap();
        assert!(dir.path().join(&name).exists());
        storage.delete(&name).await.unwrap();
        assert!(!dir.path().join(&name).exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_never_share_a_name() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FileSystemStorage::new(dir.path()));

        for round in 0..50 {
            let name = format!("photo{round}.jpg");
            let first = tokio::spawn({
                let storage = storage.clone();
                let name = name.clone();
                async move { storage.save(&name, b"first").await }
            });
            let second = tokio::spawn({
                let storage = storage.clone();
                async move { storage.save(&name, b"second").await }
            });

            let first = first.await.unwrap().unwrap();
            let second = second.await.unwrap().unwrap();
            assert_ne!(first, second, "round {round}");
            assert_eq!(storage.open(&first).await.unwrap(), b"first");
            assert_eq!(storage.open(&second).await.unwrap(), b"second");
        }
    }
}
