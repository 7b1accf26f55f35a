use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Final destination for a fully assembled download.
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn save(&self, filename: &str, bytes: Vec<u8>) -> std::io::Result<PathBuf>;
}

pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, filename: &str, bytes: Vec<u8>) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let output = self.dir.join(filename);
        let part = part_path_for(&output);

        if let Err(e) = tokio::fs::write(&part, &bytes).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }
        tokio::fs::rename(&part, &output).await?;

        Ok(output)
    }
}

fn part_path_for(output: &Path) -> PathBuf {
    let mut part = output.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_appends_suffix() {
        let output = Path::new("video.mp4");
        assert_eq!(part_path_for(output), PathBuf::from("video.mp4.part"));
    }

    #[test]
    fn part_path_nested() {
        let output = Path::new("downloads/tiktok/clip.mp3");
        assert_eq!(
            part_path_for(output),
            PathBuf::from("downloads/tiktok/clip.mp3.part")
        );
    }

    #[tokio::test]
    async fn writes_into_created_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("nested").join("out"));

        let path = sink.save("Cat.mp4", b"hello".to_vec()).await.unwrap();

        assert_eq!(path, tmp.path().join("nested").join("out").join("Cat.mp4"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert!(!part_path_for(&path).exists());
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        sink.save("a.mp3", vec![1, 2, 3]).await.unwrap();
        let path = sink.save("a.mp3", vec![9]).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![9]);
    }
}
