use super::Interceptor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use chrono::Utc;

/// Writes each exchange to `<base_path>/quiz_<timestamp>.md`.
#[derive(Debug)]
pub struct FileInterceptor {
    base_path: PathBuf,
}

impl FileInterceptor {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Interceptor for FileInterceptor {
    async fn save(&self, prompt: &str, response: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let timestamp = Utc::now();
        let filename = format!("quiz_{}.md", timestamp.format("%Y%m%d_%H%M%S_%3f"));
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path).await?;

        let content = format!(
            "# Prompt\n\n{}\n\n# Response\n\n{}\n",
            prompt,
            response
        );

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_prompt_and_response() {
        let dir = std::env::temp_dir().join(format!(
            "quiz_forge_interceptor_{}",
            Utc::now().format("%Y%m%d%H%M%S%f")
        ));
        let interceptor = FileInterceptor::new(dir.clone());
        interceptor.save("the prompt", "{\"mcqs\":[]}").await.unwrap();

        let mut entries = std::fs::read_dir(&dir).unwrap();
        let entry = entries.next().unwrap().unwrap();
        let content = std::fs::read_to_string(entry.path()).unwrap();
        assert!(content.starts_with("# Prompt\n\nthe prompt"));
        assert!(content.contains("# Response\n\n{\"mcqs\":[]}"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
