use crate::core::DriverTrait;
use crate::errors::{E2eError, Result};
use std::path::{Path, PathBuf};

pub struct ScreenshotManager;

impl ScreenshotManager {
    /// `<scenario>-attempt<N>-<timestamp>.png`, with the scenario name reduced
    /// to characters that are safe in a file name.
    pub fn failure_file_name(scenario: &str, attempt: u32) -> String {
        let slug: String = scenario
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug.trim_matches('-');
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%3f");
        format!("{}-attempt{}-{}.png", slug, attempt, timestamp)
    }

    pub async fn save_to_file<D: DriverTrait + ?Sized>(
        driver: &D,
        file_path: &Path,
    ) -> Result<()> {
        let screenshot_bytes = driver.take_screenshot().await?;
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(file_path, screenshot_bytes)
            .await
            .map_err(|e| E2eError::ScreenshotFailed(format!("{}: {}", file_path.display(), e)))?;
        Ok(())
    }

    pub async fn capture_failure<D: DriverTrait + ?Sized>(
        driver: &D,
        folder: &Path,
        scenario: &str,
        attempt: u32,
    ) -> Result<PathBuf> {
        let path = folder.join(Self::failure_file_name(scenario, attempt));
        Self::save_to_file(driver, &path).await?;
        Ok(path)
    }
}
