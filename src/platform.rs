//! Platform surface used by the export actions: print, confirm/alert prompts
//! and saving a downloaded file.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Side effects the workflow asks the host environment to perform.
pub trait Platform: Send + Sync {
    /// Open the print surface for the given markup.
    fn print(&self, html: &str);
    /// Ask the operator a yes/no question.
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
    /// Save a downloaded file and return where it landed.
    fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PlatformError>;
}

const PRINT_PREVIEW_FILE: &str = "print-preview.html";

/// Terminal-backed platform used by the `loan-docs` binary.
pub struct TerminalPlatform {
    download_dir: PathBuf,
    assume_yes: bool,
}

impl TerminalPlatform {
    pub fn new(download_dir: impl Into<PathBuf>, assume_yes: bool) -> Self {
        Self {
            download_dir: download_dir.into(),
            assume_yes,
        }
    }

    fn write_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PlatformError> {
        fs::create_dir_all(&self.download_dir).map_err(|source| PlatformError::CreateDir {
            path: self.download_dir.clone(),
            source,
        })?;

        let mut safe_name = sanitize_filename::sanitize(filename);
        if safe_name.is_empty() {
            safe_name = "document.pdf".to_string();
        }
        let path = self.download_dir.join(safe_name);
        fs::write(&path, bytes).map_err(|source| PlatformError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl Platform for TerminalPlatform {
    fn print(&self, html: &str) {
        match self.write_file(PRINT_PREVIEW_FILE, html.as_bytes()) {
            Ok(path) => {
                log::info!("Print preview written to {}", path.display());
                println!("Open {} in a browser to print.", path.display());
            }
            Err(e) => log::error!("Failed to write print preview: {}", e),
        }
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} [y/N] y", message);
            return true;
        }

        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                log::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }

    fn alert(&self, message: &str) {
        println!("{}", message);
    }

    fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PlatformError> {
        self.write_file(filename, bytes)
    }
}
