// ==============================================================================
// validator.rs - Input File Validation
// ==============================================================================
// Description: Validates genemap2 input files (path, size, type, format)
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// Security: Allowlist-only file types, content sniffing before parse
// ==============================================================================

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::parsers::genemap2::columns;

const MAX_FILE_SIZE: u64 = 500 * 1024 * 1024; // 500 MB

/// Extensions accepted for genemap2 exports
const ALLOWED_EXTENSIONS: &[&str] = &["txt"];

#[derive(Debug)]
pub struct ValidatedFile {
    pub file_name: String,
    pub extension: String,
    pub size: u64,
    pub hash_sha256: String,
    pub validated_at: chrono::DateTime<chrono::Utc>,
}

/// Validates a genemap2 input path before parsing
///
/// Fatal on any failure: a file that cannot be opened or does not look like
/// a genemap2 export surfaces immediately, before row processing starts.
pub struct FileValidator {
    max_file_size: u64,
}

impl FileValidator {
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Validate the input file path and content shape
    ///
    /// Checks, in order: path is an existing regular file, size is within
    /// bounds, extension is allowlisted, the content sniffs as genemap2
    /// (comment header, 14-column data rows). Computes a SHA-256 content
    /// hash for the run log.
    pub fn validate_input(&self, file_path: &Path) -> Result<ValidatedFile> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid file path: {:?}", file_path))?
            .to_string_lossy()
            .to_string();

        info!("Validating input file: {}", file_name);

        // 1. Path check
        let metadata = std::fs::metadata(file_path)
            .with_context(|| format!("Input file '{}' not found or unreadable", file_path.display()))?;

        if !metadata.is_file() {
            anyhow::bail!("Input path '{}' is not a regular file", file_path.display());
        }

        // 2. Size check
        let size = metadata.len();
        if size > self.max_file_size {
            anyhow::bail!(
                "File too large: {} bytes (max: {} bytes)",
                size,
                self.max_file_size
            );
        }
        debug!("Size check passed: {} bytes", size);

        // 3. Extension check (allowlist)
        let extension = file_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("No file extension found"))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            anyhow::bail!("Invalid file type: expected .txt, got .{}", extension);
        }
        debug!("Extension check passed: {}", extension);

        // 4. Content validation (basic format check)
        self.validate_genemap2_format(file_path)?;
        debug!("Content validation passed");

        // 5. Compute SHA-256 hash
        let hash = self.compute_sha256(file_path)?;
        debug!("SHA-256: {}", hash);

        Ok(ValidatedFile {
            file_name,
            extension,
            size,
            hash_sha256: hash,
            validated_at: chrono::Utc::now(),
        })
    }

    fn validate_genemap2_format(&self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // genemap2 exports open with a copyright/header comment block
        let first_line = lines
            .next()
            .ok_or_else(|| anyhow::anyhow!("File is empty"))??;

        if !first_line.starts_with('#') {
            anyhow::bail!("Not a valid genemap2 file: missing comment header");
        }

        // First data line should split into at least the 14 known columns
        for line in lines {
            let line = line?;
            if !line.starts_with('#') && !line.trim().is_empty() {
                let column_count = line.split('\t').count();
                if column_count < columns::MIN_COLUMNS {
                    anyhow::bail!(
                        "Invalid genemap2 format: expected at least {} columns, found {}",
                        columns::MIN_COLUMNS,
                        column_count
                    );
                }
                break;
            }
        }

        Ok(())
    }

    fn compute_sha256(&self, path: &Path) -> Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 8192];

        loop {
            let n = file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new()
    }
}
