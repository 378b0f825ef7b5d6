//! Upload directory for superhero images.
//!
//! Files live flat in a single directory that the API serves under
//! [`PUBLIC_PREFIX`]. Records store the public path (`/uploads/<file>`),
//! never the filesystem path, so the directory can move without a data
//! migration.
//!
//! Deletion is best-effort: [`UploadDir::remove_all`] never fails, it
//! reports what happened to each path and leaves logging to the caller.

use std::path::{Component, Path, PathBuf};

use image::ImageFormat;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// URL prefix under which uploaded files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Maximum number of image parts accepted in a single request.
pub const MAX_IMAGES_PER_REQUEST: usize = 5;

/// Image formats accepted for upload, with the extension used on disk.
const SUPPORTED_FORMATS: &[(ImageFormat, &str)] = &[
    (ImageFormat::Png, "png"),
    (ImageFormat::Jpeg, "jpg"),
    (ImageFormat::Gif, "gif"),
    (ImageFormat::WebP, "webp"),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A file received in a multipart request, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-supplied file name, used only in error messages.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Detect the image format from the file's magic bytes and return the
    /// extension it is stored under.
    pub fn image_extension(&self) -> Result<&'static str, CoreError> {
        let unsupported =
            || CoreError::Validation(format!("Unsupported image format: {}", self.file_name));
        let format = image::guess_format(&self.bytes).map_err(|_| unsupported())?;
        SUPPORTED_FORMATS
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, ext)| *ext)
            .ok_or_else(unsupported)
    }
}

/// What happened to one path during a best-effort removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The file was deleted.
    Removed,
    /// No file existed at the path.
    Missing,
    /// The path does not name a file inside the upload directory.
    Rejected,
    /// The filesystem refused the deletion.
    Failed(String),
}

impl RemovalOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Rejected | Self::Failed(_))
    }
}

/// Per-path outcomes of a best-effort removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub entries: Vec<(String, RemovalOutcome)>,
}

impl RemovalReport {
    /// Paths that could not be removed, with their outcome.
    pub fn failures(&self) -> impl Iterator<Item = &(String, RemovalOutcome)> {
        self.entries.iter().filter(|(_, outcome)| outcome.is_failure())
    }

    pub fn removed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| *outcome == RemovalOutcome::Removed)
            .count()
    }

    pub fn attempted(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// UploadDir
// ---------------------------------------------------------------------------

/// The directory uploaded images are written to.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_exists(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Check that every file is a supported image without writing anything.
    pub fn validate_all(files: &[UploadedFile]) -> Result<(), CoreError> {
        if files.len() > MAX_IMAGES_PER_REQUEST {
            return Err(CoreError::Validation(format!(
                "A maximum of {MAX_IMAGES_PER_REQUEST} images can be uploaded at once"
            )));
        }
        for file in files {
            file.image_extension()?;
        }
        Ok(())
    }

    /// Write one file and return its public path.
    pub async fn save(&self, file: &UploadedFile) -> Result<String, CoreError> {
        let ext = file.image_extension()?;
        let name = format!(
            "{}-{}.{ext}",
            chrono::Utc::now().timestamp_millis(),
            uuid::Uuid::new_v4()
        );

        self.ensure_exists()
            .await
            .map_err(|e| CoreError::Internal(format!("create upload dir: {e}")))?;
        tokio::fs::write(self.root.join(&name), &file.bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("write upload {name}: {e}")))?;

        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    /// Write every file, in order. If any write fails, files already
    /// written by this call are removed before the error is returned.
    pub async fn save_all(&self, files: &[UploadedFile]) -> Result<Vec<String>, CoreError> {
        Self::validate_all(files)?;

        let mut saved = Vec::with_capacity(files.len());
        for file in files {
            match self.save(file).await {
                Ok(path) => saved.push(path),
                Err(e) => {
                    self.remove_all(&saved).await;
                    return Err(e);
                }
            }
        }
        Ok(saved)
    }

    /// Map a public path to the file it names inside the directory.
    ///
    /// Only `/uploads/<name>` with a single plain file name is accepted.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(PUBLIC_PREFIX)?
            .strip_prefix('/')?;
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Some(self.root.join(file)),
            _ => None,
        }
    }

    /// Delete the file behind one public path.
    pub async fn remove(&self, public_path: &str) -> RemovalOutcome {
        let Some(path) = self.resolve(public_path) else {
            return RemovalOutcome::Rejected;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => RemovalOutcome::Removed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RemovalOutcome::Missing,
            Err(e) => RemovalOutcome::Failed(e.to_string()),
        }
    }

    /// Delete the files behind every path, reporting each outcome.
    pub async fn remove_all(&self, public_paths: &[String]) -> RemovalReport {
        let mut report = RemovalReport::default();
        for path in public_paths {
            let outcome = self.remove(path).await;
            report.entries.push((path.clone(), outcome));
        }
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
