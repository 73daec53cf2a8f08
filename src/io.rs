//! File collaborator boundary
//!
//! The host owns the actual file dialogs. The core only asks for "a file to
//! import" and hands over "text to export"; either request may be cancelled.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{EditorError, EditorResult};
use crate::parse::import::{import_text, ProjectItem};
use crate::workspace::Workspace;

/// Only plain-text tab files can be imported
pub const IMPORT_EXTENSION: &str = "txt";

/// A file chosen by the user for import
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImportedFile {
    pub extension: String,
    pub contents: String,
}

pub trait ProjectFileIo {
    /// Ask for a file to import; `Ok(None)` when the user cancelled
    fn request_import(&mut self) -> EditorResult<Option<ImportedFile>>;

    /// Hand over exported text; `Ok(false)` when the user cancelled
    fn export_file(&mut self, text: &str) -> EditorResult<bool>;
}

/// Parse an already-chosen file, checking its type first
pub fn parse_imported_file(file: &ImportedFile) -> EditorResult<Vec<ProjectItem>> {
    if !file.extension.eq_ignore_ascii_case(IMPORT_EXTENSION) {
        log::warn!("import cancelled: unsupported file type '{}'", file.extension);
        return Err(EditorError::UnsupportedFileType(file.extension.clone()));
    }
    import_text(&file.contents)
}

/// Request a file and load it into the workspace
///
/// Returns `Ok(false)` when the request was cancelled. On any error the
/// workspace is left as it was.
pub fn import_project<F: ProjectFileIo + ?Sized>(
    io: &mut F,
    workspace: &mut Workspace,
) -> EditorResult<bool> {
    let Some(file) = io.request_import()? else {
        log::info!("import request cancelled");
        return Ok(false);
    };
    let items = parse_imported_file(&file)?;
    workspace.load_project(&items)?;
    Ok(true)
}

/// Export the workspace through the collaborator
pub fn export_project<F: ProjectFileIo + ?Sized>(
    io: &mut F,
    workspace: &Workspace,
) -> EditorResult<bool> {
    io.export_file(&workspace.export_text())
}

/// Native implementation reading and writing fixed paths
///
/// A missing path stands for a cancelled dialog.
#[derive(Clone, Debug, Default)]
pub struct FsFileIo {
    pub import_path: Option<PathBuf>,
    pub export_path: Option<PathBuf>,
}

impl FsFileIo {
    pub fn new(import_path: Option<PathBuf>, export_path: Option<PathBuf>) -> Self {
        Self {
            import_path,
            export_path,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}

impl ProjectFileIo for FsFileIo {
    fn request_import(&mut self) -> EditorResult<Option<ImportedFile>> {
        let Some(path) = self.import_path.as_deref() else {
            return Ok(None);
        };
        let contents = std::fs::read_to_string(path)?;
        Ok(Some(ImportedFile {
            extension: extension_of(path),
            contents,
        }))
    }

    fn export_file(&mut self, text: &str) -> EditorResult<bool> {
        let Some(path) = self.export_path.as_deref() else {
            return Ok(false);
        };
        std::fs::write(path, text)?;
        log::info!("exported {} bytes to {}", text.len(), path.display());
        Ok(true)
    }
}
