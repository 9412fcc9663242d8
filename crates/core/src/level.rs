//! API level files
//!
//! Locates the per-level signature file inside an API folder.

use std::path::{Path, PathBuf};

/// Concrete syntax of a signature file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    /// Legacy XML form (`N.xml`)
    Xml,
    /// Compact text form (`N.txt`)
    Text,
}

impl SignatureFormat {
    /// Detect the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xml" => Some(SignatureFormat::Xml),
            "txt" => Some(SignatureFormat::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SignatureFormat::Xml => "xml",
            SignatureFormat::Text => "txt",
        }
    }
}

/// One signature file for one API level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFile {
    pub level: u32,
    pub path: PathBuf,
    pub format: SignatureFormat,
}

impl LevelFile {
    /// Find the file for `level` in `dir`.
    ///
    /// Both `N.xml` and `N.txt` are candidates; `prefer_xml` decides which
    /// one wins when both are present.
    pub fn locate(dir: &Path, level: u32, prefer_xml: bool) -> Option<Self> {
        let order = if prefer_xml {
            [SignatureFormat::Xml, SignatureFormat::Text]
        } else {
            [SignatureFormat::Text, SignatureFormat::Xml]
        };

        order.into_iter().find_map(|format| {
            let path = dir.join(format!("{}.{}", level, format.extension()));
            path.is_file().then_some(LevelFile { level, path, format })
        })
    }

    /// File name used in diagnostics
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
