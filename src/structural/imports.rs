//! Asset kind inference for import statements

use std::path::Path;

use serde::Serialize;

use crate::ast::{AssetKind, DefaultImportKeyword, ImportStatement};

const MEDIA_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "mp3", "wav", "m4a", "aac"];

/// Inferred kind of an imported asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Html,
    Css,
    Media,
    Json,
    Unknown,
}

impl From<AssetKind> for ImportKind {
    fn from(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Html => ImportKind::Html,
            AssetKind::Css => ImportKind::Css,
            AssetKind::Media => ImportKind::Media,
            AssetKind::Json => ImportKind::Json,
        }
    }
}

impl ImportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportKind::Html => "html",
            ImportKind::Css => "css",
            ImportKind::Media => "media",
            ImportKind::Json => "json",
            ImportKind::Unknown => "unknown",
        }
    }
}

/// Type of an import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportType {
    /// Import name, or the keyword for default imports
    pub name: String,
    pub path: String,
    pub kind: ImportKind,
}

/// Infer an import's kind: an explicit `as` wins, then the default-import
/// keyword, then the file extension.
pub fn infer_import_type(import: &ImportStatement) -> ImportType {
    match import {
        ImportStatement::Default { keyword, path, .. } => ImportType {
            name: keyword_name(*keyword).to_string(),
            path: path.clone(),
            kind: keyword_kind(*keyword),
        },
        ImportStatement::Named {
            name,
            path,
            as_type,
            ..
        } => ImportType {
            name: name.clone(),
            path: path.clone(),
            kind: as_type
                .map(ImportKind::from)
                .unwrap_or_else(|| kind_from_extension(path)),
        },
    }
}

fn keyword_name(keyword: DefaultImportKeyword) -> &'static str {
    match keyword {
        DefaultImportKeyword::Layout => "layout",
        DefaultImportKeyword::Styles => "styles",
        DefaultImportKeyword::Provider => "provider",
    }
}

fn keyword_kind(keyword: DefaultImportKeyword) -> ImportKind {
    match keyword {
        DefaultImportKeyword::Layout => ImportKind::Html,
        DefaultImportKeyword::Styles => ImportKind::Css,
        DefaultImportKeyword::Provider => ImportKind::Media,
    }
}

/// Kind implied by a path's extension, ignoring case
pub fn kind_from_extension(path: &str) -> ImportKind {
    let Some(extension) = Path::new(path).extension().and_then(|e| e.to_str()) else {
        return ImportKind::Unknown;
    };
    let extension = extension.to_ascii_lowercase();
    match extension.as_str() {
        "html" | "htm" => ImportKind::Html,
        "css" => ImportKind::Css,
        "json" => ImportKind::Json,
        ext if MEDIA_EXTENSIONS.contains(&ext) => ImportKind::Media,
        _ => ImportKind::Unknown,
    }
}
