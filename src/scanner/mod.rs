mod batch;

pub use batch::{classify_images, ScanRecord};

use crate::error::{EcoSortError, Result};
use ecosort_common::mime_for_extension;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub mimetype: String,
}

impl ImageInfo {
    /// 単一ファイルから生成。対応外の拡張子はエラー
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EcoSortError::FileNotFound(path.display().to_string()));
        }

        let mimetype = path
            .extension()
            .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
            .ok_or_else(|| EcoSortError::UnsupportedImage(path.display().to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let size = std::fs::metadata(path)?.len();

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size,
            mimetype: mimetype.to_string(),
        })
    }
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(EcoSortError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_path(path) {
            continue;
        }

        match ImageInfo::from_path(path) {
            Ok(info) => images.push(info),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "画像をスキップ"),
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| mime_for_extension(&ext.to_string_lossy()).is_some())
        .unwrap_or(false)
}
