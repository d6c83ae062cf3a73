use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::Catalog;

/// Result of matching catalog image references against files on disk.
/// Missing references are reported, not fatal: the presentation layer shows
/// a placeholder panel until the file appears.
#[derive(Debug, Clone, Default)]
pub struct ImageResolution {
    pub resolved: BTreeMap<usize, PathBuf>,
    pub missing: Vec<String>,
}

impl ImageResolution {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Walk `root` and match each record's image reference by file name.
/// The first match wins; directory order is walkdir's sorted traversal so the
/// outcome is deterministic for a given tree.
pub fn resolve_images(root: &Path, catalog: &Catalog) -> ImageResolution {
    let mut by_name: BTreeMap<String, PathBuf> = BTreeMap::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        by_name
            .entry(name)
            .or_insert_with(|| entry.path().to_path_buf());
    }

    let mut resolution = ImageResolution::default();
    for (index, record) in catalog.records().iter().enumerate() {
        match by_name.get(&record.image) {
            Some(path) => {
                resolution.resolved.insert(index, path.clone());
            }
            None => resolution.missing.push(record.image.clone()),
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::resolve_images;
    use crate::catalog::Catalog;

    #[test]
    fn resolves_present_files_and_reports_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("paintings");
        fs::create_dir(&nested).expect("mkdir");
        fs::write(nested.join("socrates.jpg"), b"jpg").expect("write");
        fs::write(dir.path().join("stars.jpg"), b"jpg").expect("write");

        let catalog = Catalog::fallback();
        let resolution = resolve_images(dir.path(), &catalog);

        assert!(resolution.resolved.contains_key(&0), "socrates resolved");
        assert!(resolution.resolved.contains_key(&1), "stars resolved");
        assert!(!resolution.is_complete());
        assert_eq!(resolution.missing.len(), catalog.len() - 2);
    }
}
