//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use ufo_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{UfoError, UfoResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle for assertions
/// while services own another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    /// Every path strictly below `root`.
    fn descendants(&self, root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let below = |p: &&PathBuf| p.starts_with(root) && p.as_path() != root;
        (
            self.directories.iter().filter(below).cloned().collect(),
            self.files.keys().filter(below).cloned().collect(),
        )
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dir_all(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All files below `root`, relative to it, sorted.
    pub fn files_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        inner
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .collect()
    }

    fn read(&self) -> UfoResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> UfoResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> UfoError {
    UfoError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn missing(path: &Path) -> UfoError {
    ApplicationError::filesystem(path, "No such file or directory").into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> UfoResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::filesystem(path, "a file exists at this path").into());
        }
        inner.add_dir_all(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> UfoResult<()> {
        let mut inner = self.write()?;
        if let Some(parent) = path.parent() {
            inner.add_dir_all(parent);
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> UfoResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| missing(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.read().map(|inner| inner.contains(path)).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> UfoResult<Vec<PathBuf>> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(missing(path));
        }
        let (dirs, files) = inner.descendants(path);
        Ok(dirs
            .into_iter()
            .chain(files)
            .filter(|p| p.parent() == Some(path))
            .collect())
    }

    fn rename(&self, from: &Path, to: &Path) -> UfoResult<()> {
        let mut inner = self.write()?;
        if !inner.contains(from) {
            return Err(missing(from));
        }
        if inner.contains(to) {
            return Err(ApplicationError::filesystem(to, "rename target already exists").into());
        }

        let moved = |p: &Path| p.strip_prefix(from).map(|rel| to.join(rel));
        let (dirs, files) = inner.descendants(from);
        for dir in dirs {
            inner.directories.remove(&dir);
            if let Ok(dest) = moved(&dir) {
                inner.directories.insert(dest);
            }
        }
        for file in files {
            if let (Some(content), Ok(dest)) = (inner.files.remove(&file), moved(&file)) {
                inner.files.insert(dest, content);
            }
        }
        if let Some(content) = inner.files.remove(from) {
            inner.files.insert(to.to_path_buf(), content);
        }
        if inner.directories.remove(from) {
            inner.add_dir_all(to);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> UfoResult<()> {
        let mut inner = self.write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn empty_dir(&self, path: &Path) -> UfoResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(missing(path));
        }
        inner
            .directories
            .retain(|p| !p.starts_with(path) || p.as_path() == path);
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> UfoResult<usize> {
        let mut inner = self.write()?;
        if !inner.directories.contains(from) {
            return Err(missing(from));
        }
        inner.add_dir_all(to);

        let (dirs, files) = inner.descendants(from);
        for dir in dirs {
            if let Ok(rel) = dir.strip_prefix(from) {
                let dest = to.join(rel);
                inner.directories.insert(dest);
            }
        }
        let mut copied = 0;
        for file in files {
            let (Ok(rel), Some(content)) = (file.strip_prefix(from), inner.files.get(&file))
            else {
                continue;
            };
            let dest = to.join(rel);
            let content = content.clone();
            inner.files.insert(dest, content);
            copied += 1;
        }
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_moves_a_whole_tree() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/s/node_modules/demo/package.json", "{}");
        fs.add_file("/s/node_modules/demo/lib/a.js", "a");

        fs.rename(Path::new("/s/node_modules/demo"), Path::new("/c/_demo"))
            .unwrap();

        assert!(!fs.exists(Path::new("/s/node_modules/demo")));
        assert_eq!(fs.read_file("/c/_demo/lib/a.js").as_deref(), Some("a"));
        assert!(fs.exists(Path::new("/c/_demo/lib")));
    }

    #[test]
    fn read_dir_lists_immediate_children_only() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/d/a.txt", "");
        fs.add_file("/d/sub/b.txt", "");

        let mut children = fs.read_dir(Path::new("/d")).unwrap();
        children.sort();
        assert_eq!(
            children,
            vec![PathBuf::from("/d/a.txt"), PathBuf::from("/d/sub")]
        );
    }

    #[test]
    fn copy_tree_counts_files() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/src/a.txt", "a");
        fs.add_file("/src/nested/b.txt", "b");

        let copied = fs.copy_tree(Path::new("/src"), Path::new("/dst")).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(
            fs.files_under("/dst"),
            vec![PathBuf::from("a.txt"), PathBuf::from("nested/b.txt")]
        );
    }

    #[test]
    fn empty_dir_keeps_root() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/.git/config", "");
        fs.add_file("/t/readme.md", "");

        fs.empty_dir(Path::new("/t")).unwrap();
        assert!(fs.exists(Path::new("/t")));
        assert!(fs.read_dir(Path::new("/t")).unwrap().is_empty());
    }
}
