//! Scoped acquisition of the directory generated `.j` files and
//! assembled classes are written into, per spec.md §5: cleanup happens
//! on every exit path, including one triggered by `?`-propagated errors,
//! because cleanup is tied to the guard's `Drop` rather than to any
//! particular return statement.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub enum OutputDir {
    Temp(TempDir),
    Persistent(PathBuf),
}

impl OutputDir {
    /// A fresh temporary directory, removed when the guard drops.
    pub fn temp() -> std::io::Result<Self> {
        Ok(Self::Temp(TempDir::new()?))
    }

    /// A caller-supplied directory that outlives the guard; used when the
    /// driver is asked to keep its intermediate output around.
    pub fn persistent(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Self::Persistent(path))
    }

    pub fn path(&self) -> &Path {
        match self {
            OutputDir::Temp(dir) => dir.path(),
            OutputDir::Persistent(path) => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_is_removed_on_drop() {
        let dir = OutputDir::temp().unwrap();
        let path = dir.path().to_path_buf();
        assert!(path.exists());
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn persistent_dir_survives_drop() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("kept");
        {
            let dir = OutputDir::persistent(&nested).unwrap();
            assert!(dir.path().exists());
        }
        assert!(nested.exists());
    }
}
