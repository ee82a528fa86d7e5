use std::path::{Component, Path, PathBuf};

/// Process-wide shell state: the current working directory.
///
/// Every path-resolving call reads it through `&Environment`. Writing needs
/// `&mut Environment`, which the evaluator hands only to applications that
/// implement [`EnvApplication`](crate::apps::EnvApplication) (`cd`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    cwd: PathBuf,
}

impl Environment {
    /// Start in `cwd`, made absolute against the process directory if needed.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let cwd = if cwd.is_absolute() {
            cwd
        } else {
            std::env::current_dir()
                .map(|dir| dir.join(&cwd))
                .unwrap_or(cwd)
        };
        Self {
            cwd: normalize_path(&cwd),
        }
    }

    /// Start in the process's current directory.
    pub fn from_process() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a path relative to the current directory.
    ///
    /// Absolute paths are returned unchanged apart from normalization of
    /// `.` and `..` components.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            normalize_path(path)
        } else {
            normalize_path(&self.cwd.join(path))
        }
    }

    /// Replace the current directory. The caller checks that it exists.
    pub fn change_dir(&mut self, path: impl AsRef<Path>) {
        self.cwd = self.resolve(path);
    }
}

/// Resolve `.` and `..` lexically, so `/tmp/../home` becomes `/home`.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::RootDir => result.push("/"),
            Component::Normal(name) => result.push(name),
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
        }
    }

    if result.as_os_str().is_empty() {
        result.push("/");
    }
    result
}
