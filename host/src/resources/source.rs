//! # Source 模块
//!
//! 资源字节从哪里来。加载器只认逻辑路径（见 `path` 模块），
//! 具体落到磁盘还是内存由实现决定。

use std::collections::HashMap;
use std::path::PathBuf;

use super::ResourceError;
use super::path::normalize_logical_path;

/// 资源来源
///
/// 需要 `Send + Sync`，因为加载在后台线程中进行。
pub trait ResourceSource: Send + Sync {
    /// 按逻辑路径读取全部字节
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// 用于日志的完整路径
    fn full_path(&self, path: &str) -> String;
}

/// 磁盘上的资源目录
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// `root` 通常是配置中的 `assets_root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, path: &str) -> PathBuf {
        self.root.join(normalize_logical_path(path))
    }
}

impl ResourceSource for FsSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let file = self.locate(path);
        let display = file.to_string_lossy().to_string();

        if !file.is_file() {
            return Err(ResourceError::NotFound { path: display });
        }

        std::fs::read(&file).map_err(|e| ResourceError::LoadFailed {
            path: display,
            kind: "file".to_string(),
            message: e.to_string(),
        })
    }

    fn full_path(&self, path: &str) -> String {
        self.locate(path).to_string_lossy().to_string()
    }
}

/// 内存中的资源表（演示资源、测试）
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize_logical_path(path), bytes.into());
    }

    /// 链式写入，便于一次性构造
    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let key = normalize_logical_path(path);
        match self.files.get(&key) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(ResourceError::NotFound { path: key }),
        }
    }

    fn full_path(&self, path: &str) -> String {
        format!("memory://{}", normalize_logical_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("models")).unwrap();
        std::fs::write(dir.path().join("models/stone.bin"), [1u8, 2, 3]).unwrap();

        let source = FsSource::new(dir.path());
        assert_eq!(source.read("./models/../models/stone.bin").unwrap(), vec![1, 2, 3]);
        // 目录不是资源
        assert!(matches!(source.read("models"), Err(ResourceError::NotFound { .. })));
        assert_eq!(source.read("assets/models/stone.bin").unwrap(), vec![1, 2, 3]);

        assert!(matches!(
            source.read("models/missing.bin"),
            Err(ResourceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with_file("assets/models/a.bin", vec![9u8]);
        assert_eq!(source.len(), 1);
        assert_eq!(source.read("models/a.bin").unwrap(), vec![9]);
        assert_eq!(source.full_path("models/a.bin"), "memory://models/a.bin");
        assert_eq!(
            source.read("nope"),
            Err(ResourceError::NotFound {
                path: "nope".to_string()
            })
        );
    }
}
