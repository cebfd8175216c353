//! JSON 平面文件存储
//!
//! 整个集合以一个 JSON 数组保存在单个文件中，每次读取都会完整解析文件，
//! 每次写入都会完整重写文件。

use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("文件读写失败: {0}")]
    Io(#[from] io::Error),
    #[error("JSON 解析失败: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 基于单个 JSON 文件的存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件不存在时创建内容为 `[]` 的文件，返回是否新建
    pub async fn ensure_file(&self) -> Result<bool, StoreError> {
        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, "[]").await?;

        info!("数据文件创建成功: {}", self.path.display());
        Ok(true)
    }

    /// 读取并解析整个数组
    pub async fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        self.ensure_file().await?;

        let data = fs::read(&self.path).await?;
        let records: Vec<T> = serde_json::from_slice(&data)?;

        debug!("读取 {} 条记录: {}", records.len(), self.path.display());
        Ok(records)
    }

    /// 以 2 空格缩进重写整个数组
    ///
    /// 先写入同目录下的临时文件再重命名，读者不会看到写了一半的文件
    pub async fn write_all<T: Serialize>(&self, records: &[T]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(records)?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &data).await?;
        fs::rename(&tmp_path, &self.path).await?;

        debug!("写入 {} 条记录: {}", records.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
