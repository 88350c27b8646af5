//! # Error 模块
//!
//! 定义 shatter-core 中使用的错误类型。
//!
//! 求值器本身是纯函数，没有错误路径；只有碎片集构建会失败。

use thiserror::Error;

/// 碎片集构建错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// 输入的网格层级中没有任何网格
    #[error("网格层级为空，无法构建碎片集")]
    EmptyHierarchy,
}

/// Result 类型别名
pub type FragmentResult<T> = Result<T, FragmentError>;
