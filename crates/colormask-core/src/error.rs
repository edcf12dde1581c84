//! 统一错误类型定义.
//!
//! 所有 colormask crate 共用的错误类型. 配置错误在构造阶段一次性报告,
//! 逐帧分类本身不会失败.

use thiserror::Error;

/// colormask 统一错误类型
#[derive(Debug, Error)]
pub enum MaskError {
    /// 无效参数 (容差范围, 帧几何尺寸等)
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的操作 (位深, 子采样布局, 向量宽度)
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 颜色列表解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 原始帧读写的 I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 数据不足, 需要更多输入
    #[error("数据不足, 需要更多输入")]
    NeedMoreData,
}

/// colormask 统一 Result 类型
pub type MaskResult<T> = Result<T, MaskError>;
