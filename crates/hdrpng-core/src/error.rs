//! 统一错误类型定义.
//!
//! 所有 hdrpng crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// hdrpng 统一错误类型
#[derive(Debug, Error)]
pub enum HdrPngError {
    /// 无效参数 (空路径、零尺寸、未对齐缓冲区、位深越界、未知像素格式)
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 基础 PNG 编码器错误
    #[error("编码器错误: {0}")]
    Codec(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 未找到预期的 PNG 块 (如 IDAT)
    #[error("未找到 PNG 块: {0}")]
    ChunkNotFound(String),

    /// 无效数据 (损坏的 PNG 块结构等)
    #[error("无效数据: {0}")]
    InvalidData(String),
}

/// hdrpng 统一 Result 类型
pub type HdrResult<T> = Result<T, HdrPngError>;
