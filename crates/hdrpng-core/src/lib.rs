//! # hdrpng-core
//!
//! hdrpng 核心库, 提供基础类型定义、错误处理和工具函数.
//!
//! 为编码管线提供底层基础设施:
//! - 统一错误类型 [`HdrPngError`]
//! - PNG 使用的 CRC32 校验
//! - 色彩原色、传递特性 (PQ)、色彩空间矩阵
//! - 输入像素格式与 16 字节对齐缓冲区

pub mod aligned;
pub mod color;
pub mod crc;
pub mod error;
pub mod pixel_format;

// 重导出常用类型
pub use aligned::AlignedBuffer;
pub use error::{HdrPngError, HdrResult};
pub use pixel_format::PixelFormat;

/// 量化位深下限 (含)
pub const MIN_QUANTIZATION_BITS: u32 = 6;

/// 量化位深上限 (含)
pub const MAX_QUANTIZATION_BITS: u32 = 16;

/// 检查量化位深是否在 [6, 16] 范围内
pub fn validate_quantization_bits(bits: u32) -> HdrResult<()> {
    if !(MIN_QUANTIZATION_BITS..=MAX_QUANTIZATION_BITS).contains(&bits) {
        return Err(HdrPngError::InvalidArgument(format!(
            "量化位深 {} 超出范围 [{}, {}]",
            bits, MIN_QUANTIZATION_BITS, MAX_QUANTIZATION_BITS,
        )));
    }
    Ok(())
}
