//! # hdrpng
//!
//! 纯 Rust 实现的 HDR10 PNG 编码器.
//!
//! 将线性 scRGB (RGBA16F) 或 BT.2020 PQ (10:10:10:2) 像素编码为 16 位 PNG,
//! 并写入 HDR 元数据块:
//! - **iCCP**: BT.2020 PQ ICC 配置文件
//! - **cICP**: [9, 16, 0, 1] (BT.2020, ST.2084, RGB, 全范围)
//! - **cLLi**: MaxCLL / MaxFALL
//! - **sBIT**: 有效位深
//! - **cHRM**: BT.2020 色度
//! - **mDCv**: 母版显示器信息 (可选)
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use hdrpng::{PixelFormat, write_image_to_disk};
//! use hdrpng::core::AlignedBuffer;
//!
//! let pixels = AlignedBuffer::zeroed(1920 * 1080 * 8);
//! write_image_to_disk(
//!     "capture.png".as_ref(),
//!     1920,
//!     1080,
//!     pixels.as_slice(),
//!     10,
//!     PixelFormat::R16G16B16A16Float,
//! )
//! .unwrap();
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `hdrpng-core` | 错误类型, CRC32, 色彩与 PQ, 像素格式 |
//! | `hdrpng-codec` | 像素转换, 量化, 亮度统计, 基础 PNG 编码器 |
//! | `hdrpng-format` | PNG 块编辑与 HDR 元数据注入 |

/// 核心类型与工具
pub use hdrpng_core as core;

/// 像素处理与基础编码
pub use hdrpng_codec as codec;

/// PNG 块编辑与 HDR 元数据
pub use hdrpng_format as format;

pub mod config;
pub mod encode;

pub use config::{EncodeConfig, MasteringDisplayConfig};
pub use encode::{EncodeSummary, HdrPngEncoder, write_image_to_disk};

pub use hdrpng_codec::{ContentLightInfo, calculate_content_light_info};
pub use hdrpng_core::crc::{crc32, crc32_range};
pub use hdrpng_core::{HdrPngError, HdrResult, PixelFormat};
pub use hdrpng_format::{remove_chunk, write_hdr_chunks};

/// 获取 hdrpng 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
