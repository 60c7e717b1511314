//! # hdrpng-codec
//!
//! hdrpng 像素处理与基础编码库.
//!
//! - [`convert`]: 源像素 (RGBA16F / 10:10:10:2) → BT.2020 PQ 16 位 RGB, 同时提取逐像素亮度
//! - [`quantize`]: 浮点 → 16 位定点, 模拟较低位深
//! - [`luminance`]: 基于直方图的 MaxCLL / MaxFALL 统计
//! - [`encoder`] / [`encoders`]: 基础 PNG 编码器接口与默认实现 (不含 HDR 元数据)

pub mod convert;
pub mod encoder;
pub mod encoders;
pub mod luminance;
pub mod quantize;

// 重导出常用类型
pub use convert::{ConvertedFrame, convert_frame};
pub use encoder::{BaselineEncoder, Rgb48Image};
pub use encoders::png::PngWriter;
pub use luminance::{ContentLightInfo, calculate_content_light_info};
