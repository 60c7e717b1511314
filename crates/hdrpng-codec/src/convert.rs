//! 像素格式转换模块.
//!
//! 将源像素转换为 BT.2020 PQ 编码的 16 位 RGB, 同时计算每个像素的
//! XYZ 亮度 (scRGB 单位) 供内容亮度统计使用.
//!
//! 支持的转换路径:
//! - R16G16B16A16Float (线性 BT.709) → BT.2020 → PQ → 16 位
//! - R10G10B10A2 / B10G10R10A2 (BT.2020 PQ) → 16 位
//!
//! Alpha 通道被丢弃.

use half::f16;
use hdrpng_core::color::{BT709_TO_BT2020, BT709_TO_XYZ, BT2020_TO_XYZ, pq_decode_rgb, pq_encode_rgb};
use hdrpng_core::{HdrPngError, HdrResult, PixelFormat, validate_quantization_bits};
use log::debug;

use crate::encoder::Rgb48Image;
use crate::quantize::{expand_unorm10, quantize_rgb, unorm16_from_unit};

/// 转换结果
#[derive(Debug, Clone)]
pub struct ConvertedFrame {
    /// 宽度
    pub width: u32,
    /// 高度
    pub height: u32,
    /// RGB 交错的 16 位样本, 紧凑行距
    pub rgb48: Vec<u16>,
    /// 每像素亮度 (XYZ 中的 Y, scRGB 单位)
    pub luminance: Vec<f32>,
    /// 实际有效位深 (10 位源最多为 10)
    pub effective_bits: u32,
}

impl ConvertedFrame {
    /// 以 [`Rgb48Image`] 视图借出像素数据
    pub fn image(&self) -> Rgb48Image<'_> {
        Rgb48Image {
            width: self.width,
            height: self.height,
            stride: self.width as usize * 3,
            samples: &self.rgb48,
        }
    }
}

/// 执行像素格式转换
///
/// # 参数
/// - `pixels`: 源像素, 紧凑行距, 小端
/// - `quantization_bits`: 目标有效位深 [6, 16]
pub fn convert_frame(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
    quantization_bits: u32,
) -> HdrResult<ConvertedFrame> {
    if width == 0 || height == 0 {
        return Err(HdrPngError::InvalidArgument("宽度和高度不能为 0".into()));
    }
    let pq_source = match format {
        PixelFormat::None => {
            return Err(HdrPngError::InvalidArgument("像素格式不能为 None".into()));
        }
        f => f.is_pq_encoded(),
    };
    validate_quantization_bits(quantization_bits)?;

    let frame_size = format.frame_size(width, height).ok_or_else(|| {
        HdrPngError::InvalidArgument(format!("无法计算 {}x{} {} 的帧大小", width, height, format))
    })?;
    if pixels.len() < frame_size {
        return Err(HdrPngError::InvalidArgument(format!(
            "像素数据长度 {} 小于所需 {}",
            pixels.len(),
            frame_size,
        )));
    }

    let pixel_count = width as usize * height as usize;
    let mut frame = ConvertedFrame {
        width,
        height,
        rgb48: Vec::with_capacity(pixel_count * 3),
        luminance: Vec::with_capacity(pixel_count),
        effective_bits: quantization_bits,
    };

    if pq_source {
        convert_packed10(&pixels[..frame_size], format, quantization_bits, &mut frame);
    } else {
        convert_rgba16f(&pixels[..frame_size], format, width as usize, quantization_bits, &mut frame);
    }

    debug!(
        "像素转换: {}x{} {} → RGB48, 有效位深 {}",
        width, height, format, frame.effective_bits,
    );
    Ok(frame)
}

// ============================================================
// 10:10:10:2 (BT.2020 PQ)
// ============================================================

/// 10 位打包格式 → 16 位
///
/// 量化位深不低于源位深时直接使用扩展后的 16 位值, 有效位深记为源位深.
fn convert_packed10(src: &[u8], format: PixelFormat, bits: u32, frame: &mut ConvertedFrame) {
    let bgr = format == PixelFormat::B10G10R10A2Unorm;
    let native = format.native_bits();
    if bits >= native {
        frame.effective_bits = native;
    }

    for px in src.chunks_exact(4) {
        let word = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
        let lo = expand_unorm10(word);
        let mid = expand_unorm10(word >> 10);
        let hi = expand_unorm10(word >> 20);
        let c = if bgr { [hi, mid, lo] } else { [lo, mid, hi] };

        let rgb = c.map(|v| f32::from(v) / 65535.0);
        if bits < native {
            frame.rgb48.extend_from_slice(&quantize_rgb(rgb, bits));
        } else {
            frame.rgb48.extend_from_slice(&c);
        }

        let linear = pq_decode_rgb(rgb.map(|v| v.clamp(0.0, 1.0)));
        frame.luminance.push(BT2020_TO_XYZ.luminance(linear));
    }
}

// ============================================================
// RGBA16F (线性 BT.709 / scRGB)
// ============================================================

/// 半精度浮点 → BT.2020 PQ 16 位
///
/// 按扫描行把半精度解码到 f32x4 缓冲区, 再逐像素处理.
fn convert_rgba16f(src: &[u8], format: PixelFormat, width: usize, bits: u32, frame: &mut ConvertedFrame) {
    let native = format.native_bits();
    let mut scanline = vec![[0.0f32; 4]; width];

    for row in src.chunks_exact(width * 8) {
        for (dst, px) in scanline.iter_mut().zip(row.chunks_exact(8)) {
            for (c, h) in dst.iter_mut().zip(px.chunks_exact(2)) {
                *c = f16::from_le_bytes([h[0], h[1]]).to_f32();
            }
        }

        for px in &scanline {
            let rgb = [px[0], px[1], px[2]];
            frame.luminance.push(BT709_TO_XYZ.luminance(rgb));

            let rgb2020 = BT709_TO_BT2020.transform(rgb).map(|c| c.max(0.0));
            let pq = pq_encode_rgb(rgb2020);
            if bits < native {
                frame.rgb48.extend_from_slice(&quantize_rgb(pq, bits));
            } else {
                frame.rgb48.extend_from_slice(&pq.map(unorm16_from_unit));
            }
        }
    }
}
