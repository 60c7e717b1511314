//! 编码流程.
//!
//! 参数校验 → 像素转换 (同时提取亮度) → 基础 PNG 编码 → 注入 HDR 元数据.

use std::fs;
use std::path::Path;

use hdrpng_codec::{BaselineEncoder, ContentLightInfo, PngWriter, convert_frame};
use hdrpng_core::aligned::is_aligned_16;
use hdrpng_core::{HdrPngError, HdrResult, PixelFormat, validate_quantization_bits};
use hdrpng_format::{MasteringDisplaySource, write_hdr_chunks_with};
use log::{debug, info};

use crate::config::EncodeConfig;

/// 编码结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub width: u32,
    pub height: u32,
    /// 写入 sBIT 的有效位深
    pub effective_bits: u32,
    /// 写入 cLLi 的内容亮度
    pub content_light: ContentLightInfo,
    /// 输出文件字节数
    pub file_size: u64,
}

/// HDR PNG 编码器
///
/// ```rust,no_run
/// use hdrpng::{HdrPngEncoder, PixelFormat};
/// use hdrpng::core::AlignedBuffer;
///
/// let pixels = AlignedBuffer::zeroed(64 * 64 * 4);
/// let summary = HdrPngEncoder::new(10)
///     .encode("shot.png".as_ref(), 64, 64, pixels.as_slice(), PixelFormat::R10G10B10A2Unorm)
///     .unwrap();
/// println!("MaxCLL: {:.1} cd/m²", summary.content_light.max_cll_nits());
/// ```
pub struct HdrPngEncoder<'a> {
    quantization_bits: u32,
    baseline: Box<dyn BaselineEncoder + 'a>,
    mastering: Option<&'a dyn MasteringDisplaySource>,
}

impl<'a> HdrPngEncoder<'a> {
    /// 使用默认 [`PngWriter`] 创建编码器
    pub fn new(quantization_bits: u32) -> Self {
        Self {
            quantization_bits,
            baseline: Box::new(PngWriter::new()),
            mastering: None,
        }
    }

    /// 按配置创建编码器
    pub fn from_config(config: &'a EncodeConfig) -> Self {
        let writer = PngWriter::new()
            .with_compression_level(config.compression_level)
            .with_srgb_hints(config.srgb_hints);
        let mut encoder = Self::new(config.quantization_bits).with_baseline_encoder(writer);
        if let Some(display) = &config.mastering_display {
            encoder = encoder.with_mastering_display(display);
        }
        encoder
    }

    /// 替换基础编码器
    pub fn with_baseline_encoder(mut self, encoder: impl BaselineEncoder + 'a) -> Self {
        self.baseline = Box::new(encoder);
        self
    }

    /// 设置母版显示器信息来源 (写入 mDCv)
    pub fn with_mastering_display(mut self, source: &'a dyn MasteringDisplaySource) -> Self {
        self.mastering = Some(source);
        self
    }

    /// 编码像素并写入 `path`
    ///
    /// 参数不合法时返回 [`HdrPngError::InvalidArgument`], 不产生任何文件.
    pub fn encode(
        &self,
        path: &Path,
        width: u32,
        height: u32,
        pixels: &[u8],
        format: PixelFormat,
    ) -> HdrResult<EncodeSummary> {
        validate_arguments(path, width, height, pixels, format, self.quantization_bits)?;

        let frame = convert_frame(pixels, width, height, format, self.quantization_bits)?;
        debug!(
            "基础编码器 {}: {}",
            self.baseline.name(),
            path.display(),
        );
        self.baseline.encode_rgb48(path, &frame.image())?;

        let content_light = write_hdr_chunks_with(
            path,
            width,
            height,
            &frame.luminance,
            frame.effective_bits,
            self.mastering,
        )?;
        let file_size = fs::metadata(path)?.len();

        info!(
            "HDR PNG 编码完成: {} {}x{} {}, {} 位, {} 字节",
            path.display(),
            width,
            height,
            format,
            frame.effective_bits,
            file_size,
        );
        Ok(EncodeSummary {
            width,
            height,
            effective_bits: frame.effective_bits,
            content_light,
            file_size,
        })
    }
}

/// 编码前的参数校验, 不做任何 I/O
fn validate_arguments(
    path: &Path,
    width: u32,
    height: u32,
    pixels: &[u8],
    format: PixelFormat,
    quantization_bits: u32,
) -> HdrResult<()> {
    if path.as_os_str().is_empty() {
        return Err(HdrPngError::InvalidArgument("输出路径不能为空".into()));
    }
    if width == 0 || height == 0 {
        return Err(HdrPngError::InvalidArgument("宽度和高度不能为 0".into()));
    }
    if !is_aligned_16(pixels) {
        return Err(HdrPngError::InvalidArgument("像素数据必须 16 字节对齐".into()));
    }
    if format == PixelFormat::None {
        return Err(HdrPngError::InvalidArgument("像素格式不能为 None".into()));
    }
    let needed = format.frame_size(width, height).ok_or_else(|| {
        HdrPngError::InvalidArgument(format!("图像尺寸 {}x{} 过大", width, height))
    })?;
    if pixels.len() < needed {
        return Err(HdrPngError::InvalidArgument(format!(
            "像素数据长度 {} 小于所需 {}",
            pixels.len(),
            needed,
        )));
    }
    validate_quantization_bits(quantization_bits)
}

/// 将像素编码为带 HDR 元数据的 PNG 文件
pub fn write_image_to_disk(
    path: &Path,
    width: u32,
    height: u32,
    pixels: &[u8],
    quantization_bits: u32,
    format: PixelFormat,
) -> HdrResult<()> {
    HdrPngEncoder::new(quantization_bits)
        .encode(path, width, height, pixels, format)
        .map(|_| ())
}
