//! HDR 元数据注入.
//!
//! 在基础 PNG 上移除 sRGB / gAMA, 并在第一个 IDAT 之前依次插入:
//! iCCP, cICP, cLLi, sBIT, cHRM, 以及可选的 mDCv.

use std::fs;
use std::path::Path;

use hdrpng_codec::{ContentLightInfo, calculate_content_light_info};
use hdrpng_core::color::ColorPrimaries;
use hdrpng_core::{HdrPngError, HdrResult, validate_quantization_bits};
use log::{debug, info};

use crate::chunk::{Chunk, ChunkTag, chunks};
use crate::editor::encode_chunks;
use crate::icc::IccProfilePayload;
use crate::metadata::{
    ChromaticityPayload, ChunkPayload, CodingIndependentCodePoints, MasteringDisplay,
    MasteringDisplayPayload, SignificantBits,
};

/// 母版显示器信息来源
///
/// 返回 `None` 时不写 mDCv 块.
pub trait MasteringDisplaySource {
    fn mastering_display(&self) -> Option<MasteringDisplay>;
}

impl MasteringDisplaySource for MasteringDisplay {
    fn mastering_display(&self) -> Option<MasteringDisplay> {
        Some(*self)
    }
}

/// 待删除的 SDR 提示块
const STRIPPED_CHUNKS: [ChunkTag; 2] = [ChunkTag::SRGB, ChunkTag::GAMA];

/// 按插入顺序构造 HDR 元数据块
pub fn build_hdr_chunks(
    light: &ContentLightInfo,
    quantization_bits: u32,
    mastering: Option<&dyn MasteringDisplaySource>,
) -> HdrResult<Vec<Chunk>> {
    validate_quantization_bits(quantization_bits)?;

    let mut list = vec![
        IccProfilePayload::pq_bt2020().to_chunk(),
        CodingIndependentCodePoints::hdr10().to_chunk(),
        light.to_chunk(),
        SignificantBits::uniform(quantization_bits as u8).to_chunk(),
        ChromaticityPayload::from_primaries(ColorPrimaries::Bt2020)
            .ok_or_else(|| HdrPngError::InvalidData("缺少 BT.2020 色度坐标".into()))?
            .to_chunk(),
    ];
    if let Some(display) = mastering.and_then(|m| m.mastering_display()) {
        list.push(MasteringDisplayPayload::from_display(&display).to_chunk());
    }
    Ok(list)
}

/// 在内存中的 PNG 上注入 HDR 元数据, 返回计算出的内容亮度
///
/// 按块结构遍历定位 sRGB / gAMA 与第一个 IDAT, 其他块数据中的同名字节不受影响.
/// 出错时 `png` 保持原样.
pub fn inject_hdr_chunks(
    png: &mut Vec<u8>,
    width: u32,
    height: u32,
    luminance: &[f32],
    quantization_bits: u32,
    mastering: Option<&dyn MasteringDisplaySource>,
) -> HdrResult<ContentLightInfo> {
    if width == 0 || height == 0 {
        return Err(HdrPngError::InvalidArgument("宽度和高度不能为 0".into()));
    }
    validate_quantization_bits(quantization_bits)?;

    let mut stripped = Vec::new();
    let mut idat = None;
    for chunk in chunks(png)? {
        let chunk = chunk?;
        match chunk.chunk_tag() {
            Some(ChunkTag::IDAT) => {
                idat = Some(chunk.offset);
                break;
            }
            Some(tag) if STRIPPED_CHUNKS.contains(&tag) => {
                stripped.push((tag, chunk.offset..chunk.offset + chunk.encoded_len()));
            }
            _ => {}
        }
    }
    let mut idat = idat.ok_or_else(|| HdrPngError::ChunkNotFound("PNG 中没有 IDAT 块".into()))?;

    let light = calculate_content_light_info(luminance, width, height);
    let list = build_hdr_chunks(&light, quantization_bits, mastering)?;
    let encoded = encode_chunks(&list)?;

    // 从后往前删除, 前面的偏移保持有效
    for (tag, range) in stripped.into_iter().rev() {
        debug!("移除 {} 块: 偏移 {}, {} 字节", tag, range.start, range.len());
        idat -= range.len();
        png.drain(range);
    }

    let inserted = encoded.len();
    png.splice(idat..idat, encoded);

    debug!(
        "注入 HDR 元数据: {} 个块, {} 字节, MaxCLL {:.2} cd/m², MaxFALL {:.2} cd/m²",
        list.len(),
        inserted,
        light.max_cll_nits(),
        light.max_fall_nits(),
    );
    Ok(light)
}

/// 向 PNG 文件写入 HDR 元数据块
///
/// 整个文件读入内存修改后一次性覆盖写回.
pub fn write_hdr_chunks(
    path: &Path,
    width: u32,
    height: u32,
    luminance: &[f32],
    quantization_bits: u32,
) -> HdrResult<()> {
    write_hdr_chunks_with(path, width, height, luminance, quantization_bits, None).map(|_| ())
}

/// 同 [`write_hdr_chunks`], 可附带母版显示器信息
pub fn write_hdr_chunks_with(
    path: &Path,
    width: u32,
    height: u32,
    luminance: &[f32],
    quantization_bits: u32,
    mastering: Option<&dyn MasteringDisplaySource>,
) -> HdrResult<ContentLightInfo> {
    if width == 0 || height == 0 {
        return Err(HdrPngError::InvalidArgument("宽度和高度不能为 0".into()));
    }
    validate_quantization_bits(quantization_bits)?;

    let mut png = fs::read(path)?;
    let original_len = png.len();
    let light = inject_hdr_chunks(&mut png, width, height, luminance, quantization_bits, mastering)?;
    fs::write(path, &png)?;

    info!(
        "已写入 HDR 元数据: {} ({} → {} 字节)",
        path.display(),
        original_len,
        png.len(),
    );
    Ok(light)
}
