//! PNG 块信息探测.
//!
//! 遍历块结构, 解析已知的 HDR 元数据块, 不解码像素.

use anyhow::Result;
use serde::Serialize;

use hdrpng_codec::ContentLightInfo;
use hdrpng_core::color::{ColorPrimaries, ColorRange, ColorSpace, ColorTransfer};
use hdrpng_format::{
    ChromaticityPayload, ChunkPayload, ChunkRef, ChunkTag, CodingIndependentCodePoints,
    IccProfilePayload, MasteringDisplayPayload, SignificantBits, chunks,
};

/// 完整探测结果
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub filename: String,
    pub file_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
    pub chunks: Vec<ChunkInfo>,
    pub hdr: HdrInfo,
}

/// IHDR 信息
#[derive(Debug, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
}

/// 单个块
#[derive(Debug, Serialize)]
pub struct ChunkInfo {
    pub tag: String,
    pub offset: usize,
    pub length: usize,
    pub crc_ok: bool,
}

/// cICP 码点的可读名称, 未知码点为 `None`
#[derive(Debug, Serialize)]
pub struct CicpNames {
    pub color_primaries: Option<String>,
    pub transfer: Option<String>,
    pub matrix: Option<String>,
    pub range: Option<String>,
    /// 传递特性是否为 PQ / HLG
    pub hdr_transfer: bool,
}

impl CicpNames {
    fn decode(cicp: [u8; 4]) -> Self {
        let transfer = ColorTransfer::from_cicp_code(cicp[1]);
        Self {
            color_primaries: ColorPrimaries::from_cicp_code(cicp[0]).map(|v| format!("{v:?}")),
            transfer: transfer.map(|v| format!("{v:?}")),
            matrix: ColorSpace::from_cicp_code(cicp[2]).map(|v| format!("{v:?}")),
            range: ColorRange::from_cicp_full_range_flag(cicp[3]).map(|v| format!("{v:?}")),
            hdr_transfer: transfer.is_some_and(|t| t.is_hdr()),
        }
    }
}

/// HDR 元数据汇总
#[derive(Debug, Default, Serialize)]
pub struct HdrInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cicp: Option<[u8; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cicp_names: Option<CicpNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cll_nits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fall_nits: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_bits: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromaticities: Option<[u32; 8]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastering_luminance_nits: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icc_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icc_profile_size: Option<usize>,
    pub has_srgb: bool,
    pub has_gama: bool,
}

impl HdrInfo {
    /// 是否包含 HDR10 的 cICP 码点
    pub fn is_hdr10(&self) -> bool {
        self.cicp.is_some_and(|c| c[..] == CodingIndependentCodePoints::hdr10().to_payload()[..])
    }
}

/// IHDR 数据: 宽, 高, 位深, 颜色类型
fn ihdr_summary(payload: &[u8]) -> Option<ImageInfo> {
    if payload.len() != 13 {
        return None;
    }
    Some(ImageInfo {
        width: u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]),
        height: u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]),
        bit_depth: payload[8],
        color_type: payload[9],
    })
}

/// 解析已知块, 解析失败时记录警告并跳过
fn collect_hdr(chunk: &ChunkRef<'_>, hdr: &mut HdrInfo) {
    let Some(tag) = chunk.chunk_tag() else {
        return;
    };
    let data = chunk.payload;
    let result = match tag {
        ChunkTag::CICP => CodingIndependentCodePoints::from_payload(data).map(|c| {
            let codes = [
                c.color_primaries,
                c.transfer_function,
                c.matrix_coefficients,
                c.video_full_range,
            ];
            hdr.cicp = Some(codes);
            hdr.cicp_names = Some(CicpNames::decode(codes));
        }),
        ChunkTag::CLLI => ContentLightInfo::from_payload(data).map(|c| {
            hdr.max_cll_nits = Some(c.max_cll_nits());
            hdr.max_fall_nits = Some(c.max_fall_nits());
        }),
        ChunkTag::SBIT => SignificantBits::from_payload(data).map(|s| {
            hdr.significant_bits = Some([s.red, s.green, s.blue]);
        }),
        ChunkTag::CHRM => ChromaticityPayload::from_payload(data).map(|c| {
            hdr.chromaticities = Some([
                c.white.0, c.white.1, c.red.0, c.red.1, c.green.0, c.green.1, c.blue.0, c.blue.1,
            ]);
        }),
        ChunkTag::MDCV => MasteringDisplayPayload::from_payload(data).map(|m| {
            hdr.mastering_luminance_nits = Some([
                f64::from(m.min_luminance) * 0.0001,
                f64::from(m.max_luminance) * 0.0001,
            ]);
        }),
        ChunkTag::ICCP => IccProfilePayload::from_payload(data).map(|icc| {
            hdr.icc_profile_size = icc.decompress().ok().map(|p| p.len());
            hdr.icc_profile = Some(icc.name);
        }),
        ChunkTag::SRGB => {
            hdr.has_srgb = true;
            Ok(())
        }
        ChunkTag::GAMA => {
            hdr.has_gama = true;
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(e) = result {
        log::warn!("解析 {} 块失败: {}", tag, e);
    }
}

/// 探测内存中的 PNG 数据
pub fn probe_bytes(filename: &str, data: &[u8]) -> Result<ProbeReport> {
    let mut report = ProbeReport {
        filename: filename.to_string(),
        file_size: data.len(),
        image: None,
        chunks: Vec::new(),
        hdr: HdrInfo::default(),
    };

    for chunk in chunks(data)? {
        let chunk = chunk?;
        if !chunk.crc_ok() {
            log::warn!("块 {} (偏移 {}) CRC 校验失败", chunk.tag_name(), chunk.offset);
        }
        if chunk.chunk_tag() == Some(ChunkTag::IHDR) {
            report.image = ihdr_summary(chunk.payload);
        }
        collect_hdr(&chunk, &mut report.hdr);
        report.chunks.push(ChunkInfo {
            tag: chunk.tag_name(),
            offset: chunk.offset,
            length: chunk.payload.len(),
            crc_ok: chunk.crc_ok(),
        });
    }
    Ok(report)
}

/// 文本输出
pub fn print_text(report: &ProbeReport) {
    println!("[FILE]");
    println!("  文件名       : {}", report.filename);
    println!("  文件大小     : {} 字节", report.file_size);
    if let Some(image) = &report.image {
        println!("  分辨率       : {}x{}", image.width, image.height);
        println!("  位深         : {}", image.bit_depth);
        println!("  颜色类型     : {}", image.color_type);
    }
    println!("[/FILE]");
    println!();

    println!("[CHUNKS]");
    for chunk in &report.chunks {
        println!(
            "  {:<4}  偏移 {:>10}  长度 {:>8}  CRC {}",
            chunk.tag,
            chunk.offset,
            chunk.length,
            if chunk.crc_ok { "正确" } else { "错误" },
        );
    }
    println!("[/CHUNKS]");
    println!();

    let hdr = &report.hdr;
    println!("[HDR]");
    println!("  HDR10        : {}", if hdr.is_hdr10() { "是" } else { "否" });
    if let Some(cicp) = hdr.cicp {
        println!("  cICP         : {:?}", cicp);
    }
    if let Some(names) = &hdr.cicp_names {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "未知".to_string());
        println!("  原色         : {}", show(&names.color_primaries));
        println!(
            "  传递特性     : {}{}",
            show(&names.transfer),
            if names.hdr_transfer { " (HDR)" } else { "" },
        );
        println!("  矩阵系数     : {}", show(&names.matrix));
        println!("  色彩范围     : {}", show(&names.range));
    }
    if let (Some(cll), Some(fall)) = (hdr.max_cll_nits, hdr.max_fall_nits) {
        println!("  MaxCLL       : {cll:.4} cd/m²");
        println!("  MaxFALL      : {fall:.4} cd/m²");
    }
    if let Some(bits) = hdr.significant_bits {
        println!("  有效位数     : {:?}", bits);
    }
    if let Some(chrm) = hdr.chromaticities {
        println!("  色度 (×1e5)  : {:?}", chrm);
    }
    if let Some([min, max]) = hdr.mastering_luminance_nits {
        println!("  母版亮度     : {min:.4} - {max:.4} cd/m²");
    }
    if let Some(name) = &hdr.icc_profile {
        match hdr.icc_profile_size {
            Some(size) => println!("  ICC 配置文件 : {name} ({size} 字节)"),
            None => println!("  ICC 配置文件 : {name} (无法解压)"),
        }
    }
    if hdr.has_srgb || hdr.has_gama {
        println!("  SDR 提示块   : sRGB={} gAMA={}", hdr.has_srgb, hdr.has_gama);
    }
    println!("[/HDR]");
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdrpng_codec::{PngWriter, Rgb48Image};
    use hdrpng_format::inject_hdr_chunks;

    #[test]
    fn test_探测_hdr_文件() {
        let samples = [0u16; 12];
        let image = Rgb48Image::new(2, 2, &samples).unwrap();
        let mut png = PngWriter::new().encode_to_vec(&image).unwrap();
        inject_hdr_chunks(&mut png, 2, 2, &[1.0; 4], 10, None).unwrap();

        let report = probe_bytes("test.png", &png).unwrap();
        let image = report.image.as_ref().unwrap();
        assert_eq!((image.width, image.height, image.bit_depth), (2, 2, 16));
        assert!(report.hdr.is_hdr10());
        assert_eq!(report.hdr.significant_bits, Some([10, 10, 10]));
        assert_eq!(report.hdr.icc_profile.as_deref(), Some("RGB_D65_202_Rel_PeQ"));
        assert_eq!(report.hdr.icc_profile_size, Some(4344));
        assert!((report.hdr.max_cll_nits.unwrap() - 80.0).abs() < 1e-6);
        assert!(report.chunks.iter().all(|c| c.crc_ok));

        let names = report.hdr.cicp_names.as_ref().unwrap();
        assert_eq!(names.color_primaries.as_deref(), Some("Bt2020"));
        assert_eq!(names.transfer.as_deref(), Some("SmpteSt2084"));
        assert_eq!(names.matrix.as_deref(), Some("Rgb"));
        assert_eq!(names.range.as_deref(), Some("Full"));
        assert!(names.hdr_transfer);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"cicp\":[9,16,0,1]"));
        assert!(!json.contains("mastering_luminance_nits"));
    }

    #[test]
    fn test_cicp_名称_未知码点() {
        let names = CicpNames::decode([1, 13, 0, 7]);
        assert_eq!(names.color_primaries.as_deref(), Some("Bt709"));
        assert_eq!(names.transfer.as_deref(), Some("Srgb"));
        assert!(!names.hdr_transfer);
        assert!(names.range.is_none());

        let names = CicpNames::decode([200, 18, 10, 0]);
        assert!(names.color_primaries.is_none());
        assert_eq!(names.matrix.as_deref(), Some("Bt2020Cl"));
        assert_eq!(names.range.as_deref(), Some("Limited"));
        assert!(names.hdr_transfer);
    }

    #[test]
    fn test_探测_非_png() {
        assert!(probe_bytes("x", b"GIF89a").is_err());
    }
}
