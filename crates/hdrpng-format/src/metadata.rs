//! HDR 元数据块的数据序列化.
//!
//! 所有多字节整数均为大端, 统一经 [`byteorder::BigEndian`] 写入.
//!
//! | 块   | 数据                                      |
//! |------|-------------------------------------------|
//! | cICP | 原色, 传递特性, 矩阵系数, 全范围标志 (各 1 字节) |
//! | cLLi | MaxCLL, MaxFALL (u32, 0.0001 cd/m²)        |
//! | sBIT | R/G/B 有效位数 (各 1 字节)                  |
//! | cHRM | 白点 + RGB 三原色 xy (u32, ×100000)        |
//! | mDCv | RGB 三原色 + 白点 xy (u16, ×50000), 最大/最小亮度 (u32) |

use byteorder::{BigEndian, ByteOrder};
use hdrpng_codec::ContentLightInfo;
use hdrpng_core::color::{Chromaticities, ColorPrimaries, ColorRange, ColorSpace, ColorTransfer};
use hdrpng_core::{HdrPngError, HdrResult};

use crate::chunk::{Chunk, ChunkTag};

/// 可序列化为 PNG 块数据的元数据
pub trait ChunkPayload: Sized {
    /// 块类型标签
    const TAG: ChunkTag;

    /// 序列化为块数据
    fn to_payload(&self) -> Vec<u8>;

    /// 从块数据解析
    fn from_payload(data: &[u8]) -> HdrResult<Self>;

    /// 构造完整的块
    fn to_chunk(&self) -> Chunk {
        Chunk::new(Self::TAG, self.to_payload())
    }
}

fn check_len(tag: ChunkTag, data: &[u8], expected: usize) -> HdrResult<()> {
    if data.len() != expected {
        return Err(HdrPngError::InvalidData(format!(
            "{} 块数据长度应为 {}, 实际为 {}",
            tag,
            expected,
            data.len(),
        )));
    }
    Ok(())
}

// ============================================================
// cICP
// ============================================================

/// cICP: 与编码无关的码点 (ITU-T H.273)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingIndependentCodePoints {
    pub color_primaries: u8,
    pub transfer_function: u8,
    pub matrix_coefficients: u8,
    pub video_full_range: u8,
}

impl CodingIndependentCodePoints {
    pub fn new(primaries: ColorPrimaries, transfer: ColorTransfer, space: ColorSpace, range: ColorRange) -> Self {
        Self {
            color_primaries: primaries.cicp_code(),
            transfer_function: transfer.cicp_code(),
            matrix_coefficients: space.cicp_code(),
            video_full_range: range.cicp_full_range_flag(),
        }
    }

    /// HDR10: BT.2020 原色, PQ 传递特性, RGB, 全范围 → [9, 16, 0, 1]
    pub fn hdr10() -> Self {
        Self::new(
            ColorPrimaries::Bt2020,
            ColorTransfer::SmpteSt2084,
            ColorSpace::Rgb,
            ColorRange::Full,
        )
    }
}

impl ChunkPayload for CodingIndependentCodePoints {
    const TAG: ChunkTag = ChunkTag::CICP;

    fn to_payload(&self) -> Vec<u8> {
        vec![
            self.color_primaries,
            self.transfer_function,
            self.matrix_coefficients,
            self.video_full_range,
        ]
    }

    fn from_payload(data: &[u8]) -> HdrResult<Self> {
        check_len(Self::TAG, data, 4)?;
        Ok(Self {
            color_primaries: data[0],
            transfer_function: data[1],
            matrix_coefficients: data[2],
            video_full_range: data[3],
        })
    }
}

// ============================================================
// cLLi
// ============================================================

impl ChunkPayload for ContentLightInfo {
    const TAG: ChunkTag = ChunkTag::CLLI;

    fn to_payload(&self) -> Vec<u8> {
        let mut buf = vec![0u8; 8];
        BigEndian::write_u32(&mut buf[0..4], self.max_cll);
        BigEndian::write_u32(&mut buf[4..8], self.max_fall);
        buf
    }

    fn from_payload(data: &[u8]) -> HdrResult<Self> {
        check_len(Self::TAG, data, 8)?;
        Ok(Self {
            max_cll: BigEndian::read_u32(&data[0..4]),
            max_fall: BigEndian::read_u32(&data[4..8]),
        })
    }
}

// ============================================================
// sBIT
// ============================================================

/// sBIT: 每个通道的有效位数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignificantBits {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl SignificantBits {
    /// 三个通道使用相同位数
    pub fn uniform(bits: u8) -> Self {
        Self {
            red: bits,
            green: bits,
            blue: bits,
        }
    }
}

impl ChunkPayload for SignificantBits {
    const TAG: ChunkTag = ChunkTag::SBIT;

    fn to_payload(&self) -> Vec<u8> {
        vec![self.red, self.green, self.blue]
    }

    fn from_payload(data: &[u8]) -> HdrResult<Self> {
        check_len(Self::TAG, data, 3)?;
        Ok(Self {
            red: data[0],
            green: data[1],
            blue: data[2],
        })
    }
}

// ============================================================
// cHRM
// ============================================================

/// cHRM 坐标的缩放系数
const CHRM_SCALE: f64 = 100_000.0;

/// cHRM: 白点与三原色色度, 单位 1/100000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromaticityPayload {
    pub white: (u32, u32),
    pub red: (u32, u32),
    pub green: (u32, u32),
    pub blue: (u32, u32),
}

impl ChromaticityPayload {
    pub fn from_chromaticities(c: &Chromaticities) -> Self {
        let scale = |(x, y): (f64, f64)| ((x * CHRM_SCALE).round() as u32, (y * CHRM_SCALE).round() as u32);
        Self {
            white: scale(c.white),
            red: scale(c.red),
            green: scale(c.green),
            blue: scale(c.blue),
        }
    }

    /// 由标准原色构造, 未指定原色时返回 `None`
    pub fn from_primaries(primaries: ColorPrimaries) -> Option<Self> {
        primaries.chromaticities().map(|c| Self::from_chromaticities(&c))
    }
}

impl ChunkPayload for ChromaticityPayload {
    const TAG: ChunkTag = ChunkTag::CHRM;

    fn to_payload(&self) -> Vec<u8> {
        let values = [
            self.white.0,
            self.white.1,
            self.red.0,
            self.red.1,
            self.green.0,
            self.green.1,
            self.blue.0,
            self.blue.1,
        ];
        let mut buf = vec![0u8; 32];
        BigEndian::write_u32_into(&values, &mut buf);
        buf
    }

    fn from_payload(data: &[u8]) -> HdrResult<Self> {
        check_len(Self::TAG, data, 32)?;
        let mut v = [0u32; 8];
        BigEndian::read_u32_into(data, &mut v);
        Ok(Self {
            white: (v[0], v[1]),
            red: (v[2], v[3]),
            green: (v[4], v[5]),
            blue: (v[6], v[7]),
        })
    }
}

// ============================================================
// mDCv
// ============================================================

/// mDCv 色度单位
const MDCV_CHROMA_UNIT: f64 = 0.00002;

/// mDCv 亮度单位 (cd/m²)
const MDCV_LUMINANCE_UNIT: f64 = 0.0001;

/// 母版显示器的色域与亮度范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteringDisplay {
    /// 三原色与白点 (CIE 1931 xy)
    pub chromaticities: Chromaticities,
    /// 最小亮度 (cd/m²)
    pub min_luminance: f64,
    /// 最大亮度 (cd/m²)
    pub max_luminance: f64,
}

/// mDCv: 母版显示器色彩容量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteringDisplayPayload {
    pub red: (u16, u16),
    pub green: (u16, u16),
    pub blue: (u16, u16),
    pub white: (u16, u16),
    /// 最大亮度, 单位 0.0001 cd/m²
    pub max_luminance: u32,
    /// 最小亮度, 单位 0.0001 cd/m²
    pub min_luminance: u32,
}

impl MasteringDisplayPayload {
    pub fn from_display(display: &MasteringDisplay) -> Self {
        let xy = |(x, y): (f64, f64)| {
            let unit = |v: f64| (v / MDCV_CHROMA_UNIT).round().clamp(0.0, f64::from(u16::MAX)) as u16;
            (unit(x), unit(y))
        };
        let nits = |v: f64| (v / MDCV_LUMINANCE_UNIT).round().clamp(0.0, f64::from(u32::MAX)) as u32;
        let c = &display.chromaticities;
        Self {
            red: xy(c.red),
            green: xy(c.green),
            blue: xy(c.blue),
            white: xy(c.white),
            max_luminance: nits(display.max_luminance),
            min_luminance: nits(display.min_luminance),
        }
    }
}

impl ChunkPayload for MasteringDisplayPayload {
    const TAG: ChunkTag = ChunkTag::MDCV;

    fn to_payload(&self) -> Vec<u8> {
        let xy = [
            self.red.0,
            self.red.1,
            self.green.0,
            self.green.1,
            self.blue.0,
            self.blue.1,
            self.white.0,
            self.white.1,
        ];
        let mut buf = vec![0u8; 24];
        BigEndian::write_u16_into(&xy, &mut buf[0..16]);
        BigEndian::write_u32(&mut buf[16..20], self.max_luminance);
        BigEndian::write_u32(&mut buf[20..24], self.min_luminance);
        buf
    }

    fn from_payload(data: &[u8]) -> HdrResult<Self> {
        check_len(Self::TAG, data, 24)?;
        let mut v = [0u16; 8];
        BigEndian::read_u16_into(&data[0..16], &mut v);
        Ok(Self {
            red: (v[0], v[1]),
            green: (v[2], v[3]),
            blue: (v[4], v[5]),
            white: (v[6], v[7]),
            max_luminance: BigEndian::read_u32(&data[16..20]),
            min_luminance: BigEndian::read_u32(&data[20..24]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cicp_hdr10() {
        let cicp = CodingIndependentCodePoints::hdr10();
        assert_eq!(cicp.to_payload(), vec![9, 16, 0, 1]);
        assert_eq!(cicp.to_chunk().tag, ChunkTag::CICP);
    }

    #[test]
    fn test_clli_大端() {
        let info = ContentLightInfo {
            max_cll: 0x0102_0304,
            max_fall: 8_000_000,
        };
        let payload = info.to_payload();
        assert_eq!(&payload[0..4], &[1, 2, 3, 4]);
        assert_eq!(&payload[4..8], &8_000_000u32.to_be_bytes());
        assert_eq!(ContentLightInfo::from_payload(&payload).unwrap(), info);
    }

    #[test]
    fn test_sbit() {
        assert_eq!(SignificantBits::uniform(10).to_payload(), vec![10, 10, 10]);
        assert!(SignificantBits::from_payload(&[1, 2]).is_err());
    }

    #[test]
    fn test_chrm_bt2020() {
        let from_enum = ChromaticityPayload::from_primaries(ColorPrimaries::Bt2020).unwrap();
        assert_eq!(from_enum.white, (31270, 32900));
        assert_eq!(from_enum.red, (70800, 29200));
        assert_eq!(from_enum.green, (17000, 79700));
        assert_eq!(from_enum.blue, (13100, 4600));
        assert!(ChromaticityPayload::from_primaries(ColorPrimaries::Unspecified).is_none());

        let payload = from_enum.to_payload();
        assert_eq!(payload.len(), 32);
        assert_eq!(&payload[0..4], &31270u32.to_be_bytes());
        assert_eq!(&payload[4..8], &32900u32.to_be_bytes());
        assert_eq!(&payload[28..32], &4600u32.to_be_bytes());
    }

    #[test]
    fn test_mdcv_换算() {
        let display = MasteringDisplay {
            chromaticities: ColorPrimaries::Bt2020.chromaticities().unwrap(),
            min_luminance: 0.0001,
            max_luminance: 1000.0,
        };
        let mdcv = MasteringDisplayPayload::from_display(&display);
        assert_eq!(mdcv.red, (35400, 14600));
        assert_eq!(mdcv.green, (8500, 39850));
        assert_eq!(mdcv.blue, (6550, 2300));
        assert_eq!(mdcv.white, (15635, 16450));
        assert_eq!(mdcv.max_luminance, 10_000_000);
        assert_eq!(mdcv.min_luminance, 1);

        let payload = mdcv.to_payload();
        assert_eq!(payload.len(), 24);
        assert_eq!(&payload[0..2], &35400u16.to_be_bytes());
        assert_eq!(MasteringDisplayPayload::from_payload(&payload).unwrap(), mdcv);
    }
}
