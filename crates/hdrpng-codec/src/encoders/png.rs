//! 基础 PNG 编码器.
//!
//! 输出 16 位 RGB (颜色类型 2) 非隔行 PNG:
//! 签名 → IHDR → [sRGB, gAMA] → IDAT... → IEND.
//!
//! 每行使用过滤类型 0 (None), 数据经 zlib 压缩后按 64 KiB 切分为多个 IDAT.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use hdrpng_core::crc::crc32;
use hdrpng_core::{HdrPngError, HdrResult};
use log::debug;

use crate::encoder::{BaselineEncoder, Rgb48Image};

/// PNG 文件签名
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// 单个 IDAT 块的最大数据长度
const MAX_IDAT_LEN: usize = 64 * 1024;

/// 块数据长度上限 (2^31 - 1)
pub const MAX_CHUNK_LEN: usize = i32::MAX as usize;

/// gAMA 块中的 sRGB 伽马值 (1/2.2 * 100000)
const SRGB_GAMMA: u32 = 45455;

/// 基础 PNG 编码器
#[derive(Debug, Clone)]
pub struct PngWriter {
    /// zlib 压缩级别 (0-9)
    compression_level: u32,
    /// 是否写入 sRGB / gAMA 块 (与常见 SDR 编码器行为一致)
    srgb_hints: bool,
}

impl Default for PngWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PngWriter {
    /// 创建默认配置的编码器 (压缩级别 6, 不写 sRGB/gAMA)
    pub fn new() -> Self {
        Self {
            compression_level: 6,
            srgb_hints: false,
        }
    }

    /// 设置 zlib 压缩级别, 超过 9 时取 9
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    /// 是否写入 sRGB / gAMA 块
    pub fn with_srgb_hints(mut self, enabled: bool) -> Self {
        self.srgb_hints = enabled;
        self
    }

    /// 将图像编码为内存中的 PNG 字节流
    pub fn encode_to_vec(&self, image: &Rgb48Image<'_>) -> HdrResult<Vec<u8>> {
        image.validate()?;

        let mut out = Vec::new();
        out.extend_from_slice(&PNG_SIGNATURE);
        write_chunk(&mut out, b"IHDR", &ihdr_payload(image.width, image.height))?;

        if self.srgb_hints {
            // 渲染意图 0: 感知
            write_chunk(&mut out, b"sRGB", &[0])?;
            write_chunk(&mut out, b"gAMA", &SRGB_GAMMA.to_be_bytes())?;
        }

        let compressed = self.compress_rows(image)?;
        for part in compressed.chunks(MAX_IDAT_LEN) {
            write_chunk(&mut out, b"IDAT", part)?;
        }
        write_chunk(&mut out, b"IEND", &[])?;

        debug!(
            "PNG 编码: {}x{}, 压缩级别 {}, 压缩数据 {} 字节, 文件 {} 字节",
            image.width,
            image.height,
            self.compression_level,
            compressed.len(),
            out.len(),
        );
        Ok(out)
    }

    /// 逐行写入过滤字节和大端样本, 返回 zlib 数据流
    fn compress_rows(&self, image: &Rgb48Image<'_>) -> HdrResult<Vec<u8>> {
        let row_bytes = image.width as usize * 6;
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity((row_bytes + 1) * image.height as usize / 2),
            Compression::new(self.compression_level),
        );
        let mut line = Vec::with_capacity(row_bytes + 1);
        for y in 0..image.height {
            line.clear();
            line.push(0); // 过滤类型 None
            for &sample in image.row(y) {
                line.extend_from_slice(&sample.to_be_bytes());
            }
            encoder
                .write_all(&line)
                .map_err(|e| HdrPngError::Codec(format!("zlib 压缩失败: {e}")))?;
        }
        encoder
            .finish()
            .map_err(|e| HdrPngError::Codec(format!("zlib 压缩失败: {e}")))
    }
}

impl BaselineEncoder for PngWriter {
    fn name(&self) -> &str {
        "png"
    }

    fn encode_rgb48(&self, path: &Path, image: &Rgb48Image<'_>) -> HdrResult<()> {
        let data = self.encode_to_vec(image)?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&data)?;
        writer.flush()?;
        Ok(())
    }
}

/// IHDR 数据: 宽、高、位深 16、颜色类型 2 (RGB)、压缩 0、过滤 0、非隔行
fn ihdr_payload(width: u32, height: u32) -> [u8; 13] {
    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    ihdr[8] = 16;
    ihdr[9] = 2;
    ihdr
}

/// 写入一个 PNG 块 (长度, 类型, 数据, CRC32)
fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) -> HdrResult<()> {
    if data.len() > MAX_CHUNK_LEN {
        return Err(HdrPngError::Codec(format!(
            "块数据长度 {} 超过上限 {}",
            data.len(),
            MAX_CHUNK_LEN,
        )));
    }
    out.reserve(12 + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32(data, crc32(tag, 0)).to_be_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    /// 按块结构遍历, 返回 (类型, 数据)
    fn split_chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
        let mut pos = 8;
        let mut chunks = Vec::new();
        while pos < png.len() {
            let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
            let tag: [u8; 4] = png[pos + 4..pos + 8].try_into().unwrap();
            let data = png[pos + 8..pos + 8 + len].to_vec();
            let crc = u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());
            assert_eq!(crc, crc32(&data, crc32(&tag, 0)));
            chunks.push((tag, data));
            pos += 12 + len;
        }
        chunks
    }

    #[test]
    fn test_编码_2x1() {
        let samples = [0xFFFFu16, 0, 0x1234, 1, 2, 3];
        let image = Rgb48Image::new(2, 1, &samples).unwrap();
        let png = PngWriter::new().encode_to_vec(&image).unwrap();

        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        let chunks = split_chunks(&png);
        let tags: Vec<&[u8; 4]> = chunks.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![b"IHDR", b"IDAT", b"IEND"]);

        let ihdr = &chunks[0].1;
        assert_eq!(&ihdr[0..4], &2u32.to_be_bytes());
        assert_eq!(&ihdr[4..8], &1u32.to_be_bytes());
        assert_eq!(ihdr[8], 16);
        assert_eq!(ihdr[9], 2);

        let mut raw = Vec::new();
        ZlibDecoder::new(&chunks[1].1[..]).read_to_end(&mut raw).unwrap();
        assert_eq!(
            raw,
            vec![0, 0xFF, 0xFF, 0, 0, 0x12, 0x34, 0, 1, 0, 2, 0, 3]
        );
    }

    #[test]
    fn test_srgb_hints() {
        let samples = [0u16; 3];
        let image = Rgb48Image::new(1, 1, &samples).unwrap();
        let png = PngWriter::new()
            .with_srgb_hints(true)
            .encode_to_vec(&image)
            .unwrap();
        let tags: Vec<[u8; 4]> = split_chunks(&png).into_iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![*b"IHDR", *b"sRGB", *b"gAMA", *b"IDAT", *b"IEND"]);
    }

    #[test]
    fn test_大图切分多个_idat() {
        // 不可压缩的伪随机数据, 保证压缩后超过 64 KiB
        let mut state = 0x1234_5678u32;
        let samples: Vec<u16> = (0..128 * 128 * 3)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u16
            })
            .collect();
        let image = Rgb48Image::new(128, 128, &samples).unwrap();
        let png = PngWriter::new()
            .with_compression_level(0)
            .encode_to_vec(&image)
            .unwrap();
        let idat_count = split_chunks(&png)
            .iter()
            .filter(|(t, _)| t == b"IDAT")
            .count();
        assert!(idat_count > 1);
    }

    #[test]
    fn test_写入文件() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.png");
        let samples = [0u16; 12];
        let image = Rgb48Image::new(2, 2, &samples).unwrap();
        PngWriter::new().encode_rgb48(&path, &image).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[0..8], &PNG_SIGNATURE);
    }
}
