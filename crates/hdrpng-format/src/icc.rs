//! 内嵌的 PQ ICC 配置文件 (iCCP 块).
//!
//! 配置文件描述 BT.2020 原色, D65 白点, ST.2084 传递特性.
//! 以 zlib 压缩形式存放, 直接作为 iCCP 的压缩数据写入.

use std::io::Read;

use flate2::read::ZlibDecoder;
use hdrpng_core::{HdrPngError, HdrResult};

use crate::chunk::ChunkTag;
use crate::metadata::ChunkPayload;

/// zlib 压缩的 ICC 配置文件
const PQ_PROFILE_ZLIB: &[u8] = include_bytes!("../assets/rgb_d65_202_rel_peq.icc.zlib");

/// 配置文件名称
pub const PQ_PROFILE_NAME: &str = "RGB_D65_202_Rel_PeQ";

/// iCCP 压缩方法: 0 = deflate
const COMPRESSION_DEFLATE: u8 = 0;

/// iCCP: 名称 + NUL + 压缩方法 + 压缩后的配置文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IccProfilePayload {
    pub name: String,
    pub compressed_profile: Vec<u8>,
}

impl IccProfilePayload {
    /// 内置的 BT.2020 PQ 配置文件
    pub fn pq_bt2020() -> Self {
        Self {
            name: PQ_PROFILE_NAME.to_string(),
            compressed_profile: PQ_PROFILE_ZLIB.to_vec(),
        }
    }

    /// 解压得到原始 ICC 数据
    pub fn decompress(&self) -> HdrResult<Vec<u8>> {
        let mut profile = Vec::new();
        ZlibDecoder::new(&self.compressed_profile[..])
            .read_to_end(&mut profile)
            .map_err(|e| HdrPngError::InvalidData(format!("ICC 配置文件解压失败: {e}")))?;
        Ok(profile)
    }
}

impl ChunkPayload for IccProfilePayload {
    const TAG: ChunkTag = ChunkTag::ICCP;

    fn to_payload(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.name.len() + 2 + self.compressed_profile.len());
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        buf.push(COMPRESSION_DEFLATE);
        buf.extend_from_slice(&self.compressed_profile);
        buf
    }

    fn from_payload(data: &[u8]) -> HdrResult<Self> {
        // 名称为 1-79 字节的 Latin-1 文本
        let nul = data
            .iter()
            .take(80)
            .position(|&b| b == 0)
            .filter(|&n| n > 0)
            .ok_or_else(|| HdrPngError::InvalidData("iCCP 名称缺少结束符".into()))?;
        let method = *data
            .get(nul + 1)
            .ok_or_else(|| HdrPngError::InvalidData("iCCP 缺少压缩方法".into()))?;
        if method != COMPRESSION_DEFLATE {
            return Err(HdrPngError::InvalidData(format!("不支持的 iCCP 压缩方法: {method}")));
        }
        Ok(Self {
            name: data[..nul].iter().map(|&b| b as char).collect(),
            compressed_profile: data[nul + 2..].to_vec(),
        })
    }
}
