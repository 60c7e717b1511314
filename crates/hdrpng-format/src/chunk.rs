//! PNG 块模型.
//!
//! 块布局:
//! ```text
//! +----------+----------+-----------+----------+
//! | 长度 (BE) | 类型标签  | 数据       | CRC (BE) |
//! |  4 字节   |  4 字节   | 长度 字节  |  4 字节   |
//! +----------+----------+-----------+----------+
//! ```
//! CRC32 覆盖类型标签 + 数据, 不含长度字段.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use hdrpng_core::crc::crc32;
use hdrpng_core::{HdrPngError, HdrResult};

pub use hdrpng_codec::encoders::png::{MAX_CHUNK_LEN, PNG_SIGNATURE};

/// 块头 (长度 + 类型) 与 CRC 的总开销
pub const CHUNK_OVERHEAD: usize = 12;

/// 4 字节块类型标签 (仅 ASCII 字母)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag([u8; 4]);

impl ChunkTag {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const SRGB: Self = Self(*b"sRGB");
    pub const GAMA: Self = Self(*b"gAMA");
    pub const ICCP: Self = Self(*b"iCCP");
    pub const CICP: Self = Self(*b"cICP");
    pub const CLLI: Self = Self(*b"cLLi");
    pub const SBIT: Self = Self(*b"sBIT");
    pub const CHRM: Self = Self(*b"cHRM");
    pub const MDCV: Self = Self(*b"mDCv");

    /// 从字节构造, 要求 4 个字节均为 ASCII 字母
    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        bytes
            .iter()
            .all(u8::is_ascii_alphabetic)
            .then_some(Self(bytes))
    }

    /// 从字符串解析, 要求恰好 4 个 ASCII 字母
    pub fn parse(s: &str) -> Option<Self> {
        let bytes: [u8; 4] = s.as_bytes().try_into().ok()?;
        Self::from_bytes(bytes)
    }

    /// 原始字节
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 构造时已保证为 ASCII
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({self})")
    }
}

/// 待写入的 PNG 块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 类型标签
    pub tag: ChunkTag,
    /// 数据
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(tag: ChunkTag, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            payload: payload.into(),
        }
    }

    /// CRC32 (类型标签 + 数据)
    pub fn crc(&self) -> u32 {
        crc32(&self.payload, crc32(self.tag.as_bytes(), 0))
    }

    /// 序列化后的总字节数
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.payload.len()
    }

    /// 追加序列化字节: 长度, 标签, 数据, CRC
    ///
    /// 数据超过 2^31 - 1 字节时返回错误, 不写入任何字节.
    pub fn write_to(&self, out: &mut Vec<u8>) -> HdrResult<()> {
        check_payload_len(self.tag, self.payload.len())?;
        let mut word = [0u8; 4];
        out.reserve(self.encoded_len());

        BigEndian::write_u32(&mut word, self.payload.len() as u32);
        out.extend_from_slice(&word);
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(&self.payload);
        BigEndian::write_u32(&mut word, self.crc());
        out.extend_from_slice(&word);
        Ok(())
    }

    /// 序列化为独立字节串
    pub fn to_bytes(&self) -> HdrResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// 检查块数据长度不超过 2^31 - 1
pub fn check_payload_len(tag: ChunkTag, len: usize) -> HdrResult<()> {
    if len > MAX_CHUNK_LEN {
        return Err(HdrPngError::InvalidArgument(format!(
            "{} 块数据长度 {} 超过上限 {}",
            tag, len, MAX_CHUNK_LEN,
        )));
    }
    Ok(())
}

/// PNG 字节流中的一个块 (借用视图)
#[derive(Debug, Clone, Copy)]
pub struct ChunkRef<'a> {
    /// 原始类型字节 (不保证为合法标签)
    pub tag: [u8; 4],
    /// 长度字段在字节流中的偏移
    pub offset: usize,
    /// 数据
    pub payload: &'a [u8],
    /// 文件中记录的 CRC
    pub crc: u32,
}

impl ChunkRef<'_> {
    /// 校验 CRC 是否匹配
    pub fn crc_ok(&self) -> bool {
        crc32(self.payload, crc32(&self.tag, 0)) == self.crc
    }

    /// 合法的类型标签
    pub fn chunk_tag(&self) -> Option<ChunkTag> {
        ChunkTag::from_bytes(self.tag)
    }

    /// 可读的标签名, 非法字节用 '?' 代替
    pub fn tag_name(&self) -> String {
        self.tag
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
            .collect()
    }

    /// 序列化后的总字节数
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.payload.len()
    }
}

/// 按块结构顺序遍历 PNG 字节流
///
/// 只检查帧结构, 不解码像素. 遇到截断的块时产出一次错误后结束.
pub struct ChunkIter<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    /// 创建迭代器, 要求数据以 PNG 签名开头
    pub fn new(data: &'a [u8]) -> HdrResult<Self> {
        if !data.starts_with(&PNG_SIGNATURE) {
            return Err(HdrPngError::InvalidData("缺少 PNG 文件签名".into()));
        }
        Ok(Self {
            data,
            pos: PNG_SIGNATURE.len(),
            failed: false,
        })
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = HdrResult<ChunkRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }

        let rest = &self.data[self.pos..];
        if rest.len() < CHUNK_OVERHEAD {
            self.failed = true;
            return Some(Err(HdrPngError::InvalidData(format!(
                "偏移 {} 处剩余 {} 字节, 不足一个块头",
                self.pos,
                rest.len(),
            ))));
        }

        let len = BigEndian::read_u32(&rest[0..4]) as usize;
        if rest.len() - CHUNK_OVERHEAD < len {
            self.failed = true;
            return Some(Err(HdrPngError::InvalidData(format!(
                "偏移 {} 处的块声明长度 {} 超出文件末尾",
                self.pos, len,
            ))));
        }

        let chunk = ChunkRef {
            tag: [rest[4], rest[5], rest[6], rest[7]],
            offset: self.pos,
            payload: &rest[8..8 + len],
            crc: BigEndian::read_u32(&rest[8 + len..12 + len]),
        };
        self.pos += chunk.encoded_len();
        Some(Ok(chunk))
    }
}

/// 遍历 PNG 字节流中的所有块
pub fn chunks(data: &[u8]) -> HdrResult<ChunkIter<'_>> {
    ChunkIter::new(data)
}
