//! PNG 块编辑.
//!
//! 在内存中的 PNG 字节流上按标签查找、删除、插入块.
//! 查找按字节匹配标签, 不依赖文件中是否存在 NUL 字节.

use byteorder::{BigEndian, ByteOrder};
use hdrpng_core::{HdrPngError, HdrResult};
use log::debug;

use crate::chunk::{CHUNK_OVERHEAD, Chunk, ChunkTag};

/// 标签前的长度字段字节数
const LENGTH_FIELD: usize = 4;

/// 查找标签第一次出现的位置, 返回其长度字段的偏移
///
/// 标签必须位于偏移 4 之后, 否则没有空间容纳长度字段.
pub fn find_chunk(tag: ChunkTag, data: &[u8]) -> Option<usize> {
    let needle = tag.as_bytes();
    data.get(LENGTH_FIELD..)?
        .windows(needle.len())
        .position(|w| w == needle)
}

/// 删除第一个匹配标签的块
///
/// 以下情况返回 `false` 且不修改数据:
/// - 标签不是 4 个 ASCII 字母
/// - 数据不足一个块 (12 字节)
/// - 未找到标签
/// - 块声明的长度超出数据末尾
pub fn remove_chunk(tag: &str, data: &mut Vec<u8>) -> bool {
    let Some(tag) = ChunkTag::parse(tag) else {
        return false;
    };
    if data.len() < CHUNK_OVERHEAD {
        return false;
    }
    let Some(offset) = find_chunk(tag, data) else {
        return false;
    };

    let len = BigEndian::read_u32(&data[offset..offset + LENGTH_FIELD]) as usize;
    let Some(end) = len
        .checked_add(CHUNK_OVERHEAD)
        .and_then(|n| n.checked_add(offset))
        .filter(|&end| end <= data.len())
    else {
        debug!("块 {} 声明长度 {} 超出数据末尾, 不删除", tag, len);
        return false;
    };

    data.drain(offset..end);
    debug!("删除块 {}: 偏移 {}, {} 字节", tag, offset, end - offset);
    true
}

/// 把一组块依次序列化为连续字节
pub fn encode_chunks(chunks: &[Chunk]) -> HdrResult<Vec<u8>> {
    let mut encoded = Vec::with_capacity(chunks.iter().map(Chunk::encoded_len).sum());
    for chunk in chunks {
        chunk.write_to(&mut encoded)?;
    }
    Ok(encoded)
}

/// 在第一个匹配标签的块之前插入一组块
///
/// 返回插入的总字节数. 标签之后的数据保持原样.
pub fn insert_chunks_before(tag: ChunkTag, data: &mut Vec<u8>, chunks: &[Chunk]) -> HdrResult<usize> {
    let offset = find_chunk(tag, data)
        .ok_or_else(|| HdrPngError::ChunkNotFound(format!("未找到 {} 块", tag)))?;

    let encoded = encode_chunks(chunks)?;
    let inserted = encoded.len();
    data.splice(offset..offset, encoded);

    debug!("在 {} 前插入 {} 个块, 共 {} 字节", tag, chunks.len(), inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{PNG_SIGNATURE, chunks};

    fn test_chunk() -> Vec<u8> {
        Chunk::new(ChunkTag::parse("tEST").unwrap(), b"hello".to_vec()).to_bytes().unwrap()
    }

    #[test]
    fn test_删除_单个块() {
        let mut data = b"HEAD".to_vec();
        data.extend(test_chunk());
        data.extend_from_slice(b"TAIL");
        let before = data.len();

        assert!(remove_chunk("tEST", &mut data));
        assert_eq!(data.len(), before - (12 + 5));
        assert_eq!(data, b"HEADTAIL");
    }

    #[test]
    fn test_删除_只删第一个() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(test_chunk());
        data.extend(test_chunk());
        assert!(remove_chunk("tEST", &mut data));
        assert_eq!(data.len(), 8 + 17);
        assert!(remove_chunk("tEST", &mut data));
        assert!(!remove_chunk("tEST", &mut data));
        assert_eq!(data, PNG_SIGNATURE);
    }

    #[test]
    fn test_删除_非法输入() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(test_chunk());
        let original = data.clone();

        assert!(!remove_chunk("tES", &mut data));
        assert!(!remove_chunk("t3ST", &mut data));
        assert!(!remove_chunk("sRGB", &mut data));
        assert_eq!(data, original);

        let mut short = b"tEST".to_vec();
        assert!(!remove_chunk("tEST", &mut short));
    }

    #[test]
    fn test_删除_标签位于开头() {
        // 标签前没有长度字段
        let mut data = b"tEST0000000000000000".to_vec();
        assert!(!remove_chunk("tEST", &mut data));
    }

    #[test]
    fn test_删除_长度越界() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend(test_chunk());
        // 把长度改为 1000
        data[8..12].copy_from_slice(&1000u32.to_be_bytes());
        let original = data.clone();
        assert!(!remove_chunk("tEST", &mut data));
        assert_eq!(data, original);
    }

    #[test]
    fn test_插入() {
        let mut data = PNG_SIGNATURE.to_vec();
        Chunk::new(ChunkTag::IHDR, vec![0u8; 13]).write_to(&mut data).unwrap();
        Chunk::new(ChunkTag::IDAT, vec![7, 7]).write_to(&mut data).unwrap();
        Chunk::new(ChunkTag::IEND, Vec::new()).write_to(&mut data).unwrap();
        let idat_offset = find_chunk(ChunkTag::IDAT, &data).unwrap();
        let tail = data[idat_offset..].to_vec();

        let new_chunks = [
            Chunk::new(ChunkTag::CICP, vec![9, 16, 0, 1]),
            Chunk::new(ChunkTag::SBIT, vec![10, 10, 10]),
        ];
        let inserted = insert_chunks_before(ChunkTag::IDAT, &mut data, &new_chunks).unwrap();
        assert_eq!(inserted, 16 + 15);
        assert_eq!(&data[idat_offset + inserted..], &tail[..]);

        let names: Vec<String> = chunks(&data).unwrap().map(|c| c.unwrap().tag_name()).collect();
        assert_eq!(names, ["IHDR", "cICP", "sBIT", "IDAT", "IEND"]);
    }

    #[test]
    fn test_插入_缺少目标块() {
        let mut data = PNG_SIGNATURE.to_vec();
        Chunk::new(ChunkTag::IEND, Vec::new()).write_to(&mut data).unwrap();
        let original = data.clone();
        let err = insert_chunks_before(ChunkTag::IDAT, &mut data, &[]).unwrap_err();
        assert!(matches!(err, HdrPngError::ChunkNotFound(_)));
        assert_eq!(data, original);
    }
}
