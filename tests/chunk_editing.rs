//! PNG 块编辑集成测试.

use hdrpng::format::chunk::PNG_SIGNATURE;
use hdrpng::format::{Chunk, ChunkTag, chunks, find_chunk, insert_chunks_before};
use hdrpng::{crc32, crc32_range, remove_chunk};

fn test_tag() -> ChunkTag {
    ChunkTag::parse("tEST").unwrap()
}

fn sample_png() -> Vec<u8> {
    let mut png = PNG_SIGNATURE.to_vec();
    Chunk::new(ChunkTag::IHDR, vec![0u8; 13]).write_to(&mut png).unwrap();
    Chunk::new(test_tag(), b"payload\0with\0nul".to_vec()).write_to(&mut png).unwrap();
    Chunk::new(ChunkTag::IDAT, vec![0xAA; 32]).write_to(&mut png).unwrap();
    Chunk::new(ChunkTag::IEND, Vec::new()).write_to(&mut png).unwrap();
    png
}

#[test]
fn test_删除_test_块() {
    let mut png = sample_png();
    let offset = find_chunk(test_tag(), &png).unwrap();
    let before = png.clone();
    let payload_len = 16;

    assert!(remove_chunk("tEST", &mut png));
    assert_eq!(png.len(), before.len() - (12 + payload_len));
    assert_eq!(&png[..offset], &before[..offset]);
    assert_eq!(&png[offset..], &before[offset + 12 + payload_len..]);

    let names: Vec<String> = chunks(&png).unwrap().map(|c| c.unwrap().tag_name()).collect();
    assert_eq!(names, ["IHDR", "IDAT", "IEND"]);
}

#[test]
fn test_删除后再插入_恢复原样() {
    let original = sample_png();
    let mut png = original.clone();
    assert!(remove_chunk("tEST", &mut png));

    let chunk = Chunk::new(test_tag(), b"payload\0with\0nul".to_vec());
    let inserted = insert_chunks_before(ChunkTag::IDAT, &mut png, &[chunk]).unwrap();
    assert_eq!(inserted, 28);
    assert_eq!(png, original);
}

#[test]
fn test_crc_范围() {
    let png = sample_png();
    let offset = find_chunk(ChunkTag::IEND, &png).unwrap();
    // IEND: 标签 4 字节, 无数据
    let crc = crc32_range(&png, offset + 4, 4, 0).unwrap();
    assert_eq!(crc, 0xAE42_6082);
    assert_eq!(crc, crc32(b"IEND", 0));
    assert!(crc32_range(&png, png.len() - 2, 4, 0).is_none());
}
