//! CRC32 校验和计算.
//!
//! PNG 块尾部使用 CRC-32/ISO-HDLC (反射多项式 0xEDB88320),
//! 覆盖范围为块类型标签 + 数据, 不包含长度字段.

/// CRC-32 查找表 (反射多项式 0xEDB88320), 编译期生成
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

/// 计算 CRC-32
///
/// `seed` 为上一段数据的 CRC 结果 (首段传 0), 因此可以分段计算:
/// `crc32(b, crc32(a, 0)) == crc32(a ‖ b, 0)`.
pub fn crc32(data: &[u8], seed: u32) -> u32 {
    let mut crc = seed ^ 0xFFFF_FFFF;
    for &byte in data {
        crc = CRC32_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc ^ 0xFFFF_FFFF
}

/// 对 `data[offset..offset + len]` 计算 CRC-32
///
/// # 返回
/// - `Some(crc)`: 区间合法
/// - `None`: 区间越界
pub fn crc32_range(data: &[u8], offset: usize, len: usize, seed: u32) -> Option<u32> {
    let end = offset.checked_add(len)?;
    data.get(offset..end).map(|slice| crc32(slice, seed))
}
