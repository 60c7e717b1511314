//! 16 字节对齐的字节缓冲区.
//!
//! 编码入口要求像素数据 16 字节对齐 (SIMD 宽度), 普通 `Vec<u8>`
//! 不保证这一点. 调用方可用本类型承载像素数据.

/// 对齐单元, 16 字节
#[derive(Clone, Copy, Default)]
#[repr(C, align(16))]
struct Block([u8; 16]);

/// 16 字节对齐的定长字节缓冲区
#[derive(Clone, Default)]
pub struct AlignedBuffer {
    blocks: Vec<Block>,
    len: usize,
}

impl AlignedBuffer {
    /// 创建长度为 `len` 的零填充缓冲区
    pub fn zeroed(len: usize) -> Self {
        Self {
            blocks: vec![Block::default(); len.div_ceil(16)],
            len,
        }
    }

    /// 从字节切片复制构造
    pub fn from_slice(data: &[u8]) -> Self {
        let mut buf = Self::zeroed(data.len());
        buf.as_mut_slice().copy_from_slice(data);
        buf
    }

    /// 字节长度
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 只读字节视图
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: Block 为 repr(C) 的 [u8; 16], 无填充; blocks 至少包含 len 个字节.
        unsafe { std::slice::from_raw_parts(self.blocks.as_ptr().cast::<u8>(), self.len) }
    }

    /// 可写字节视图
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: 同 as_slice, 且 &mut self 保证独占访问.
        unsafe { std::slice::from_raw_parts_mut(self.blocks.as_mut_ptr().cast::<u8>(), self.len) }
    }
}

impl std::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuffer").field("len", &self.len).finish()
    }
}

/// 检查切片起始地址是否 16 字节对齐
pub fn is_aligned_16(data: &[u8]) -> bool {
    (data.as_ptr() as usize) & 0xF == 0
}
