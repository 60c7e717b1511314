//! # hdrpng-format
//!
//! hdrpng PNG 容器层, 负责在基础编码器输出的 PNG 上做块级编辑:
//!
//! - [`chunk`]: 块模型 (标签、序列化、结构化遍历)
//! - [`editor`]: 在内存字节流中查找 / 删除 / 插入块
//! - [`metadata`]: cICP / cLLi / sBIT / cHRM / mDCv 数据的大端序列化
//! - [`icc`]: 内嵌的 PQ ICC 配置文件 (iCCP)
//! - [`hdr`]: `write_hdr_chunks`, 把 HDR 元数据写入 PNG 文件
//!
//! 不解码像素数据.

pub mod chunk;
pub mod editor;
pub mod hdr;
pub mod icc;
pub mod metadata;

// 重导出常用类型
pub use chunk::{Chunk, ChunkIter, ChunkRef, ChunkTag, chunks};
pub use editor::{encode_chunks, find_chunk, insert_chunks_before, remove_chunk};
pub use hdr::{MasteringDisplaySource, inject_hdr_chunks, write_hdr_chunks, write_hdr_chunks_with};
pub use icc::IccProfilePayload;
pub use metadata::{
    ChromaticityPayload, ChunkPayload, CodingIndependentCodePoints, MasteringDisplay,
    MasteringDisplayPayload, SignificantBits,
};
