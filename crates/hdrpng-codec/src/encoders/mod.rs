//! 基础编码器实现模块.

pub mod png;
