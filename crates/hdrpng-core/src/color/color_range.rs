//! 色彩范围定义.

/// 色彩范围
///
/// 决定像素值的有效范围:
/// - Limited: 10 位 64-940 - 广播标准
/// - Full: 0-1023 (10 位) / 0-65535 (16 位) - PC/图像标准
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorRange {
    /// 有限范围 (广播/TV)
    Limited,
    /// 完整范围 (PC/图像)
    #[default]
    Full,
}

impl ColorRange {
    /// cICP 第 4 字节 (video_full_range_flag)
    pub const fn cicp_full_range_flag(&self) -> u8 {
        match self {
            Self::Limited => 0,
            Self::Full => 1,
        }
    }

    /// 由 video_full_range_flag 解析
    pub const fn from_cicp_full_range_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(Self::Limited),
            1 => Some(Self::Full),
            _ => None,
        }
    }
}
