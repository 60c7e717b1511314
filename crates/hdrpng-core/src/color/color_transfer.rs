//! 色彩传递特性 (Transfer Characteristics / EOTF).
//!
//! 码点取自 ITU-T H.273 `TransferCharacteristics`.

/// 色彩传递特性 (伽马/EOTF)
///
/// 定义了线性光和编码值之间的映射关系 (即"伽马曲线").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ColorTransfer {
    /// 未指定
    #[default]
    Unspecified,
    /// ITU-R BT.709 (高清标准伽马)
    Bt709,
    /// 线性传递 (无伽马)
    Linear,
    /// IEC 61966-2-1 (sRGB)
    Srgb,
    /// SMPTE ST 2084 (PQ / HDR10)
    SmpteSt2084,
    /// ARIB STD-B67 (HLG / 混合对数伽马)
    AribStdB67,
}

impl ColorTransfer {
    /// H.273 码点 (cICP 第 2 字节)
    pub const fn cicp_code(&self) -> u8 {
        match self {
            Self::Unspecified => 2,
            Self::Bt709 => 1,
            Self::Linear => 8,
            Self::Srgb => 13,
            Self::SmpteSt2084 => 16,
            Self::AribStdB67 => 18,
        }
    }

    /// 由 H.273 码点解析, 不支持的码点返回 `None`
    pub const fn from_cicp_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Bt709),
            2 => Some(Self::Unspecified),
            8 => Some(Self::Linear),
            13 => Some(Self::Srgb),
            16 => Some(Self::SmpteSt2084),
            18 => Some(Self::AribStdB67),
            _ => None,
        }
    }

    /// 是否为 HDR 传递特性
    pub const fn is_hdr(&self) -> bool {
        matches!(self, Self::SmpteSt2084 | Self::AribStdB67)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pq_code_point() {
        assert_eq!(ColorTransfer::SmpteSt2084.cicp_code(), 16);
        assert!(ColorTransfer::SmpteSt2084.is_hdr());
        assert!(!ColorTransfer::Srgb.is_hdr());
    }

    #[test]
    fn test_码点解析() {
        for t in [
            ColorTransfer::Unspecified,
            ColorTransfer::Bt709,
            ColorTransfer::Linear,
            ColorTransfer::Srgb,
            ColorTransfer::SmpteSt2084,
            ColorTransfer::AribStdB67,
        ] {
            assert_eq!(ColorTransfer::from_cicp_code(t.cicp_code()), Some(t));
        }
        assert!(ColorTransfer::from_cicp_code(18).unwrap().is_hdr());
        assert_eq!(ColorTransfer::from_cicp_code(99), None);
    }
}
