//! 色彩空间 (矩阵系数).
//!
//! 码点取自 ITU-T H.273 `MatrixCoefficients`. PNG 只存储 RGB,
//! 因此 cICP 中始终写入 `Rgb` (恒等矩阵, 码点 0).

/// 矩阵系数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ColorSpace {
    /// RGB / 恒等矩阵
    #[default]
    Rgb,
    /// ITU-R BT.709 (高清)
    Bt709,
    /// ITU-R BT.2020 非恒定亮度
    Bt2020Ncl,
    /// ITU-R BT.2020 恒定亮度
    Bt2020Cl,
}

impl ColorSpace {
    /// H.273 码点 (cICP 第 3 字节)
    pub const fn cicp_code(&self) -> u8 {
        match self {
            Self::Rgb => 0,
            Self::Bt709 => 1,
            Self::Bt2020Ncl => 9,
            Self::Bt2020Cl => 10,
        }
    }

    /// 由 H.273 码点解析
    pub const fn from_cicp_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Rgb),
            1 => Some(Self::Bt709),
            9 => Some(Self::Bt2020Ncl),
            10 => Some(Self::Bt2020Cl),
            _ => None,
        }
    }
}
