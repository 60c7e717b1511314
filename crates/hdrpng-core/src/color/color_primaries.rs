//! 色彩原色定义.
//!
//! 码点取自 ITU-T H.273 `ColourPrimaries`, 与 PNG cICP 块一致.

/// 色彩原色 (色域)
///
/// 定义了 RGB 三原色在 CIE 色度图中的坐标, 决定了颜色的物理范围.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ColorPrimaries {
    /// 未指定
    #[default]
    Unspecified,
    /// ITU-R BT.709 (sRGB, 高清)
    Bt709,
    /// ITU-R BT.2020 (超高清/HDR)
    Bt2020,
    /// DCI-P3 D65
    SmpteP3d65,
}

/// CIE 1931 xy 色度坐标 (白点 + 三原色)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticities {
    /// 白点 (x, y)
    pub white: (f64, f64),
    /// 红色原色 (x, y)
    pub red: (f64, f64),
    /// 绿色原色 (x, y)
    pub green: (f64, f64),
    /// 蓝色原色 (x, y)
    pub blue: (f64, f64),
}

impl ColorPrimaries {
    /// H.273 码点 (cICP 第 1 字节)
    pub const fn cicp_code(&self) -> u8 {
        match self {
            Self::Unspecified => 2,
            Self::Bt709 => 1,
            Self::Bt2020 => 9,
            Self::SmpteP3d65 => 12,
        }
    }

    /// 由 H.273 码点解析, 不支持的码点返回 `None`
    pub const fn from_cicp_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Bt709),
            2 => Some(Self::Unspecified),
            9 => Some(Self::Bt2020),
            12 => Some(Self::SmpteP3d65),
            _ => None,
        }
    }

    /// 三原色与白点色度坐标
    ///
    /// 未指定原色时返回 `None`.
    pub const fn chromaticities(&self) -> Option<Chromaticities> {
        const D65: (f64, f64) = (0.3127, 0.3290);
        match self {
            Self::Unspecified => None,
            Self::Bt709 => Some(Chromaticities {
                white: D65,
                red: (0.640, 0.330),
                green: (0.300, 0.600),
                blue: (0.150, 0.060),
            }),
            Self::Bt2020 => Some(Chromaticities {
                white: D65,
                red: (0.708, 0.292),
                green: (0.170, 0.797),
                blue: (0.131, 0.046),
            }),
            Self::SmpteP3d65 => Some(Chromaticities {
                white: D65,
                red: (0.680, 0.320),
                green: (0.265, 0.690),
                blue: (0.150, 0.060),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cicp_codes() {
        assert_eq!(ColorPrimaries::Bt709.cicp_code(), 1);
        assert_eq!(ColorPrimaries::Bt2020.cicp_code(), 9);
        assert_eq!(ColorPrimaries::from_cicp_code(9), Some(ColorPrimaries::Bt2020));
        assert_eq!(ColorPrimaries::from_cicp_code(12), Some(ColorPrimaries::SmpteP3d65));
        assert_eq!(ColorPrimaries::from_cicp_code(0), None);
    }

    #[test]
    fn test_bt2020_chromaticities() {
        let c = ColorPrimaries::Bt2020.chromaticities().unwrap();
        assert_eq!(c.red, (0.708, 0.292));
        assert_eq!(c.white, (0.3127, 0.3290));
        assert!(ColorPrimaries::Unspecified.chromaticities().is_none());
    }
}
