//! 输入像素格式定义.
//!
//! 编码器接受的源像素格式, 与 DXGI / 交换链的 HDR 后备缓冲区格式对应.

use std::fmt;
use std::str::FromStr;

use crate::error::HdrPngError;

/// 输入像素格式
///
/// 所有格式均为打包格式, 小端存储, 行优先.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 未指定
    #[default]
    None,
    /// RGBA 各 16 位半精度浮点, 线性 BT.709 (scRGB)
    R16G16B16A16Float,
    /// R10G10B10A2 无符号归一化, BT.2020 已经过 PQ 编码 (R 在低位)
    R10G10B10A2Unorm,
    /// B10G10R10A2 无符号归一化, BT.2020 已经过 PQ 编码 (B 在低位)
    B10G10R10A2Unorm,
}

impl PixelFormat {
    /// 每像素字节数
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::None => 0,
            Self::R16G16B16A16Float => 8,
            Self::R10G10B10A2Unorm | Self::B10G10R10A2Unorm => 4,
        }
    }

    /// 源数据的原生位深 (每颜色分量)
    pub const fn native_bits(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::R16G16B16A16Float => 16,
            Self::R10G10B10A2Unorm | Self::B10G10R10A2Unorm => 10,
        }
    }

    /// 源数据是否已经过 PQ 编码
    pub const fn is_pq_encoded(&self) -> bool {
        matches!(self, Self::R10G10B10A2Unorm | Self::B10G10R10A2Unorm)
    }

    /// 计算一帧图像所需的字节数
    ///
    /// 格式为 None 或尺寸溢出时返回 `None`.
    pub fn frame_size(&self, width: u32, height: u32) -> Option<usize> {
        if *self == Self::None {
            return None;
        }
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.bytes_per_pixel())
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::R16G16B16A16Float => "rgba16f",
            Self::R10G10B10A2Unorm => "rgb10a2",
            Self::B10G10R10A2Unorm => "bgr10a2",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PixelFormat {
    type Err = HdrPngError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgba16f" | "r16g16b16a16_float" => Ok(Self::R16G16B16A16Float),
            "rgb10a2" | "r10g10b10a2_unorm" => Ok(Self::R10G10B10A2Unorm),
            "bgr10a2" | "b10g10r10a2_unorm" => Ok(Self::B10G10R10A2Unorm),
            _ => Err(HdrPngError::InvalidArgument(format!(
                "未知像素格式: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size() {
        assert_eq!(PixelFormat::R16G16B16A16Float.frame_size(2, 3), Some(48));
        assert_eq!(PixelFormat::R10G10B10A2Unorm.frame_size(2, 3), Some(24));
        assert_eq!(PixelFormat::None.frame_size(2, 3), None);
        // 溢出时返回 None
        assert_eq!(
            PixelFormat::R16G16B16A16Float.frame_size(u32::MAX, u32::MAX),
            None
        );
    }

    #[test]
    fn test_名称往返() {
        for pf in [
            PixelFormat::R16G16B16A16Float,
            PixelFormat::R10G10B10A2Unorm,
            PixelFormat::B10G10R10A2Unorm,
        ] {
            assert_eq!(pf.to_string().parse::<PixelFormat>().unwrap(), pf);
        }
        assert!("yuv420p".parse::<PixelFormat>().is_err());
    }

    #[test]
    fn test_native_bits() {
        assert_eq!(PixelFormat::R16G16B16A16Float.native_bits(), 16);
        assert_eq!(PixelFormat::B10G10R10A2Unorm.native_bits(), 10);
        assert!(PixelFormat::R10G10B10A2Unorm.is_pq_encoded());
        assert!(!PixelFormat::R16G16B16A16Float.is_pq_encoded());
    }
}
