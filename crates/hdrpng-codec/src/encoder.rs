//! 基础编码器 trait 定义.
//!
//! 基础编码器只负责把 16 位 RGB 像素写成合法的 PNG 文件,
//! 不需要理解 HDR. HDR 元数据块由 hdrpng-format 在其输出上重写注入.

use std::path::Path;

use hdrpng_core::{HdrPngError, HdrResult};

/// 48 位 RGB 图像 (每分量 16 位, 原生字节序)
#[derive(Debug, Clone, Copy)]
pub struct Rgb48Image<'a> {
    /// 图像宽度
    pub width: u32,
    /// 图像高度
    pub height: u32,
    /// 每行样本数 (u16 个数), 不小于 `width * 3`
    pub stride: usize,
    /// 像素样本, 按 R, G, B 交错排列
    pub samples: &'a [u16],
}

impl<'a> Rgb48Image<'a> {
    /// 以紧凑行距构造图像并校验数据长度
    pub fn new(width: u32, height: u32, samples: &'a [u16]) -> HdrResult<Self> {
        let image = Self {
            width,
            height,
            stride: width as usize * 3,
            samples,
        };
        image.validate()?;
        Ok(image)
    }

    /// 校验尺寸、行距和数据长度
    pub fn validate(&self) -> HdrResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HdrPngError::InvalidArgument("宽度和高度不能为 0".into()));
        }
        let row = (self.width as usize)
            .checked_mul(3)
            .ok_or_else(|| HdrPngError::InvalidArgument(format!("宽度 {} 过大", self.width)))?;
        if self.stride < row {
            return Err(HdrPngError::InvalidArgument(format!(
                "行距 {} 小于一行样本数 {}",
                self.stride, row,
            )));
        }
        let needed = self
            .stride
            .checked_mul(self.height as usize - 1)
            .and_then(|n| n.checked_add(row))
            .ok_or_else(|| {
                HdrPngError::InvalidArgument(format!(
                    "行距 {} × 高度 {} 溢出",
                    self.stride, self.height,
                ))
            })?;
        if self.samples.len() < needed {
            return Err(HdrPngError::InvalidArgument(format!(
                "像素数据长度 {} 小于所需 {}",
                self.samples.len(),
                needed,
            )));
        }
        Ok(())
    }

    /// 第 `y` 行的样本
    pub fn row(&self, y: u32) -> &'a [u16] {
        let start = self.stride * y as usize;
        &self.samples[start..start + self.width as usize * 3]
    }
}

/// 基础编码器 trait
///
/// 将 48 位 RGB 图像写入 `path` 指定的 PNG 文件. 输出必须是语法合法的 PNG,
/// 且至少包含一个 IDAT 块, HDR 元数据块会插入到第一个 IDAT 之前.
pub trait BaselineEncoder {
    /// 获取编码器名称
    fn name(&self) -> &str;

    /// 编码并写入文件
    fn encode_rgb48(&self, path: &Path, image: &Rgb48Image<'_>) -> HdrResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb48_validate() {
        let samples = vec![0u16; 2 * 2 * 3];
        assert!(Rgb48Image::new(2, 2, &samples).is_ok());
        assert!(Rgb48Image::new(0, 2, &samples).is_err());
        assert!(Rgb48Image::new(3, 2, &samples).is_err());
    }

    #[test]
    fn test_rgb48_尺寸溢出() {
        let samples = vec![0u16; 6];
        let image = Rgb48Image {
            width: u32::MAX,
            height: u32::MAX,
            stride: usize::MAX,
            samples: &samples,
        };
        assert!(matches!(image.validate(), Err(HdrPngError::InvalidArgument(_))));

        let image = Rgb48Image {
            width: 2,
            height: 3,
            stride: usize::MAX / 2 + 1,
            samples: &samples,
        };
        assert!(matches!(image.validate(), Err(HdrPngError::InvalidArgument(_))));
    }

    #[test]
    fn test_rgb48_row_with_stride() {
        // 行距 8, 每行 6 个有效样本
        let samples: Vec<u16> = (0..14).collect();
        let image = Rgb48Image {
            width: 2,
            height: 2,
            stride: 8,
            samples: &samples,
        };
        assert!(image.validate().is_ok());
        assert_eq!(image.row(1), &[8, 9, 10, 11, 12, 13]);
    }
}
