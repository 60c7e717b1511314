//! 色彩空间转换矩阵.
//!
//! 所有矩阵按行存储, 第 i 行给出输出第 i 个分量:
//! ```text
//! out[i] = m[i][0] * r + m[i][1] * g + m[i][2] * b
//! ```
//! 转换到 XYZ 时第 1 行 (Y) 即相对亮度系数.

/// 3x3 色彩矩阵
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f32; 3]; 3]);

/// 线性 BT.709 → 线性 BT.2020
pub const BT709_TO_BT2020: ColorMatrix = ColorMatrix([
    [0.627_403_9, 0.329_283_03, 0.043_313_067],
    [0.069_097_29, 0.919_540_4, 0.011_362_315],
    [0.016_391_44, 0.088_013_31, 0.895_595_25],
]);

/// 线性 BT.709 → CIE XYZ (D65)
pub const BT709_TO_XYZ: ColorMatrix = ColorMatrix([
    [0.412_390_8, 0.357_584_33, 0.180_480_8],
    [0.212_639, 0.715_168_65, 0.072_192_32],
    [0.019_330_818, 0.119_194_78, 0.950_532_14],
]);

/// 线性 BT.2020 → CIE XYZ (D65)
pub const BT2020_TO_XYZ: ColorMatrix = ColorMatrix([
    [0.636_958_06, 0.144_616_9, 0.168_880_97],
    [0.262_700_2, 0.677_998_07, 0.059_301_715],
    [0.0, 0.028_072_693, 1.060_985_1],
]);

impl ColorMatrix {
    /// 对 RGB 三元组做矩阵变换
    #[inline]
    pub fn transform(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
            m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
            m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
        ]
    }

    /// 仅计算第 1 行 (XYZ 矩阵中即 Y, 相对亮度)
    #[inline]
    pub fn luminance(&self, rgb: [f32; 3]) -> f32 {
        let y = &self.0[1];
        y[0] * rgb[0] + y[1] * rgb[1] + y[2] * rgb[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_白色_亮度为1() {
        assert!(approx(BT709_TO_XYZ.luminance([1.0, 1.0, 1.0]), 1.0));
        assert!(approx(BT2020_TO_XYZ.luminance([1.0, 1.0, 1.0]), 1.0));
    }

    #[test]
    fn test_bt709_to_bt2020_保持白点() {
        let w = BT709_TO_BT2020.transform([1.0, 1.0, 1.0]);
        for c in w {
            assert!(approx(c, 1.0), "白色应映射为白色, 实际 {c}");
        }
    }

    #[test]
    fn test_转换前后亮度一致() {
        let rgb709 = [0.8, 0.3, 0.1];
        let rgb2020 = BT709_TO_BT2020.transform(rgb709);
        let y709 = BT709_TO_XYZ.luminance(rgb709);
        let y2020 = BT2020_TO_XYZ.luminance(rgb2020);
        assert!((y709 - y2020).abs() < 1e-3);
    }

    #[test]
    fn test_luminance_matches_transform_row() {
        let rgb = [0.25, 0.5, 0.75];
        assert_eq!(BT709_TO_XYZ.luminance(rgb), BT709_TO_XYZ.transform(rgb)[1]);
    }
}
