//! 内容亮度统计 (MaxCLL / MaxFALL).
//!
//! 输入为逐像素亮度 (XYZ 中的 Y, scRGB 单位, 1.0 = 80 cd/m²).
//!
//! - MaxFALL: 各扫描行平均亮度的平均值
//! - MaxCLL: 亮度的 99.5 百分位, 通过 65536 档直方图求得
//!
//! 输出单位为 0.0001 cd/m², 与 PNG cLLi 块一致.

use hdrpng_core::color::{PQ_MAX_LINEAR, SCRGB_WHITE_NITS};
use log::debug;

/// 直方图档位数
const HISTOGRAM_BINS: usize = 65536;

/// MaxCLL 百分位阈值: 从最亮端累计超过 0.5% 像素即停止
const MAX_CLL_PERCENTILE: f64 = 99.5;

/// cLLi 字段的单位 (cd/m²)
const CLLI_UNIT_NITS: f64 = 0.0001;

/// 内容亮度信息 (cLLi 块数据)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentLightInfo {
    /// 最大内容亮度, 单位 0.0001 cd/m²
    pub max_cll: u32,
    /// 最大帧平均亮度, 单位 0.0001 cd/m²
    pub max_fall: u32,
}

impl ContentLightInfo {
    /// MaxCLL (cd/m²)
    pub fn max_cll_nits(&self) -> f64 {
        f64::from(self.max_cll) * CLLI_UNIT_NITS
    }

    /// MaxFALL (cd/m²)
    pub fn max_fall_nits(&self) -> f64 {
        f64::from(self.max_fall) * CLLI_UNIT_NITS
    }
}

/// scRGB 亮度 → cLLi 定点值
fn scrgb_to_clli_units(luminance: f64) -> u32 {
    let units = (f64::from(SCRGB_WHITE_NITS) * luminance / CLLI_UNIT_NITS).round();
    units.clamp(0.0, f64::from(u32::MAX)) as u32
}

/// 计算 MaxCLL / MaxFALL
///
/// `luminance` 为空、宽或高为 0, 或者切片短于 `width * height` 时,
/// 直接返回全 0 结果.
pub fn calculate_content_light_info(luminance: &[f32], width: u32, height: u32) -> ContentLightInfo {
    let width = width as usize;
    let height = height as usize;
    let Some(pixel_count) = width.checked_mul(height) else {
        return ContentLightInfo::default();
    };
    if pixel_count == 0 || luminance.len() < pixel_count {
        return ContentLightInfo::default();
    }
    let luminance = &luminance[..pixel_count];

    // 第 1 遍: 扫描行平均值, 全局最小/最大值
    let mut lum_accum = 0.0f64;
    let mut max_lum = 0.0f32;
    let mut min_lum = f32::MAX;
    for row in luminance.chunks_exact(width) {
        let mut scanline = 0.0f64;
        for &v in row {
            max_lum = max_lum.max(v);
            min_lum = min_lum.min(v);
            scanline += f64::from(v);
        }
        lum_accum += scanline / width as f64;
    }
    let frame_average = lum_accum / height as f64;

    // 0 - 10000 cd/m², 适合屏幕截图而非 HDR 摄影
    let min_lum = min_lum.clamp(0.0, PQ_MAX_LINEAR);
    let max_lum = max_lum.clamp(min_lum, PQ_MAX_LINEAR);
    let range = max_lum - min_lum;

    // 第 2 遍: 直方图
    let mut histogram = vec![0u32; HISTOGRAM_BINS];
    let bin_width = range / HISTOGRAM_BINS as f32;
    for &v in luminance {
        let bin = if bin_width > 0.0 {
            (((v - min_lum) / bin_width).round() as i64).clamp(0, HISTOGRAM_BINS as i64 - 1) as usize
        } else {
            0
        };
        histogram[bin] += 1;
    }

    // 从最亮端向下累计, 求 99.5 百分位
    let mut percentile_lum = max_lum;
    let mut percent = 100.0f64;
    let total = pixel_count as f64;
    for (i, &count) in histogram.iter().enumerate().rev() {
        percent -= 100.0 * (f64::from(count) / total);
        if percent <= MAX_CLL_PERCENTILE {
            percentile_lum = min_lum + range * (i as f32 / HISTOGRAM_BINS as f32);
            break;
        }
    }

    let info = ContentLightInfo {
        max_cll: scrgb_to_clli_units(f64::from(percentile_lum)),
        max_fall: scrgb_to_clli_units(frame_average),
    };

    debug!(
        "内容亮度统计: {}x{}, 亮度范围 [{:.4}, {:.4}], MaxCLL={:.2} cd/m², MaxFALL={:.2} cd/m²",
        width,
        height,
        min_lum,
        max_lum,
        info.max_cll_nits(),
        info.max_fall_nits(),
    );

    info
}
