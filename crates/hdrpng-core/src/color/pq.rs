//! SMPTE ST 2084 (PQ) 传递函数.
//!
//! 线性值使用 scRGB 单位 (1.0 = 80 cd/m²), 因此 PQ 峰值 10000 cd/m²
//! 对应线性值 125.0:
//! ```text
//! r  = (max(L, 0) / 125)^n
//! pq = ((c1 + c2 * r) / (1 + c3 * r))^m
//! ```

/// scRGB 参考白亮度 (cd/m²)
pub const SCRGB_WHITE_NITS: f32 = 80.0;

/// PQ 峰值亮度 (cd/m²)
pub const PQ_PEAK_NITS: f32 = 10_000.0;

/// PQ 峰值对应的 scRGB 线性值
pub const PQ_MAX_LINEAR: f32 = PQ_PEAK_NITS / SCRGB_WHITE_NITS;

const PQ_N: f32 = 2610.0 / 16384.0;
const PQ_M: f32 = 2523.0 / 32.0;
const PQ_C1: f32 = 3424.0 / 4096.0;
const PQ_C2: f32 = 2413.0 / 128.0;
const PQ_C3: f32 = 2392.0 / 128.0;

/// 线性 (scRGB) → PQ 编码值
#[inline]
pub fn pq_encode(linear: f32) -> f32 {
    let r = (linear.max(0.0) / PQ_MAX_LINEAR).powf(PQ_N);
    ((PQ_C2 * r + PQ_C1) / (PQ_C3 * r + 1.0)).powf(PQ_M)
}

/// PQ 编码值 → 线性 (scRGB)
///
/// 分子被截断到 0, 避免对负数开方.
#[inline]
pub fn pq_decode(pq: f32) -> f32 {
    let p = pq.max(0.0).powf(1.0 / PQ_M);
    let nd = (p - PQ_C1).max(0.0) / (PQ_C2 - PQ_C3 * p);
    nd.max(0.0).powf(1.0 / PQ_N) * PQ_MAX_LINEAR
}

/// 对 RGB 三元组逐分量做 PQ 编码
#[inline]
pub fn pq_encode_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(pq_encode)
}

/// 对 RGB 三元组逐分量做 PQ 解码
#[inline]
pub fn pq_decode_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(pq_decode)
}
