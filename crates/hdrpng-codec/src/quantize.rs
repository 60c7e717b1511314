//! 浮点 → 16 位定点量化.
//!
//! PNG 只有 8/16 位两种容器位深. 以 16 位容器存储较低的有效位深时,
//! 先按目标位深取整, 再放大回 16 位, 使低 `16 - bits` 位为 0,
//! 压缩器可以借此获得更好的压缩率.

/// 以 `bits` 位有效精度量化归一化值 `value`
///
/// ```text
/// steps = round(value * 2^bits)
/// out   = steps * 65536 / 2^bits   (整数除法)
/// ```
/// 结果饱和截断到 [0, 65535], 不会回绕. 调用方负责保证 `bits` 在 [6, 16].
#[inline]
pub fn quantize_channel(value: f32, bits: u32) -> u16 {
    debug_assert!((1..=16).contains(&bits));
    let postscale = 1i64 << bits;
    let steps = (value * postscale as f32).round();
    // f32 → i64 的 as 转换本身是饱和的, NaN 得到 0
    let scaled = (steps * 65536.0) as i64 / postscale;
    scaled.clamp(0, 65535) as u16
}

/// 原生 16 位直通: `min(65535, trunc(value * 65536))`
#[inline]
pub fn unorm16_from_unit(value: f32) -> u16 {
    ((value * 65536.0) as i64).clamp(0, 65535) as u16
}

/// 10 位 → 16 位扩展 (位复制), 0 → 0, 1023 → 65535
#[inline]
pub fn expand_unorm10(v: u32) -> u16 {
    let v = v & 0x3FF;
    ((v << 6) | (v >> 4)) as u16
}

/// 对 RGB 三个分量做量化
#[inline]
pub fn quantize_rgb(rgb: [f32; 3], bits: u32) -> [u16; 3] {
    rgb.map(|c| quantize_channel(c, bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_低位清零() {
        for bits in 6..16 {
            let mask = (1u16 << (16 - bits)) - 1;
            for i in 0..=200 {
                let q = quantize_channel(i as f32 / 200.0, bits);
                assert!(q == 65535 || q & mask == 0, "bits={bits} q={q:#06x}");
            }
        }
    }

    #[test]
    fn test_单调递增() {
        for bits in 6..=16 {
            let mut prev = 0u16;
            for i in 0..=4096 {
                let q = quantize_channel(i as f32 / 4096.0, bits);
                assert!(q >= prev, "bits={bits} 在 i={i} 处非单调");
                prev = q;
            }
        }
    }

    #[test]
    fn test_饱和() {
        assert_eq!(quantize_channel(1.0, 10), 65535);
        assert_eq!(quantize_channel(1.0, 16), 65535);
        assert_eq!(quantize_channel(1e30, 8), 65535);
        assert_eq!(quantize_channel(f32::INFINITY, 12), 65535);
        assert_eq!(quantize_channel(-0.5, 10), 0);
        assert_eq!(quantize_channel(f32::NAN, 10), 0);
    }

    #[test]
    fn test_已知值() {
        // 0.5 * 1024 = 512 步, 512 * 64 = 32768
        assert_eq!(quantize_channel(0.5, 10), 32768);
        // 0.25 * 64 = 16 步, 16 * 1024 = 16384
        assert_eq!(quantize_channel(0.25, 6), 16384);
    }

    #[test]
    fn test_unorm16_直通() {
        assert_eq!(unorm16_from_unit(0.0), 0);
        assert_eq!(unorm16_from_unit(0.5), 32768);
        assert_eq!(unorm16_from_unit(1.0), 65535);
        assert_eq!(unorm16_from_unit(-1.0), 0);
    }

    #[test]
    fn test_expand_unorm10() {
        assert_eq!(expand_unorm10(0), 0);
        assert_eq!(expand_unorm10(1023), 65535);
        assert_eq!(expand_unorm10(512), 0x8020);
        let mut prev = 0;
        for v in 0..1024 {
            let e = expand_unorm10(v);
            assert!(e >= prev);
            prev = e;
        }
    }
}
