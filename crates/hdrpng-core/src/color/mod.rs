//! 色彩相关类型定义.
//!
//! 色彩原色、传递特性、矩阵系数与范围, 以及 cICP 码点 (ITU-T H.273)
//! 和 BT.709 / BT.2020 / XYZ 之间的转换矩阵.

mod color_primaries;
mod color_range;
mod color_space;
mod color_transfer;
mod matrix;
mod pq;

pub use color_primaries::{Chromaticities, ColorPrimaries};
pub use color_range::ColorRange;
pub use color_space::ColorSpace;
pub use color_transfer::ColorTransfer;
pub use matrix::{BT709_TO_BT2020, BT709_TO_XYZ, BT2020_TO_XYZ, ColorMatrix};
pub use pq::{PQ_MAX_LINEAR, PQ_PEAK_NITS, SCRGB_WHITE_NITS, pq_decode, pq_decode_rgb, pq_encode, pq_encode_rgb};
