//! 编码配置.
//!
//! 可从 JSON 文件加载, 缺省字段使用默认值:
//!
//! ```json
//! {
//!     "quantization_bits": 10,
//!     "compression_level": 6,
//!     "srgb_hints": false,
//!     "mastering_display": {
//!         "red": [0.708, 0.292],
//!         "green": [0.170, 0.797],
//!         "blue": [0.131, 0.046],
//!         "white": [0.3127, 0.3290],
//!         "min_luminance": 0.005,
//!         "max_luminance": 1000.0
//!     }
//! }
//! ```

use std::fs;
use std::path::Path;

use hdrpng_core::color::Chromaticities;
use hdrpng_core::{HdrPngError, HdrResult, validate_quantization_bits};
use hdrpng_format::{MasteringDisplay, MasteringDisplaySource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EncodeConfig {
    #[serde(default = "default_quantization_bits")]
    pub quantization_bits: u32,
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    #[serde(default)]
    pub srgb_hints: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastering_display: Option<MasteringDisplayConfig>,
}

fn default_quantization_bits() -> u32 {
    10
}

fn default_compression_level() -> u32 {
    6
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            quantization_bits: default_quantization_bits(),
            compression_level: default_compression_level(),
            srgb_hints: false,
            mastering_display: None,
        }
    }
}

impl EncodeConfig {
    /// 解析 JSON 文本并校验
    pub fn from_json_str(text: &str) -> HdrResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| HdrPngError::InvalidData(format!("配置解析失败: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> HdrResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> HdrResult<()> {
        validate_quantization_bits(self.quantization_bits)?;
        if self.compression_level > 9 {
            return Err(HdrPngError::InvalidArgument(format!(
                "压缩级别 {} 超出范围 [0, 9]",
                self.compression_level,
            )));
        }
        if let Some(display) = &self.mastering_display {
            display.validate()?;
        }
        Ok(())
    }
}

/// 母版显示器配置 (CIE 1931 xy, cd/m²)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MasteringDisplayConfig {
    pub red: [f64; 2],
    pub green: [f64; 2],
    pub blue: [f64; 2],
    pub white: [f64; 2],
    pub min_luminance: f64,
    pub max_luminance: f64,
}

impl MasteringDisplayConfig {
    fn validate(&self) -> HdrResult<()> {
        let coords = [self.red, self.green, self.blue, self.white];
        if coords.iter().flatten().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(HdrPngError::InvalidArgument("母版显示器色度坐标必须在 [0, 1] 内".into()));
        }
        if !(self.min_luminance >= 0.0 && self.min_luminance <= self.max_luminance) {
            return Err(HdrPngError::InvalidArgument(format!(
                "母版显示器亮度范围无效: [{}, {}]",
                self.min_luminance, self.max_luminance,
            )));
        }
        Ok(())
    }
}

impl MasteringDisplaySource for MasteringDisplayConfig {
    fn mastering_display(&self) -> Option<MasteringDisplay> {
        let xy = |v: [f64; 2]| (v[0], v[1]);
        Some(MasteringDisplay {
            chromaticities: Chromaticities {
                white: xy(self.white),
                red: xy(self.red),
                green: xy(self.green),
                blue: xy(self.blue),
            },
            min_luminance: self.min_luminance,
            max_luminance: self.max_luminance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认值() {
        let config = EncodeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EncodeConfig::default());
        assert_eq!(config.quantization_bits, 10);
    }

    #[test]
    fn test_母版显示器() {
        let text = r#"{
            "quantization_bits": 12,
            "mastering_display": {
                "red": [0.708, 0.292], "green": [0.170, 0.797],
                "blue": [0.131, 0.046], "white": [0.3127, 0.3290],
                "min_luminance": 0.005, "max_luminance": 1000.0
            }
        }"#;
        let config = EncodeConfig::from_json_str(text).unwrap();
        let display = config.mastering_display.unwrap().mastering_display().unwrap();
        assert_eq!(display.chromaticities.red, (0.708, 0.292));
        assert_eq!(display.max_luminance, 1000.0);
    }

    #[test]
    fn test_非法配置() {
        assert!(EncodeConfig::from_json_str(r#"{"quantization_bits": 4}"#).is_err());
        assert!(EncodeConfig::from_json_str(r#"{"compression_level": 10}"#).is_err());
        assert!(EncodeConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_序列化_省略空字段() {
        let json = serde_json::to_string(&EncodeConfig::default()).unwrap();
        assert!(!json.contains("mastering_display"));
    }
}
