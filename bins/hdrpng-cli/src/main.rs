//! hdrpng-cli - HDR PNG 命令行工具
//!
//! - `encode`: 原始像素 (RGBA16F / 10:10:10:2) → 带 HDR 元数据的 PNG
//! - `probe`: 列出 PNG 块并解析 HDR 元数据
//! - `clli`: 只计算 MaxCLL / MaxFALL

mod logging;
mod probe;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use hdrpng::{EncodeConfig, HdrPngEncoder};
use hdrpng_codec::convert_frame;
use hdrpng_core::{AlignedBuffer, PixelFormat};

#[derive(Parser, Debug)]
#[command(name = "hdrpng-cli", version, about = "纯 Rust HDR10 PNG 编码工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// 日志级别 (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 将原始像素编码为 HDR PNG
    Encode(EncodeArgs),
    /// 显示 PNG 块与 HDR 元数据
    Probe(ProbeArgs),
    /// 计算原始像素的内容亮度 (MaxCLL / MaxFALL)
    Clli(RawInput),
}

/// 原始像素输入
#[derive(Args, Debug)]
struct RawInput {
    /// 原始像素文件 (紧凑行距, 小端)
    #[arg(short, long)]
    input: PathBuf,

    /// 宽度
    #[arg(short = 'W', long)]
    width: u32,

    /// 高度
    #[arg(short = 'H', long)]
    height: u32,

    /// 像素格式: rgba16f, rgb10a2, bgr10a2
    #[arg(short, long)]
    format: PixelFormat,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[command(flatten)]
    raw: RawInput,

    /// 输出 PNG 文件
    #[arg(short, long)]
    output: PathBuf,

    /// 量化位深 [6, 16], 覆盖配置文件
    #[arg(short, long)]
    bits: Option<u32>,

    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 覆盖已存在的输出文件
    #[arg(short = 'y', long)]
    overwrite: bool,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// PNG 文件
    input: PathBuf,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init("hdrpng-cli", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    let result = match &cli.command {
        Command::Encode(args) => run_encode(args),
        Command::Probe(args) => run_probe(args),
        Command::Clli(args) => run_clli(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("错误: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// 读取原始像素到 16 字节对齐缓冲区
fn read_raw(raw: &RawInput) -> Result<AlignedBuffer> {
    let data = fs::read(&raw.input).with_context(|| format!("无法读取 '{}'", raw.input.display()))?;
    let needed = raw
        .format
        .frame_size(raw.width, raw.height)
        .with_context(|| format!("图像尺寸 {}x{} 过大", raw.width, raw.height))?;
    if data.len() < needed {
        bail!(
            "'{}' 只有 {} 字节, {}x{} {} 需要 {} 字节",
            raw.input.display(),
            data.len(),
            raw.width,
            raw.height,
            raw.format,
            needed,
        );
    }
    tracing::debug!("读取原始像素: {} ({} 字节)", raw.input.display(), data.len());
    Ok(AlignedBuffer::from_slice(&data[..needed]))
}

fn load_config(path: Option<&Path>, bits: Option<u32>) -> Result<EncodeConfig> {
    let mut config = match path {
        Some(p) => EncodeConfig::load(p).with_context(|| format!("无法加载配置 '{}'", p.display()))?,
        None => EncodeConfig::default(),
    };
    if let Some(bits) = bits {
        config.quantization_bits = bits;
    }
    config.validate()?;
    Ok(config)
}

fn run_encode(args: &EncodeArgs) -> Result<()> {
    if args.output.exists() && !args.overwrite {
        bail!("输出文件 '{}' 已存在, 使用 -y 覆盖", args.output.display());
    }
    let config = load_config(args.config.as_deref(), args.bits)?;
    let pixels = read_raw(&args.raw)?;

    let summary = HdrPngEncoder::from_config(&config)
        .encode(
            &args.output,
            args.raw.width,
            args.raw.height,
            pixels.as_slice(),
            args.raw.format,
        )
        .with_context(|| format!("编码 '{}' 失败", args.output.display()))?;

    println!(
        "{} -> {} ({}x{}, {} 位, {} 字节)",
        args.raw.input.display(),
        args.output.display(),
        summary.width,
        summary.height,
        summary.effective_bits,
        summary.file_size,
    );
    println!(
        "MaxCLL {:.2} cd/m², MaxFALL {:.2} cd/m²",
        summary.content_light.max_cll_nits(),
        summary.content_light.max_fall_nits(),
    );
    Ok(())
}

fn run_probe(args: &ProbeArgs) -> Result<()> {
    let data = fs::read(&args.input).with_context(|| format!("无法读取 '{}'", args.input.display()))?;
    let report = probe::probe_bytes(&args.input.display().to_string(), &data)
        .with_context(|| format!("无法解析 '{}'", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        probe::print_text(&report);
    }
    Ok(())
}

fn run_clli(raw: &RawInput) -> Result<()> {
    let pixels = read_raw(raw)?;
    // 亮度与量化位深无关, 取 16 位避免额外量化
    let frame = convert_frame(pixels.as_slice(), raw.width, raw.height, raw.format, 16)?;
    let info = hdrpng_codec::calculate_content_light_info(&frame.luminance, raw.width, raw.height);
    println!("MaxCLL  : {:.4} cd/m²", info.max_cll_nits());
    println!("MaxFALL : {:.4} cd/m²", info.max_fall_nits());
    Ok(())
}
