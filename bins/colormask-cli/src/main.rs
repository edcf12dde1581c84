//! colormask - 颜色遮罩命令行工具
//!
//! 读取原始平面 YUV 帧, 把与调色板中任一颜色在容差内匹配的像素标记为
//! peak, 其余为 0, 写出遮罩帧.

mod logging;
mod raw;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use colormask_core::{PixelFormat, VideoFrame};
use colormask_filter::{
    ColorMaskFilter, DEFAULT_LUT_THRESHOLD, Filter, MaskConfig, Matrix, VectorWidth, VideoInfo,
    parse_color_list,
};

use raw::RawSample;

#[derive(Parser, Debug)]
#[command(name = "colormask-cli", version, about = "YUV 视频调色板颜色遮罩工具")]
struct Cli {
    /// 输入原始 YUV 文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输出遮罩文件路径
    #[arg(short, long)]
    output: PathBuf,

    /// 帧尺寸 (如 "1920x1080")
    #[arg(short = 's', long = "size", value_parser = parse_size)]
    size: (u32, u32),

    /// 输入像素格式 (yuv420p, yuv422p, yuv444p, yuv420p16, yuv422p16, yuv444p16)
    #[arg(long = "pix-fmt", default_value = "yuv420p")]
    pix_fmt: PixelFormat,

    /// 颜色列表 (如 "$FF0000 $00FF00", 支持 // 与 /* */ 注释)
    #[arg(long)]
    colors: String,

    /// 容差, 默认 8 位 10, 16 位 2570
    #[arg(long)]
    tolerance: Option<i64>,

    /// 亮度矩阵 (bt601, bt709)
    #[arg(long, default_value_t = Matrix::Bt709)]
    matrix: Matrix,

    /// 色度平面填充中灰
    #[arg(long)]
    gray: bool,

    /// 颜色数超过该值时使用查表
    #[arg(long = "lut-threshold", default_value_t = DEFAULT_LUT_THRESHOLD)]
    lut_threshold: usize,

    /// 启用两路帧分割
    #[arg(long)]
    mt: bool,

    /// 只输出亮度平面
    #[arg(long = "only-luma")]
    only_luma: bool,

    /// 向量宽度 (auto, c, sse2, avx2, avx512)
    #[arg(long, default_value = "auto")]
    opt: VectorWidth,

    /// 最多处理的帧数
    #[arg(long)]
    frames: Option<u64>,

    /// 日志目录
    #[arg(long = "log-dir", default_value = "logs")]
    log_dir: PathBuf,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 解析帧尺寸字符串 (如 "1280x720")
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("无效的尺寸 '{s}', 格式为 WxH"))?;
    let w = w.trim().parse().map_err(|e| format!("无效的宽度 '{w}': {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("无效的高度 '{h}': {e}"))?;
    Ok((w, h))
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init("colormask-cli", cli.verbose, &cli.log_dir) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    if let Err(e) = run(&cli) {
        tracing::error!("{e:#}");
        eprintln!("错误: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let format = cli.pix_fmt;
    match format.bits_per_component() {
        8 => mask_stream::<u8>(cli),
        16 => mask_stream::<u16>(cli),
        bits => bail!("只支持 8 位和 16 位, {format} 为 {bits} 位"),
    }
}

fn build_config(cli: &Cli, bits: u32) -> anyhow::Result<MaskConfig> {
    let colors = parse_color_list(&cli.colors, bits).context("解析颜色列表失败")?;
    if colors.is_empty() {
        tracing::warn!("颜色列表为空, 输出遮罩全部为 0");
    }
    Ok(MaskConfig {
        colors,
        tolerance: cli.tolerance,
        matrix: cli.matrix,
        grayscale: cli.gray,
        lut_threshold: cli.lut_threshold,
        multithreaded: cli.mt,
        only_luma: cli.only_luma,
        vector_width: cli.opt,
    })
}

fn open_input(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("无法打开输入文件 '{}'", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("无法创建输出文件 '{}'", path.display()))?;
    Ok(BufWriter::new(file))
}

fn mask_stream<T: RawSample>(cli: &Cli) -> anyhow::Result<()> {
    let (width, height) = cli.size;
    let format = cli.pix_fmt;
    let config = build_config(cli, format.bits_per_component())?;
    let info = VideoInfo::new(width, height, format);
    let mut filter = ColorMaskFilter::<T>::new(&config, info).context("创建颜色遮罩滤镜失败")?;

    let mask = filter.mask();
    tracing::info!(
        "输入: {} ({width}x{height} {format}), 输出: {} ({})",
        cli.input.display(),
        cli.output.display(),
        mask.output_format(),
    );
    tracing::info!(
        "{} 个颜色, 容差 {}, 策略 {:?}, 内核 {}",
        mask.palette().len(),
        mask.palette().tolerance().to_i32(),
        mask.strategy(),
        mask.plan().variant,
    );

    let mut reader = open_input(&cli.input)?;
    let mut writer = create_output(&cli.output)?;

    let start = Instant::now();
    let mut count: u64 = 0;
    while cli.frames.is_none_or(|limit| count < limit) {
        let Some(mut frame): Option<VideoFrame<T>> =
            raw::read_frame(&mut reader, format, width, height)?
        else {
            break;
        };
        frame.pts = count as i64;
        filter.send_frame(&frame)?;
        let out = filter.receive_frame()?;
        raw::write_frame(&mut writer, &out)?;
        count += 1;
        tracing::debug!("帧 {count} 完成");
    }
    filter.flush()?;
    writer.flush().context("写出遮罩帧失败")?;

    let elapsed = start.elapsed().as_secs_f64();
    let fps = if elapsed > 0.0 {
        count as f64 / elapsed
    } else {
        0.0
    };
    tracing::info!("完成: {count} 帧, 用时 {elapsed:.3}s ({fps:.1} fps)");
    Ok(())
}
