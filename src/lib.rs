//! # colormask
//!
//! 纯 Rust 实现的 YUV 视频调色板颜色遮罩滤镜.
//!
//! 对平面 YUV 视频 (8 位或 16 位, 4:2:0 / 4:2:2 / 4:4:4) 的每个像素,
//! 判断它是否在容差内匹配一组参考颜色中的任意一个, 输出二值遮罩平面.
//!
//! # 快速开始
//!
//! ```rust
//! use colormask::core::{PixelFormat, VideoFrame};
//! use colormask::filter::{ColorMaskFilter, Filter, MaskConfig, VideoInfo, parse_color_list};
//!
//! let config = MaskConfig {
//!     colors: parse_color_list("$FFFFFF", 8).unwrap(),
//!     ..Default::default()
//! };
//! let info = VideoInfo::new(16, 8, PixelFormat::Yuv420p);
//! let mut filter = ColorMaskFilter::<u8>::new(&config, info).unwrap();
//!
//! let frame = VideoFrame::<u8>::alloc(16, 8, PixelFormat::Yuv420p).unwrap();
//! filter.send_frame(&frame).unwrap();
//! let mask = filter.receive_frame().unwrap();
//! assert_eq!(mask.plane(0).unwrap().row(0)[0], 0);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `colormask-core` | 核心类型: 错误, 采样, 像素格式, 平面视图, 帧, CPU 能力 |
//! | `colormask-filter` | 颜色准备, 查找表, 分类内核, 策略选择, 帧分割, 滤镜 |

/// 核心类型与工具
pub use colormask_core as core;

/// 颜色遮罩滤镜
pub use colormask_filter as filter;

/// 获取 colormask 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
