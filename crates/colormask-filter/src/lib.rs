//! # colormask-filter
//!
//! 颜色遮罩滤镜库: 把平面 YUV 视频的每个像素与一组参考颜色比较,
//! 生成二值遮罩平面 (匹配为 peak, 否则为 0).
//!
//! ## 组成
//!
//! - **color**: 打包 RGB 常量到有限范围 YUV 参考颜色的转换
//! - **lut**: 三通道容差查找表
//! - **kernel**: 直接比较与查表两种分类内核, 各含标量与向量变体
//! - **strategy**: 构造时的策略与内核变体选择
//! - **split**: 两路帧分割 (一个派生任务 + 调用线程)
//! - **mask**: 组合以上部分的 [`ColorMask`] 分类器
//! - **color_list**: 颜色列表文本解析
//! - **filters**: [`Filter`] 形式的 [`ColorMaskFilter`]
//!
//! ## 使用示例
//!
//! ```rust
//! use colormask_core::PixelFormat;
//! use colormask_filter::{ColorMask, MaskConfig, VideoInfo, parse_color_list};
//!
//! let config = MaskConfig {
//!     colors: parse_color_list("$FFFFFF // 白色", 8).unwrap(),
//!     ..Default::default()
//! };
//! let info = VideoInfo::new(64, 32, PixelFormat::Yuv420p);
//! let mask = ColorMask::<u8>::new(&config, info).unwrap();
//! assert_eq!(mask.palette().colors()[0].y, 235);
//! ```

pub mod color;
pub mod color_list;
pub mod filters;
mod kernel;
pub mod lut;
pub mod mask;
pub mod split;
pub mod strategy;

use colormask_core::{MaskResult, Sample, VideoFrame};

/// 滤镜 trait
///
/// 滤镜接收输入帧, 处理后输出帧.
pub trait Filter<T: Sample>: Send {
    /// 获取滤镜名称
    fn name(&self) -> &str;

    /// 送入一帧数据
    fn send_frame(&mut self, frame: &VideoFrame<T>) -> MaskResult<()>;

    /// 取出一帧处理后的数据
    fn receive_frame(&mut self) -> MaskResult<VideoFrame<T>>;

    /// 刷新滤镜 (丢弃未取出的输出)
    fn flush(&mut self) -> MaskResult<()>;
}

// 便捷重导出
pub use color::{Matrix, Palette, ReferenceColor, prepare_color, prepare_colors};
pub use color_list::parse_color_list;
pub use filters::colormask::ColorMaskFilter;
pub use lut::ToleranceLut;
pub use mask::{ColorMask, DEFAULT_LUT_THRESHOLD, MaskConfig, VideoInfo};
pub use split::FrameSplitter;
pub use strategy::{DispatchPlan, KernelVariant, Strategy, VectorWidth};
