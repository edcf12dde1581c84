//! # colormask-core
//!
//! colormask 核心库, 提供基础类型定义、错误处理和平面访问工具.
//!
//! 滤镜核心 (`colormask-filter`) 与命令行工具共用这里的类型:
//! 采样值位深常量、像素格式、色度子采样、平面视图、视频帧以及 CPU 能力标志.

pub mod cpu;
pub mod error;
pub mod frame;
pub mod pixel_format;
pub mod plane;
pub mod sample;
pub mod subsampling;

// 重导出常用类型
pub use cpu::CpuFeatures;
pub use error::{MaskError, MaskResult};
pub use frame::VideoFrame;
pub use pixel_format::PixelFormat;
pub use plane::{PlaneView, PlaneViewMut, YuvPlanes};
pub use sample::{DepthParams, Sample};
pub use subsampling::Subsampling;
