//! 颜色遮罩分类器.
//!
//! [`ColorMask`] 在构造时完成全部准备工作 (参考颜色转换, 策略选择,
//! 按需构建查找表, 多线程分割检查), 之后逐帧分类不分配内存也不会失败.

use colormask_core::{
    CpuFeatures, MaskError, MaskResult, PixelFormat, PlaneView, PlaneViewMut, Sample,
    Subsampling, YuvPlanes,
};

use crate::color::{Matrix, Palette, prepare_colors};
use crate::kernel::{KernelContext, classify_rows};
use crate::lut::ToleranceLut;
use crate::split::FrameSplitter;
use crate::strategy::{DispatchPlan, Strategy, VectorWidth};

/// 默认的查表阈值: 颜色数超过此值时主体改为查表
pub const DEFAULT_LUT_THRESHOLD: usize = 9;

/// 分类器配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    /// 打包 RGB 常量 (8 位输入为 24 位打包, 16 位输入为 48 位打包)
    pub colors: Vec<u64>,
    /// 容差, `None` 时使用位深默认值 (8 位 10, 16 位 2570)
    pub tolerance: Option<i64>,
    /// 亮度矩阵
    pub matrix: Matrix,
    /// 输出色度平面填充中灰, 而不是复制输入色度
    pub grayscale: bool,
    /// 颜色数超过该值时使用查表策略
    pub lut_threshold: usize,
    /// 启用两路帧分割
    pub multithreaded: bool,
    /// 输出只保留亮度平面
    pub only_luma: bool,
    /// 向量宽度覆盖
    pub vector_width: VectorWidth,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            colors: Vec::new(),
            tolerance: None,
            matrix: Matrix::default(),
            grayscale: false,
            lut_threshold: DEFAULT_LUT_THRESHOLD,
            multithreaded: false,
            only_luma: false,
            vector_width: VectorWidth::Auto,
        }
    }
}

/// 输入视频流描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    /// 亮度宽度
    pub width: u32,
    /// 亮度高度
    pub height: u32,
    /// 输入像素格式
    pub format: PixelFormat,
}

impl VideoInfo {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }
}

/// 检查像素格式, 返回子采样布局
fn check_format<T: Sample>(format: PixelFormat) -> MaskResult<Subsampling> {
    let bits = format.bits_per_component();
    if format.is_planar_yuv() && bits != 8 && bits != 16 {
        return Err(MaskError::Unsupported(format!(
            "只支持 8 位和 16 位, 实际 {format} ({bits} 位)"
        )));
    }
    let layout = Subsampling::from_format(format).ok_or_else(|| {
        MaskError::Unsupported(format!("只支持 YUV420, YUV422 和 YUV444, 实际 {format}"))
    })?;
    if bits != T::PARAMS.bits {
        return Err(MaskError::InvalidArgument(format!(
            "像素格式 {format} 与 {} 位采样类型不匹配",
            T::PARAMS.bits
        )));
    }
    Ok(layout)
}

/// 颜色遮罩分类器
///
/// 构造后只读, 可跨线程共享. 输出亮度平面中每个像素为 0 或 peak.
#[derive(Debug)]
pub struct ColorMask<T> {
    palette: Palette<T>,
    lut: Option<ToleranceLut<T>>,
    plan: DispatchPlan,
    layout: Subsampling,
    splitter: Option<FrameSplitter>,
    info: VideoInfo,
    grayscale: bool,
    only_luma: bool,
}

impl<T: Sample> ColorMask<T> {
    /// 按当前 CPU 的能力创建分类器
    pub fn new(config: &MaskConfig, info: VideoInfo) -> MaskResult<Self> {
        Self::with_features(config, info, CpuFeatures::detect())
    }

    /// 使用给定的能力集合创建分类器
    ///
    /// `features` 会与运行时检测结果求交集, 不会选出当前 CPU 不支持的内核.
    pub fn with_features(
        config: &MaskConfig,
        info: VideoInfo,
        features: CpuFeatures,
    ) -> MaskResult<Self> {
        let layout = check_format::<T>(info.format)?;
        let params = T::PARAMS;

        let tolerance = config
            .tolerance
            .unwrap_or(i64::from(params.default_tolerance));
        let colors = prepare_colors::<T>(&config.colors, config.matrix);
        let palette = Palette::new(colors, tolerance)?;

        let splitter = if config.multithreaded {
            Some(FrameSplitter::new(info.height as usize, layout)?)
        } else {
            None
        };

        let plan = DispatchPlan::select::<T>(
            palette.len(),
            config.lut_threshold,
            info.width as usize,
            config.vector_width,
            features & CpuFeatures::detect(),
        )?;
        let lut = plan.needs_lut().then(|| ToleranceLut::build(&palette));

        log::debug!(
            "colormask: {}x{} {} {layout}, {} 个颜色, 容差 {tolerance}, 矩阵 {}",
            info.width,
            info.height,
            info.format,
            palette.len(),
            config.matrix,
        );
        log::debug!(
            "colormask: 策略 {:?}, 内核 {} ({} 通道), 尾列 {}, 查找表 {}, 多线程 {}",
            plan.strategy,
            plan.variant,
            plan.lanes,
            plan.tail_width,
            if lut.is_some() { "已构建" } else { "未构建" },
            splitter.is_some(),
        );

        Ok(Self {
            palette,
            lut,
            plan,
            layout,
            splitter,
            info,
            grayscale: config.grayscale,
            only_luma: config.only_luma,
        })
    }

    /// 输入视频流描述
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// 调度计划
    pub fn plan(&self) -> &DispatchPlan {
        &self.plan
    }

    /// 主体策略
    pub fn strategy(&self) -> Strategy {
        self.plan.strategy
    }

    /// 子采样布局
    pub fn layout(&self) -> Subsampling {
        self.layout
    }

    /// 调色板 (转换后的参考颜色与容差)
    pub fn palette(&self) -> &Palette<T> {
        &self.palette
    }

    /// 查找表, 计划不需要时为 `None`
    pub fn lut(&self) -> Option<&ToleranceLut<T>> {
        self.lut.as_ref()
    }

    /// 是否启用两路帧分割
    pub fn is_multithreaded(&self) -> bool {
        self.splitter.is_some()
    }

    /// 输出像素格式
    pub fn output_format(&self) -> PixelFormat {
        if self.only_luma {
            self.info.format.luma_only()
        } else {
            self.info.format
        }
    }

    /// 输出是否只有亮度平面
    pub fn only_luma(&self) -> bool {
        self.only_luma
    }

    /// 分类一帧, 遮罩写入 `dst`
    ///
    /// `dst` 必须与 `src.y` 同尺寸, `src.u`/`src.v` 必须至少覆盖子采样布局
    /// 下对应的色度行列. 几何只在 debug 构建中断言.
    ///
    /// # Panics
    ///
    /// 色度平面小于亮度平面对应的尺寸时, 访问越界会 panic.
    /// 需要校验输入的调用方应使用 [`ColorMaskFilter`](crate::ColorMaskFilter).
    pub fn classify(&self, src: &YuvPlanes<'_, T>, mut dst: PlaneViewMut<'_, T>) {
        debug_assert_eq!(src.y.width(), dst.width());
        debug_assert_eq!(src.y.height(), dst.height());
        if dst.width() == 0 || dst.height() == 0 {
            return;
        }

        let ctx = KernelContext {
            palette: &self.palette,
            lut: self.lut.as_ref(),
            layout: self.layout,
        };
        match &self.splitter {
            Some(splitter) => splitter.run(src, dst, |half_src, half_dst| {
                classify_rows(&self.plan, &ctx, half_src, half_dst)
            }),
            None => classify_rows(&self.plan, &ctx, src, &mut dst),
        }
    }

    /// 写入一个输出色度平面: 灰度模式填充中点, 否则复制输入
    pub fn write_chroma(&self, src: &PlaneView<'_, T>, dst: &mut PlaneViewMut<'_, T>) {
        if self.grayscale {
            dst.fill(T::from_clamped(i64::from(T::PARAMS.midpoint)));
        } else {
            dst.copy_from(src);
        }
    }
}
