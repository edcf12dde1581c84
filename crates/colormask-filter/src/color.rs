//! 参考颜色准备.
//!
//! 把打包的 RGB 常量转换为目标位深下的有限范围 YUV 参考颜色.
//! 转换只在滤镜构造时执行一次.

use std::fmt;
use std::str::FromStr;

use colormask_core::{MaskError, MaskResult, Sample};

/// 亮度矩阵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Matrix {
    /// ITU-R BT.601 (标清)
    Bt601,
    /// ITU-R BT.709 (高清)
    #[default]
    Bt709,
}

impl Matrix {
    /// 亮度权重 (kR, kB), 绿色权重为 `1 - kR - kB`
    pub const fn coefficients(self) -> (f32, f32) {
        match self {
            Self::Bt601 => (0.299, 0.114),
            Self::Bt709 => (0.2126, 0.0722),
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bt601 => write!(f, "bt601"),
            Self::Bt709 => write!(f, "bt709"),
        }
    }
}

impl FromStr for Matrix {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bt601" | "601" => Ok(Self::Bt601),
            "bt709" | "709" => Ok(Self::Bt709),
            other => Err(MaskError::InvalidArgument(format!(
                "未知亮度矩阵: {other} (可选 bt601, bt709)"
            ))),
        }
    }
}

/// 参考颜色 (采样单位下的 Y, U, V)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceColor<T> {
    pub y: T,
    pub u: T,
    pub v: T,
}

impl<T> ReferenceColor<T> {
    pub const fn new(y: T, u: T, v: T) -> Self {
        Self { y, u, v }
    }
}

/// 加 0.5 后向零截断
#[inline]
fn round_half_up(value: f32) -> i64 {
    (value + 0.5) as i64
}

/// 转换单个打包 RGB 常量
///
/// 8 位输出使用 24 位打包 (`0xRRGGBB`), 16 位输出使用 48 位打包
/// (`0xRRRRGGGGBBBB`). 结果截断到 `[0, peak]`.
pub fn prepare_color<T: Sample>(rgb: u64, matrix: Matrix) -> ReferenceColor<T> {
    let p = T::PARAMS;
    let channel_max = p.peak as u64;
    let scale = p.peak as f32;

    let r = ((rgb >> (2 * p.bits)) & channel_max) as f32 / scale;
    let g = ((rgb >> p.bits) & channel_max) as f32 / scale;
    let b = (rgb & channel_max) as f32 / scale;

    let (kr, kb) = matrix.coefficients();
    let y = kr * r + (1.0 - kr - kb) * g + kb * b;

    let u = p.midpoint as i64 + round_half_up(p.chroma_scale * (b - y) / (1.0 - kb));
    let v = p.midpoint as i64 + round_half_up(p.chroma_scale * (r - y) / (1.0 - kr));
    let luma = p.luma_offset as i64 + round_half_up(p.luma_range * y);

    ReferenceColor {
        y: T::from_clamped(luma),
        u: T::from_clamped(u),
        v: T::from_clamped(v),
    }
}

/// 按输入顺序转换全部颜色
pub fn prepare_colors<T: Sample>(colors: &[u64], matrix: Matrix) -> Vec<ReferenceColor<T>> {
    colors.iter().map(|&c| prepare_color(c, matrix)).collect()
}

/// 调色板: 参考颜色列表与容差
///
/// Y 通道使用完整容差, U/V 通道使用 `tolerance / 2`.
/// 构造后只读, 可在多个线程间共享.
#[derive(Debug, Clone)]
pub struct Palette<T> {
    colors: Vec<ReferenceColor<T>>,
    tolerance: T,
    half_tolerance: T,
}

impl<T: Sample> Palette<T> {
    /// 创建调色板, 容差必须在 `[0, peak]` 之内
    pub fn new(colors: Vec<ReferenceColor<T>>, tolerance: i64) -> MaskResult<Self> {
        let peak = T::PARAMS.peak as i64;
        if !(0..=peak).contains(&tolerance) {
            return Err(MaskError::InvalidArgument(format!(
                "tolerance 必须在 0..{peak} 之间, 实际 {tolerance}"
            )));
        }
        Ok(Self {
            colors,
            tolerance: T::from_clamped(tolerance),
            half_tolerance: T::from_clamped(tolerance / 2),
        })
    }

    pub fn colors(&self) -> &[ReferenceColor<T>] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Y 通道容差
    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    /// U/V 通道容差
    pub fn half_tolerance(&self) -> T {
        self.half_tolerance
    }

    /// 单像素参考判定: Y, U, V 各自落入某个颜色的容差窗口
    ///
    /// 三个通道可以由不同的颜色满足.
    pub fn matches(&self, y: T, u: T, v: T) -> bool {
        let tol = self.tolerance.to_i32();
        let half = self.half_tolerance.to_i32();
        let near = |s: T, c: T, t: i32| (s.to_i32() - c.to_i32()).abs() < t;
        self.colors.iter().any(|c| near(y, c.y, tol))
            && self.colors.iter().any(|c| near(u, c.u, half))
            && self.colors.iter().any(|c| near(v, c.v, half))
    }
}
