//! 采样值类型与位深常量.
//!
//! 每个平面的像素分量都是无符号整数, 取值范围 `[0, peak]`,
//! 其中 `peak = 2^bits - 1`. 目前支持 8 位 (`u8`) 与 16 位 (`u16`).

use std::fmt::Debug;
use std::ops::{BitAnd, BitOr};

/// 位深相关的常量集合
///
/// 8 位与 16 位的常量按比例缩放, 例如 8 位下色度中点为 128,
/// 色度幅度为 112, 亮度偏移为 16, 亮度范围为 219.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthParams {
    /// 位深
    pub bits: u32,
    /// 最大采样值 (所有位为 1)
    pub peak: u32,
    /// 色度中点, 也是灰度填充值
    pub midpoint: u32,
    /// 色度幅度 (Umax = Vmax)
    pub chroma_scale: f32,
    /// 亮度偏移 (有限范围下限)
    pub luma_offset: u32,
    /// 亮度范围
    pub luma_range: f32,
    /// 未指定时的默认容差
    pub default_tolerance: u32,
}

impl DepthParams {
    /// 8 位常量
    pub const DEPTH_8: Self = Self {
        bits: 8,
        peak: 255,
        midpoint: 128,
        chroma_scale: 112.0,
        luma_offset: 16,
        luma_range: 219.0,
        default_tolerance: 10,
    };

    /// 16 位常量
    pub const DEPTH_16: Self = Self {
        bits: 16,
        peak: 65535,
        midpoint: 32768,
        chroma_scale: 28672.0,
        luma_offset: 4096,
        luma_range: 56064.0,
        default_tolerance: 2570,
    };

    /// 根据位深查找常量, 只支持 8 与 16 位
    pub const fn for_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::DEPTH_8),
            16 => Some(Self::DEPTH_16),
            _ => None,
        }
    }

    /// 打包 RGB 常量的总位数 (8 位为 24, 16 位为 48)
    pub const fn packed_rgb_bits(&self) -> u32 {
        self.bits * 3
    }
}

/// 采样值类型
///
/// 分类内核对 `u8` 与 `u16` 泛型实现, 位深相关常量通过 [`DepthParams`] 提供.
pub trait Sample:
    Copy
    + Default
    + Eq
    + Ord
    + Debug
    + Send
    + Sync
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + 'static
{
    /// 位深常量
    const PARAMS: DepthParams;
    /// 零值
    const ZERO: Self;
    /// 最大值 (所有位为 1)
    const PEAK: Self;

    /// 作为查找表下标
    fn to_usize(self) -> usize;

    /// 转换为有符号中间值
    fn to_i32(self) -> i32;

    /// 截断到 `[0, peak]` 后转换
    fn from_clamped(value: i64) -> Self;

    /// 无符号绝对差 (`max - min`), 与向量内核的求差方式一致
    fn abs_diff(self, other: Self) -> Self;

    /// 布尔值转换为全 1 / 全 0 哨兵值
    #[inline(always)]
    fn mask(flag: bool) -> Self {
        if flag { Self::PEAK } else { Self::ZERO }
    }
}

macro_rules! impl_sample {
    ($ty:ty, $params:expr) => {
        impl Sample for $ty {
            const PARAMS: DepthParams = $params;
            const ZERO: Self = 0;
            const PEAK: Self = <$ty>::MAX;

            #[inline(always)]
            fn to_usize(self) -> usize {
                self as usize
            }

            #[inline(always)]
            fn to_i32(self) -> i32 {
                self as i32
            }

            #[inline(always)]
            fn from_clamped(value: i64) -> Self {
                value.clamp(0, <$ty>::MAX as i64) as $ty
            }

            #[inline(always)]
            fn abs_diff(self, other: Self) -> Self {
                self.max(other) - self.min(other)
            }
        }
    };
}

impl_sample!(u8, DepthParams::DEPTH_8);
impl_sample!(u16, DepthParams::DEPTH_16);
