//! 策略选择.
//!
//! 构造时一次性决定:
//! - 主体策略: 颜色数超过 `lut_threshold` 时查表, 否则直接比较;
//! - 内核变体: 标量或 128/256/512 位向量, 由 CPU 能力与显式覆盖共同决定;
//! - 尾列: 宽度不是通道数整数倍时, 最右侧 `width % lanes` 列总是走查表.

use std::fmt;
use std::str::FromStr;

use colormask_core::{CpuFeatures, MaskError, MaskResult, Sample};

/// 向量宽度覆盖 (配置项)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VectorWidth {
    /// 按 CPU 能力自动选择最宽的变体
    #[default]
    Auto,
    /// 标量参考实现
    Scalar,
    /// 128 位 (SSE2 / NEON)
    W128,
    /// 256 位 (AVX2)
    W256,
    /// 512 位 (AVX-512BW)
    W512,
}

impl FromStr for VectorWidth {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" | "-1" => Ok(Self::Auto),
            "c" | "scalar" | "0" => Ok(Self::Scalar),
            "sse2" | "neon" | "128" | "1" => Ok(Self::W128),
            "avx2" | "256" | "2" => Ok(Self::W256),
            "avx512" | "512" | "3" => Ok(Self::W512),
            other => Err(MaskError::InvalidArgument(format!(
                "opt 必须是 auto, c, sse2, avx2 或 avx512, 实际 {other}"
            ))),
        }
    }
}

/// 主体分类策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// 逐颜色直接比较, `O(像素 * 颜色)`, 精确
    Direct,
    /// 三通道查表, `O(像素)`, 近似
    Lookup,
}

/// 内核变体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    Scalar,
    V128,
    V256,
    V512,
}

impl KernelVariant {
    /// 结合 CPU 能力解析覆盖项, 请求的宽度不可用时报错
    pub fn resolve(requested: VectorWidth, features: CpuFeatures) -> MaskResult<Self> {
        let variant = match requested {
            VectorWidth::Auto => match features.widest_vector_bits() {
                Some(512) => Self::V512,
                Some(256) => Self::V256,
                Some(_) => Self::V128,
                None => Self::Scalar,
            },
            VectorWidth::Scalar => Self::Scalar,
            VectorWidth::W128 => {
                if !features.intersects(CpuFeatures::SSE2 | CpuFeatures::NEON) {
                    return Err(MaskError::Unsupported("opt=sse2 需要 SSE2 或 NEON".into()));
                }
                Self::V128
            }
            VectorWidth::W256 => {
                if !features.contains(CpuFeatures::AVX2) {
                    return Err(MaskError::Unsupported("opt=avx2 需要 AVX2".into()));
                }
                Self::V256
            }
            VectorWidth::W512 => {
                if !features.contains(CpuFeatures::AVX512BW) {
                    return Err(MaskError::Unsupported("opt=avx512 需要 AVX-512BW".into()));
                }
                Self::V512
            }
        };
        Ok(variant)
    }

    /// 向量位宽, 标量为 `None`
    pub const fn bits(self) -> Option<usize> {
        match self {
            Self::Scalar => None,
            Self::V128 => Some(128),
            Self::V256 => Some(256),
            Self::V512 => Some(512),
        }
    }

    /// 给定采样位深下一次处理的采样数
    pub const fn lanes(self, sample_bits: u32) -> usize {
        match self.bits() {
            Some(bits) => bits / sample_bits as usize,
            None => 1,
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bits() {
            Some(bits) => write!(f, "{bits} 位向量"),
            None => write!(f, "标量"),
        }
    }
}

/// 调度计划, 构造时确定, 逐帧不再重新推导
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    /// 主体策略
    pub strategy: Strategy,
    /// 内核变体
    pub variant: KernelVariant,
    /// 每次处理的采样数
    pub lanes: usize,
    /// 由主体内核处理的列数 (`lanes` 的整数倍)
    pub body_width: usize,
    /// 由查表处理的尾列数
    pub tail_width: usize,
}

impl DispatchPlan {
    /// 选择调度计划
    pub fn select<T: Sample>(
        num_colors: usize,
        lut_threshold: usize,
        width: usize,
        requested: VectorWidth,
        features: CpuFeatures,
    ) -> MaskResult<Self> {
        let strategy = if num_colors > lut_threshold {
            Strategy::Lookup
        } else {
            Strategy::Direct
        };
        let variant = KernelVariant::resolve(requested, features)?;
        let lanes = variant.lanes(T::PARAMS.bits);
        let tail_width = width % lanes;
        Ok(Self {
            strategy,
            variant,
            lanes,
            body_width: width - tail_width,
            tail_width,
        })
    }

    /// 是否需要构建查找表 (主体查表, 或存在尾列)
    pub fn needs_lut(&self) -> bool {
        self.strategy == Strategy::Lookup || self.tail_width > 0
    }
}
