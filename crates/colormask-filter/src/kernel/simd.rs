//! 向量内核入口.
//!
//! 在 x86_64 上每个入口都带 `#[target_feature]`, 分块内核内联进来后按
//! 对应指令集向量化. 其他架构上入口直接调用分块内核 (aarch64 的 NEON
//! 是基线特性, 无需额外启用).
//!
//! 调用者必须保证当前 CPU 支持入口对应的指令集.

use colormask_core::{Sample, Subsampling};

use super::{Row, direct, lookup};
use crate::color::Palette;
use crate::lut::ToleranceLut;

macro_rules! vector_entry {
    ($name:ident, $feature:literal, $module:ident, $state:ty) => {
        #[cfg(target_arch = "x86_64")]
        #[target_feature(enable = $feature)]
        pub(super) unsafe fn $name<T: Sample, const LANES: usize>(
            state: &$state,
            layout: Subsampling,
            row: Row<'_, T>,
            width: usize,
        ) {
            $module::blocks::<T, LANES>(state, layout, row, width)
        }

        #[cfg(not(target_arch = "x86_64"))]
        pub(super) unsafe fn $name<T: Sample, const LANES: usize>(
            state: &$state,
            layout: Subsampling,
            row: Row<'_, T>,
            width: usize,
        ) {
            $module::blocks::<T, LANES>(state, layout, row, width)
        }
    };
}

vector_entry!(direct_v128, "sse2", direct, Palette<T>);
vector_entry!(direct_v256, "avx2", direct, Palette<T>);
vector_entry!(direct_v512, "avx512f,avx512bw", direct, Palette<T>);
vector_entry!(lookup_v128, "sse2", lookup, ToleranceLut<T>);
vector_entry!(lookup_v256, "avx2", lookup, ToleranceLut<T>);
vector_entry!(lookup_v512, "avx512f,avx512bw", lookup, ToleranceLut<T>);
