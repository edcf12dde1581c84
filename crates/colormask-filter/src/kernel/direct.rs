//! 直接比较内核.
//!
//! 对每个像素与每个参考颜色求三个通道的绝对差, 严格小于容差时该通道通过.
//! 每个通道的判定以全 1 / 全 0 哨兵值表示, 先在颜色之间按位或,
//! 再把三个通道按位与. 结果与查表内核逐位一致, 因此尾列走查表不改变输出.

use std::ops::Range;

use colormask_core::{Sample, Subsampling};

use super::{Row, load, load_chroma};
use crate::color::Palette;

/// 标量参考实现, 处理 `columns` 范围内的列
pub(crate) fn scalar<T: Sample>(
    palette: &Palette<T>,
    layout: Subsampling,
    row: Row<'_, T>,
    columns: Range<usize>,
) {
    let tolerance = palette.tolerance();
    let half = palette.half_tolerance();
    for x in columns {
        let cx = layout.chroma_col(x);
        let (sy, su, sv) = (row.y[x], row.u[cx], row.v[cx]);
        let (mut acc_y, mut acc_u, mut acc_v) = (T::ZERO, T::ZERO, T::ZERO);
        for color in palette.colors() {
            acc_y = acc_y | T::mask(sy.abs_diff(color.y) < tolerance);
            acc_u = acc_u | T::mask(su.abs_diff(color.u) < half);
            acc_v = acc_v | T::mask(sv.abs_diff(color.v) < half);
        }
        row.dst[x] = acc_y & acc_u & acc_v;
    }
}

/// 以 `LANES` 个采样为一组处理 `[0, width)`, `width` 必须是 `LANES` 的整数倍
#[inline(always)]
pub(crate) fn blocks<T: Sample, const LANES: usize>(
    palette: &Palette<T>,
    layout: Subsampling,
    row: Row<'_, T>,
    width: usize,
) {
    debug_assert_eq!(width % LANES, 0);
    let tolerance = palette.tolerance();
    let half = palette.half_tolerance();

    for (i, out) in row.dst[..width].chunks_exact_mut(LANES).enumerate() {
        let x0 = i * LANES;
        let ys: [T; LANES] = load(row.y, x0);
        let us: [T; LANES] = load_chroma(row.u, x0, layout);
        let vs: [T; LANES] = load_chroma(row.v, x0, layout);

        let mut acc_y = [T::ZERO; LANES];
        let mut acc_u = [T::ZERO; LANES];
        let mut acc_v = [T::ZERO; LANES];
        for color in palette.colors() {
            for lane in 0..LANES {
                acc_y[lane] = acc_y[lane] | T::mask(ys[lane].abs_diff(color.y) < tolerance);
                acc_u[lane] = acc_u[lane] | T::mask(us[lane].abs_diff(color.u) < half);
                acc_v[lane] = acc_v[lane] | T::mask(vs[lane].abs_diff(color.v) < half);
            }
        }
        for (lane, dst) in out.iter_mut().enumerate() {
            *dst = acc_y[lane] & acc_u[lane] & acc_v[lane];
        }
    }
}
