//! 查表内核.
//!
//! 每个像素三次查表后按位与, 与颜色数无关. 每个表只记录"该通道命中了某个
//! 颜色", 所以三个通道可以由三个不同的颜色分别满足, 结果可能比直接比较宽松.

use std::ops::Range;

use colormask_core::{Sample, Subsampling};

use super::{Row, load, load_chroma};
use crate::lut::ToleranceLut;

/// 标量实现, 处理 `columns` 范围内的列 (也用于尾列)
pub(crate) fn scalar<T: Sample>(
    lut: &ToleranceLut<T>,
    layout: Subsampling,
    row: Row<'_, T>,
    columns: Range<usize>,
) {
    for x in columns {
        let cx = layout.chroma_col(x);
        row.dst[x] = lut.lookup(row.y[x], row.u[cx], row.v[cx]);
    }
}

/// 以 `LANES` 个采样为一组处理 `[0, width)`, `width` 必须是 `LANES` 的整数倍
#[inline(always)]
pub(crate) fn blocks<T: Sample, const LANES: usize>(
    lut: &ToleranceLut<T>,
    layout: Subsampling,
    row: Row<'_, T>,
    width: usize,
) {
    debug_assert_eq!(width % LANES, 0);
    let (ly, lu, lv) = (lut.luma(), lut.chroma_u(), lut.chroma_v());

    for (i, out) in row.dst[..width].chunks_exact_mut(LANES).enumerate() {
        let x0 = i * LANES;
        let ys: [T; LANES] = load(row.y, x0);
        let us: [T; LANES] = load_chroma(row.u, x0, layout);
        let vs: [T; LANES] = load_chroma(row.v, x0, layout);
        for lane in 0..LANES {
            out[lane] =
                ly[ys[lane].to_usize()] & lu[us[lane].to_usize()] & lv[vs[lane].to_usize()];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Palette, ReferenceColor};

    #[test]
    fn test_lookup_accepts_cross_color_channels() {
        let palette = Palette::new(
            vec![
                ReferenceColor::new(50u8, 50, 50),
                ReferenceColor::new(200, 200, 200),
            ],
            10,
        )
        .unwrap();
        let lut = ToleranceLut::build(&palette);
        let ys = [50u8, 50, 120];
        let us = [50u8, 200, 200];
        let vs = [50u8, 200, 200];
        let mut dst = [0u8; 3];
        let row = Row {
            y: &ys,
            u: &us,
            v: &vs,
            dst: &mut dst,
        };
        scalar(&lut, Subsampling::Yuv444, row, 0..3);
        assert_eq!(dst, [255, 255, 0]);
    }

    #[test]
    fn test_blocks_match_scalar_16bit() {
        let palette = Palette::new(vec![ReferenceColor::new(30000u16, 32768, 32768)], 2570).unwrap();
        let lut = ToleranceLut::build(&palette);
        let ys: Vec<u16> = (0..16).map(|i| 27000 + i * 400).collect();
        let us: Vec<u16> = (0..8).map(|i| 32000 + i * 200).collect();
        let vs = vec![32768u16; 8];

        let mut expected = vec![0u16; 16];
        scalar(
            &lut,
            Subsampling::Yuv422,
            Row {
                y: &ys,
                u: &us,
                v: &vs,
                dst: &mut expected,
            },
            0..16,
        );
        let mut got = vec![0u16; 16];
        blocks::<u16, 8>(
            &lut,
            Subsampling::Yuv422,
            Row {
                y: &ys,
                u: &us,
                v: &vs,
                dst: &mut got,
            },
            16,
        );
        assert_eq!(got, expected);
        assert!(got.iter().any(|&m| m == u16::MAX));
        assert!(got.iter().any(|&m| m == 0));
    }
}
