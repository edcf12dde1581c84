//! 容差查找表.
//!
//! 对每个通道的每个可能采样值, 预先计算它是否落在任一参考颜色
//! 在该通道上的容差窗口内. 构建代价为 `O((peak + 1) * 颜色数)`, 只付一次.

use colormask_core::Sample;

use crate::color::Palette;

/// 三通道容差查找表
///
/// 表项为全 1 (匹配) 或 0. 每个表只记录"该通道上匹配了某个颜色",
/// 三个表的与运算可能由三个不同颜色分别满足.
#[derive(Debug, Clone)]
pub struct ToleranceLut<T> {
    y: Box<[T]>,
    u: Box<[T]>,
    v: Box<[T]>,
}

impl<T: Sample> ToleranceLut<T> {
    /// 由调色板构建查找表
    ///
    /// 边界与直接比较内核一致, 使用严格小于.
    pub fn build(palette: &Palette<T>) -> Self {
        let size = T::PARAMS.peak as usize + 1;
        let tolerance = palette.tolerance().to_i32();
        let half = palette.half_tolerance().to_i32();

        let mut y = vec![T::ZERO; size];
        let mut u = vec![T::ZERO; size];
        let mut v = vec![T::ZERO; size];

        for (i, ((ey, eu), ev)) in y.iter_mut().zip(&mut u).zip(&mut v).enumerate() {
            let value = i as i32;
            for color in palette.colors() {
                *ey = *ey | T::mask((value - color.y.to_i32()).abs() < tolerance);
                *eu = *eu | T::mask((value - color.u.to_i32()).abs() < half);
                *ev = *ev | T::mask((value - color.v.to_i32()).abs() < half);
            }
        }

        Self {
            y: y.into_boxed_slice(),
            u: u.into_boxed_slice(),
            v: v.into_boxed_slice(),
        }
    }

    /// 三通道查表后按位与
    #[inline(always)]
    pub fn lookup(&self, y: T, u: T, v: T) -> T {
        self.y[y.to_usize()] & self.u[u.to_usize()] & self.v[v.to_usize()]
    }

    /// Y 通道表
    pub fn luma(&self) -> &[T] {
        &self.y
    }

    /// U 通道表
    pub fn chroma_u(&self) -> &[T] {
        &self.u
    }

    /// V 通道表
    pub fn chroma_v(&self) -> &[T] {
        &self.v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ReferenceColor;

    fn brute_force<T: Sample>(table: &[T], centers: &[i32], tolerance: i32) {
        for (i, &entry) in table.iter().enumerate() {
            let expected = centers
                .iter()
                .any(|&c| (i as i32 - c).abs() < tolerance);
            assert_eq!(entry != T::ZERO, expected, "下标 {i}");
            assert!(entry == T::ZERO || entry == T::PEAK);
        }
    }

    #[test]
    fn test_lut_matches_strict_inequality_8bit() {
        let colors = vec![
            ReferenceColor::new(16u8, 128, 128),
            ReferenceColor::new(235, 40, 220),
            ReferenceColor::new(100, 250, 3),
        ];
        let palette = Palette::new(colors.clone(), 13).unwrap();
        let lut = ToleranceLut::build(&palette);
        assert_eq!(lut.luma().len(), 256);
        let ys: Vec<i32> = colors.iter().map(|c| c.y as i32).collect();
        let us: Vec<i32> = colors.iter().map(|c| c.u as i32).collect();
        let vs: Vec<i32> = colors.iter().map(|c| c.v as i32).collect();
        brute_force(lut.luma(), &ys, 13);
        brute_force(lut.chroma_u(), &us, 6);
        brute_force(lut.chroma_v(), &vs, 6);
    }

    #[test]
    fn test_lut_matches_strict_inequality_16bit() {
        let colors = vec![ReferenceColor::new(4096u16, 32768, 65535)];
        let palette = Palette::new(colors, 2570).unwrap();
        let lut = ToleranceLut::build(&palette);
        assert_eq!(lut.luma().len(), 65536);
        brute_force(lut.luma(), &[4096], 2570);
        brute_force(lut.chroma_u(), &[32768], 1285);
        brute_force(lut.chroma_v(), &[65535], 1285);
    }

    #[test]
    fn test_lut_boundary() {
        let palette = Palette::new(vec![ReferenceColor::new(128u8, 128, 128)], 10).unwrap();
        let lut = ToleranceLut::build(&palette);
        assert_eq!(lut.luma()[137], 255);
        assert_eq!(lut.luma()[138], 0);
        assert_eq!(lut.luma()[118], 0);
        assert_eq!(lut.luma()[119], 255);
        assert_eq!(lut.chroma_u()[132], 255);
        assert_eq!(lut.chroma_u()[133], 0);
        assert_eq!(lut.lookup(128, 128, 128), 255);
        assert_eq!(lut.lookup(139, 128, 128), 0);
    }

    #[test]
    fn test_zero_tolerance_and_empty_palette() {
        let palette = Palette::new(vec![ReferenceColor::new(50u8, 50, 50)], 0).unwrap();
        let lut = ToleranceLut::build(&palette);
        assert!(lut.luma().iter().all(|&e| e == 0));

        let empty = Palette::<u8>::new(Vec::new(), 10).unwrap();
        let lut = ToleranceLut::build(&empty);
        assert_eq!(lut.lookup(0, 0, 0), 0);
    }
}
