//! 色度子采样布局与色度寻址.

use std::fmt;

use crate::pixel_format::PixelFormat;

/// 色度子采样布局
///
/// 由输入格式决定, 在滤镜实例生命周期内固定不变.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsampling {
    /// 4:4:4, 色度与亮度 1:1
    Yuv444,
    /// 4:2:2, 色度仅水平减半
    Yuv422,
    /// 4:2:0, 色度水平垂直均减半
    Yuv420,
}

impl Subsampling {
    /// 从像素格式推导, 非三平面 YUV 格式返回 `None`
    pub fn from_format(format: PixelFormat) -> Option<Self> {
        if !format.is_planar_yuv() {
            return None;
        }
        match format.chroma_subsampling() {
            (0, 0) => Some(Self::Yuv444),
            (1, 0) => Some(Self::Yuv422),
            (1, 1) => Some(Self::Yuv420),
            _ => None,
        }
    }

    /// 水平子采样因子
    #[inline(always)]
    pub const fn horizontal(self) -> usize {
        match self {
            Self::Yuv444 => 1,
            Self::Yuv422 | Self::Yuv420 => 2,
        }
    }

    /// 垂直子采样因子
    #[inline(always)]
    pub const fn vertical(self) -> usize {
        match self {
            Self::Yuv444 | Self::Yuv422 => 1,
            Self::Yuv420 => 2,
        }
    }

    /// 亮度列对应的色度列
    #[inline(always)]
    pub const fn chroma_col(self, luma_col: usize) -> usize {
        luma_col / self.horizontal()
    }

    /// 亮度行对应的色度行
    ///
    /// 4:2:0 下色度行每两个亮度行前进一次.
    #[inline(always)]
    pub const fn chroma_row(self, luma_row: usize) -> usize {
        luma_row / self.vertical()
    }

    /// 色度平面宽度 (向上取整)
    pub const fn chroma_width(self, luma_width: usize) -> usize {
        luma_width.div_ceil(self.horizontal())
    }

    /// 色度平面高度 (向上取整)
    pub const fn chroma_height(self, luma_height: usize) -> usize {
        luma_height.div_ceil(self.vertical())
    }
}

impl fmt::Display for Subsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Yuv444 => "4:4:4",
            Self::Yuv422 => "4:2:2",
            Self::Yuv420 => "4:2:0",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_format() {
        assert_eq!(
            Subsampling::from_format(PixelFormat::Yuv420p),
            Some(Subsampling::Yuv420)
        );
        assert_eq!(
            Subsampling::from_format(PixelFormat::Yuv422p16le),
            Some(Subsampling::Yuv422)
        );
        assert_eq!(
            Subsampling::from_format(PixelFormat::Yuv444p),
            Some(Subsampling::Yuv444)
        );
        assert_eq!(Subsampling::from_format(PixelFormat::Gray8), None);
        assert_eq!(Subsampling::from_format(PixelFormat::Rgb24), None);
    }

    #[test]
    fn test_chroma_addressing() {
        // 4:4:4: 列与行均一一对应
        assert_eq!(Subsampling::Yuv444.chroma_col(7), 7);
        assert_eq!(Subsampling::Yuv444.chroma_row(7), 7);
        // 4:2:2: 列减半, 行不变
        assert_eq!(Subsampling::Yuv422.chroma_col(7), 3);
        assert_eq!(Subsampling::Yuv422.chroma_row(7), 7);
        // 4:2:0: 列与行均减半
        assert_eq!(Subsampling::Yuv420.chroma_col(7), 3);
        assert_eq!(Subsampling::Yuv420.chroma_row(7), 3);
        assert_eq!(Subsampling::Yuv420.chroma_row(8), 4);
    }

    #[test]
    fn test_chroma_dimensions() {
        assert_eq!(Subsampling::Yuv420.chroma_width(17), 9);
        assert_eq!(Subsampling::Yuv420.chroma_height(10), 5);
        assert_eq!(Subsampling::Yuv422.chroma_height(10), 10);
        assert_eq!(Subsampling::Yuv444.chroma_width(17), 17);
    }
}
