//! 平面视图.
//!
//! 平面视图描述单个颜色平面的一块内存: 数据、行跨度 (pitch)、宽度、高度.
//! pitch 以采样为单位, 可以大于宽度 (行尾对齐填充).
//! 视图按值传递, 访问范围完全由几何尺寸决定.

use crate::error::{MaskError, MaskResult};
use crate::subsampling::Subsampling;

/// 容纳 `height` 行所需的最少采样数 (最后一行不要求填充)
const fn required_len(pitch: usize, width: usize, height: usize) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        pitch * (height - 1) + width
    }
}

fn check_geometry(len: usize, pitch: usize, width: usize, height: usize) -> MaskResult<()> {
    if pitch < width {
        return Err(MaskError::InvalidArgument(format!(
            "平面 pitch ({pitch}) 小于宽度 ({width})"
        )));
    }
    let required = required_len(pitch, width, height);
    if len < required {
        return Err(MaskError::InvalidArgument(format!(
            "平面数据不足: {len} < {required} ({width}x{height}, pitch={pitch})"
        )));
    }
    Ok(())
}

/// 只读平面视图
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a, T> {
    data: &'a [T],
    pitch: usize,
    width: usize,
    height: usize,
}

impl<'a, T> PlaneView<'a, T> {
    /// 创建只读视图, 数据长度不足时报错
    pub fn new(data: &'a [T], pitch: usize, width: usize, height: usize) -> MaskResult<Self> {
        check_geometry(data.len(), pitch, width, height)?;
        Ok(Self {
            data,
            pitch,
            width,
            height,
        })
    }

    /// 宽度 (采样数)
    pub fn width(&self) -> usize {
        self.width
    }

    /// 高度 (行数)
    pub fn height(&self) -> usize {
        self.height
    }

    /// 行跨度 (采样数)
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// 第 `y` 行的有效采样 (不含行尾填充)
    #[inline(always)]
    pub fn row(&self, y: usize) -> &'a [T] {
        let start = y * self.pitch;
        &self.data[start..start + self.width]
    }

    /// 从第 `start` 行开始的 `count` 行子视图
    pub fn rows(&self, start: usize, count: usize) -> Self {
        assert!(
            start + count <= self.height,
            "行范围越界: {start}+{count} > {}",
            self.height
        );
        let begin = (start * self.pitch).min(self.data.len());
        Self {
            data: &self.data[begin..],
            height: count,
            ..*self
        }
    }
}

/// 可写平面视图
#[derive(Debug)]
pub struct PlaneViewMut<'a, T> {
    data: &'a mut [T],
    pitch: usize,
    width: usize,
    height: usize,
}

impl<'a, T> PlaneViewMut<'a, T> {
    /// 创建可写视图, 数据长度不足时报错
    pub fn new(data: &'a mut [T], pitch: usize, width: usize, height: usize) -> MaskResult<Self> {
        check_geometry(data.len(), pitch, width, height)?;
        Ok(Self {
            data,
            pitch,
            width,
            height,
        })
    }

    /// 宽度 (采样数)
    pub fn width(&self) -> usize {
        self.width
    }

    /// 高度 (行数)
    pub fn height(&self) -> usize {
        self.height
    }

    /// 行跨度 (采样数)
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// 第 `y` 行的有效采样
    #[inline(always)]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.pitch;
        &self.data[start..start + self.width]
    }

    /// 第 `y` 行的有效采样 (可写)
    #[inline(always)]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.pitch;
        &mut self.data[start..start + self.width]
    }

    /// 在第 `at` 行处一分为二, 两部分互不重叠
    pub fn split_rows(self, at: usize) -> (Self, Self) {
        let Self {
            data,
            pitch,
            width,
            height,
        } = self;
        assert!(at <= height, "分割行越界: {at} > {height}");
        let mid = (at * pitch).min(data.len());
        let (top, bottom) = data.split_at_mut(mid);
        (
            Self {
                data: top,
                pitch,
                width,
                height: at,
            },
            Self {
                data: bottom,
                pitch,
                width,
                height: height - at,
            },
        )
    }
}

impl<T: Copy> PlaneViewMut<'_, T> {
    /// 用常量填充全部有效采样
    pub fn fill(&mut self, value: T) {
        for y in 0..self.height {
            self.row_mut(y).fill(value);
        }
    }

    /// 逐行复制另一个同尺寸平面
    pub fn copy_from(&mut self, src: &PlaneView<'_, T>) {
        let rows = self.height.min(src.height());
        let cols = self.width.min(src.width());
        for y in 0..rows {
            self.row_mut(y)[..cols].copy_from_slice(&src.row(y)[..cols]);
        }
    }
}

/// 一帧的 Y/U/V 三个只读平面
#[derive(Debug, Clone, Copy)]
pub struct YuvPlanes<'a, T> {
    /// 亮度平面
    pub y: PlaneView<'a, T>,
    /// U (Cb) 平面
    pub u: PlaneView<'a, T>,
    /// V (Cr) 平面
    pub v: PlaneView<'a, T>,
}

impl<'a, T> YuvPlanes<'a, T> {
    /// 取亮度行 `[start, start + count)` 及其对应的色度行
    ///
    /// `start` 必须是垂直子采样因子的整数倍, 否则色度行无法对齐.
    pub fn rows(&self, start: usize, count: usize, layout: Subsampling) -> Self {
        debug_assert_eq!(start % layout.vertical(), 0);
        let c_start = layout.chroma_row(start);
        let c_end = layout
            .chroma_height(start + count)
            .min(self.u.height())
            .max(c_start);
        Self {
            y: self.y.rows(start, count),
            u: self.u.rows(c_start, c_end - c_start),
            v: self.v.rows(c_start, c_end - c_start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_rejects_short_buffer() {
        let data = vec![0u8; 10];
        assert!(PlaneView::new(&data, 4, 4, 3).is_err());
        // 最后一行不要求填充: 4*2 + 2 = 10
        assert!(PlaneView::new(&data, 4, 2, 3).is_ok());
        assert!(PlaneView::new(&data, 2, 4, 1).is_err());
    }

    #[test]
    fn test_view_row_skips_padding() {
        let data: Vec<u8> = (0..12).collect();
        let view = PlaneView::new(&data, 6, 4, 2).unwrap();
        assert_eq!(view.row(0), &[0, 1, 2, 3]);
        assert_eq!(view.row(1), &[6, 7, 8, 9]);
        let sub = view.rows(1, 1);
        assert_eq!(sub.height(), 1);
        assert_eq!(sub.row(0), &[6, 7, 8, 9]);
    }

    #[test]
    fn test_split_rows_disjoint() {
        let mut data = vec![0u16; 5 * 4];
        let view = PlaneViewMut::new(&mut data, 5, 3, 4).unwrap();
        let (mut top, mut bottom) = view.split_rows(1);
        assert_eq!(top.height(), 1);
        assert_eq!(bottom.height(), 3);
        top.fill(1);
        bottom.fill(2);
        assert_eq!(&data[0..5], &[1, 1, 1, 0, 0]);
        assert_eq!(&data[5..8], &[2, 2, 2]);
        assert_eq!(&data[15..18], &[2, 2, 2]);
    }

    #[test]
    fn test_copy_from() {
        let src_data: Vec<u8> = (0..8).collect();
        let src = PlaneView::new(&src_data, 4, 4, 2).unwrap();
        let mut dst_data = vec![0u8; 12];
        let mut dst = PlaneViewMut::new(&mut dst_data, 6, 4, 2).unwrap();
        dst.copy_from(&src);
        assert_eq!(dst.row(1), &[4, 5, 6, 7]);
        assert_eq!(dst_data[4], 0);
    }

    #[test]
    fn test_yuv_rows_maps_chroma() {
        let y = vec![0u8; 8 * 8];
        let c = vec![0u8; 4 * 4];
        let planes = YuvPlanes {
            y: PlaneView::new(&y, 8, 8, 8).unwrap(),
            u: PlaneView::new(&c, 4, 4, 4).unwrap(),
            v: PlaneView::new(&c, 4, 4, 4).unwrap(),
        };
        let bottom = planes.rows(4, 4, Subsampling::Yuv420);
        assert_eq!(bottom.y.height(), 4);
        assert_eq!(bottom.u.height(), 2);
        let top = planes.rows(0, 4, Subsampling::Yuv422);
        assert_eq!(top.u.height(), 4);
    }
}
