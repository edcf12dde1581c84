//! 视频帧 (Frame).
//!
//! 对标 FFmpeg 的 `AVFrame`, 表示宿主提供的原始视频数据.
//! 采样按位深类型存放 (`u8` 或 `u16`), `linesize` 以采样为单位.

use crate::error::{MaskError, MaskResult};
use crate::pixel_format::PixelFormat;
use crate::plane::{PlaneView, PlaneViewMut, YuvPlanes};
use crate::sample::Sample;

/// 表示"未定义"的时间戳值
pub const NOPTS_VALUE: i64 = i64::MIN;

/// 新分配帧的行跨度对齐 (采样数)
const LINESIZE_ALIGN: usize = 32;

/// 视频帧
///
/// 包含原始像素数据, 支持多平面存储.
/// 例如 YUV420P 格式有 3 个平面: Y, U, V.
#[derive(Debug, Clone)]
pub struct VideoFrame<T> {
    /// 各平面的采样数据
    pub data: Vec<Vec<T>>,
    /// 各平面每行的采样数 (linesize / stride)
    pub linesize: Vec<usize>,
    /// 宽度 (像素)
    pub width: u32,
    /// 高度 (像素)
    pub height: u32,
    /// 像素格式
    pub pixel_format: PixelFormat,
    /// 显示时间戳 (PTS)
    pub pts: i64,
    /// 帧时长
    pub duration: i64,
}

impl<T: Sample> VideoFrame<T> {
    /// 创建空的视频帧 (不分配平面数据)
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        let plane_count = pixel_format.plane_count() as usize;
        Self {
            data: vec![Vec::new(); plane_count],
            linesize: vec![0; plane_count],
            width,
            height,
            pixel_format,
            pts: NOPTS_VALUE,
            duration: 0,
        }
    }

    /// 分配全零视频帧, 行跨度按 32 采样对齐
    pub fn alloc(width: u32, height: u32, pixel_format: PixelFormat) -> MaskResult<Self> {
        if pixel_format.bits_per_component() != T::PARAMS.bits {
            return Err(MaskError::InvalidArgument(format!(
                "像素格式 {pixel_format} 与 {} 位采样类型不匹配",
                T::PARAMS.bits
            )));
        }
        let mut frame = Self::new(width, height, pixel_format);
        for plane in 0..frame.data.len() {
            let w = pixel_format.plane_width(plane, width).unwrap_or(0);
            let h = pixel_format.plane_height(plane, height).unwrap_or(0);
            let stride = w.next_multiple_of(LINESIZE_ALIGN);
            frame.data[plane] = vec![T::ZERO; stride * h];
            frame.linesize[plane] = stride;
        }
        Ok(frame)
    }

    /// 从紧密排列的平面数据创建帧 (linesize = 平面宽度)
    pub fn from_planes(
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
        planes: Vec<Vec<T>>,
    ) -> MaskResult<Self> {
        if planes.len() != pixel_format.plane_count() as usize {
            return Err(MaskError::InvalidArgument(format!(
                "{pixel_format} 需要 {} 个平面, 实际 {}",
                pixel_format.plane_count(),
                planes.len()
            )));
        }
        let linesize = (0..planes.len())
            .map(|p| pixel_format.plane_width(p, width).unwrap_or(0))
            .collect();
        let frame = Self {
            data: planes,
            linesize,
            width,
            height,
            pixel_format,
            pts: NOPTS_VALUE,
            duration: 0,
        };
        // 校验每个平面的长度
        for plane in 0..frame.data.len() {
            frame.plane(plane)?;
        }
        Ok(frame)
    }

    /// 指定平面的只读视图
    pub fn plane(&self, plane: usize) -> MaskResult<PlaneView<'_, T>> {
        let (width, height) = self.plane_dims(plane)?;
        PlaneView::new(&self.data[plane], self.linesize[plane], width, height)
    }

    /// Y/U/V 三个平面的只读视图
    pub fn yuv_planes(&self) -> MaskResult<YuvPlanes<'_, T>> {
        if !self.pixel_format.is_planar_yuv() {
            return Err(MaskError::Unsupported(format!(
                "{} 不是 YUV 平面格式",
                self.pixel_format
            )));
        }
        Ok(YuvPlanes {
            y: self.plane(0)?,
            u: self.plane(1)?,
            v: self.plane(2)?,
        })
    }

    /// 全部平面的可写视图, 按平面顺序返回
    pub fn planes_mut(&mut self) -> MaskResult<Vec<PlaneViewMut<'_, T>>> {
        let dims = (0..self.data.len())
            .map(|p| self.plane_dims(p))
            .collect::<MaskResult<Vec<_>>>()?;
        self.data
            .iter_mut()
            .zip(&self.linesize)
            .zip(dims)
            .map(|((data, &stride), (w, h))| PlaneViewMut::new(data, stride, w, h))
            .collect()
    }

    fn plane_dims(&self, plane: usize) -> MaskResult<(usize, usize)> {
        let width = self.pixel_format.plane_width(plane, self.width);
        let height = self.pixel_format.plane_height(plane, self.height);
        match (width, height) {
            (Some(w), Some(h)) if plane < self.data.len() => Ok((w, h)),
            _ => Err(MaskError::InvalidArgument(format!(
                "{} 没有平面 {plane}",
                self.pixel_format
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_aligned_linesize() {
        let frame = VideoFrame::<u8>::alloc(17, 9, PixelFormat::Yuv420p).unwrap();
        assert_eq!(frame.linesize, vec![32, 32, 32]);
        assert_eq!(frame.data[0].len(), 32 * 9);
        assert_eq!(frame.data[1].len(), 32 * 5);
        let u = frame.plane(1).unwrap();
        assert_eq!((u.width(), u.height()), (9, 5));
    }

    #[test]
    fn test_alloc_depth_mismatch() {
        assert!(VideoFrame::<u16>::alloc(4, 4, PixelFormat::Yuv444p).is_err());
        assert!(VideoFrame::<u8>::alloc(4, 4, PixelFormat::Yuv420p10le).is_err());
    }

    #[test]
    fn test_from_planes_validates_length() {
        let ok = VideoFrame::from_planes(
            4,
            2,
            PixelFormat::Yuv422p,
            vec![vec![0u8; 8], vec![0u8; 4], vec![0u8; 4]],
        );
        assert!(ok.is_ok());
        let short = VideoFrame::from_planes(
            4,
            2,
            PixelFormat::Yuv422p,
            vec![vec![0u8; 8], vec![0u8; 3], vec![0u8; 4]],
        );
        assert!(short.is_err());
    }

    #[test]
    fn test_planes_mut_and_gray_yuv_error() {
        let mut frame = VideoFrame::<u16>::alloc(4, 4, PixelFormat::Gray16le).unwrap();
        assert!(frame.yuv_planes().is_err());
        let mut planes = frame.planes_mut().unwrap();
        assert_eq!(planes.len(), 1);
        planes[0].fill(7);
        assert_eq!(frame.data[0][3], 7);
    }
}
