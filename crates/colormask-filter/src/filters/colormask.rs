//! 颜色遮罩视频滤镜.
//!
//! 把 [`ColorMask`] 包装为 [`Filter`]: 校验输入帧, 分配输出帧,
//! 亮度平面写入遮罩, 色度平面按配置复制或填充中灰.

use colormask_core::{MaskError, MaskResult, Sample, VideoFrame};

use crate::Filter;
use crate::mask::{ColorMask, MaskConfig, VideoInfo};

/// 颜色遮罩滤镜
pub struct ColorMaskFilter<T> {
    /// 分类器
    mask: ColorMask<T>,
    /// 输出帧缓冲
    output: Option<VideoFrame<T>>,
}

impl<T: Sample> ColorMaskFilter<T> {
    /// 创建颜色遮罩滤镜, 配置错误在此报告
    pub fn new(config: &MaskConfig, info: VideoInfo) -> MaskResult<Self> {
        Ok(Self::from_mask(ColorMask::new(config, info)?))
    }

    /// 由已构造的分类器创建
    pub fn from_mask(mask: ColorMask<T>) -> Self {
        Self { mask, output: None }
    }

    /// 内部分类器
    pub fn mask(&self) -> &ColorMask<T> {
        &self.mask
    }

    fn check_frame(&self, frame: &VideoFrame<T>) -> MaskResult<()> {
        let info = self.mask.info();
        if frame.width != info.width || frame.height != info.height {
            return Err(MaskError::InvalidArgument(format!(
                "colormask: 帧尺寸 {}x{} 与配置 {}x{} 不一致",
                frame.width, frame.height, info.width, info.height,
            )));
        }
        if frame.pixel_format != info.format {
            return Err(MaskError::InvalidArgument(format!(
                "colormask: 帧格式 {} 与配置 {} 不一致",
                frame.pixel_format, info.format,
            )));
        }
        Ok(())
    }

    /// 处理一帧
    fn mask_frame(&self, frame: &VideoFrame<T>) -> MaskResult<VideoFrame<T>> {
        self.check_frame(frame)?;
        let src = frame.yuv_planes()?;

        let mut out = VideoFrame::alloc(frame.width, frame.height, self.mask.output_format())?;
        out.pts = frame.pts;
        out.duration = frame.duration;

        {
            let mut planes = out.planes_mut()?.into_iter();
            let luma = planes.next().ok_or_else(|| {
                MaskError::InvalidArgument("colormask: 输出帧没有亮度平面".into())
            })?;
            self.mask.classify(&src, luma);

            if !self.mask.only_luma() {
                for (mut dst, chroma) in planes.zip([&src.u, &src.v]) {
                    self.mask.write_chroma(chroma, &mut dst);
                }
            }
        }
        Ok(out)
    }
}

impl<T: Sample> Filter<T> for ColorMaskFilter<T> {
    fn name(&self) -> &str {
        "colormask"
    }

    fn send_frame(&mut self, frame: &VideoFrame<T>) -> MaskResult<()> {
        let result = self.mask_frame(frame)?;
        self.output = Some(result);
        Ok(())
    }

    fn receive_frame(&mut self) -> MaskResult<VideoFrame<T>> {
        self.output.take().ok_or(MaskError::NeedMoreData)
    }

    fn flush(&mut self) -> MaskResult<()> {
        self.output = None;
        Ok(())
    }
}
