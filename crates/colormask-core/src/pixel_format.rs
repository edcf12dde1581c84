//! 像素格式定义.
//!
//! 对标 FFmpeg 的 `AVPixelFormat`, 只保留颜色遮罩滤镜会遇到的格式.

use std::fmt;
use std::str::FromStr;

use crate::error::MaskError;

/// 像素格式
///
/// 命名规则: 颜色空间 + 位深 + 排列方式 (P=Planar, LE=小端).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// 未指定
    None,

    // ========================
    // YUV 平面格式 (Planar)
    // ========================
    /// YUV 4:2:0 平面格式, 8 位
    Yuv420p,
    /// YUV 4:2:2 平面格式, 8 位
    Yuv422p,
    /// YUV 4:4:4 平面格式, 8 位
    Yuv444p,
    /// YUV 4:2:0 平面格式, 10 位小端
    Yuv420p10le,
    /// YUV 4:2:0 平面格式, 16 位小端
    Yuv420p16le,
    /// YUV 4:2:2 平面格式, 16 位小端
    Yuv422p16le,
    /// YUV 4:4:4 平面格式, 16 位小端
    Yuv444p16le,

    // ========================
    // 灰度格式
    // ========================
    /// 灰度 8 位
    Gray8,
    /// 灰度 16 位小端
    Gray16le,

    // ========================
    // RGB 打包格式 (Packed)
    // ========================
    /// RGB 各 8 位, 打包
    Rgb24,
}

impl PixelFormat {
    /// 单个分量的位深
    pub const fn bits_per_component(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Yuv420p | Self::Yuv422p | Self::Yuv444p | Self::Gray8 | Self::Rgb24 => 8,
            Self::Yuv420p10le => 10,
            Self::Yuv420p16le | Self::Yuv422p16le | Self::Yuv444p16le | Self::Gray16le => 16,
        }
    }

    /// 获取色度子采样 (水平, 垂直)
    ///
    /// 返回 (log2 水平子采样, log2 垂直子采样).
    /// 例如 YUV420 返回 (1, 1), 表示色度分辨率为亮度的 1/2 x 1/2.
    pub const fn chroma_subsampling(&self) -> (u32, u32) {
        match self {
            Self::Yuv420p | Self::Yuv420p10le | Self::Yuv420p16le => (1, 1),
            Self::Yuv422p | Self::Yuv422p16le => (1, 0),
            _ => (0, 0),
        }
    }

    /// 是否为 Y/U/V 三平面格式
    pub const fn is_planar_yuv(&self) -> bool {
        matches!(
            self,
            Self::Yuv420p
                | Self::Yuv422p
                | Self::Yuv444p
                | Self::Yuv420p10le
                | Self::Yuv420p16le
                | Self::Yuv422p16le
                | Self::Yuv444p16le
        )
    }

    /// 平面数量
    pub const fn plane_count(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Gray8 | Self::Gray16le | Self::Rgb24 => 1,
            _ => 3,
        }
    }

    /// 指定平面每行的采样数 (不含行尾填充)
    ///
    /// 色度平面宽度向上取整, 奇数宽度的最后一列也有对应的色度采样.
    pub fn plane_width(&self, plane: usize, width: u32) -> Option<usize> {
        if plane >= self.plane_count() as usize {
            return None;
        }
        let w = width as usize;
        if *self == Self::Rgb24 {
            return Some(w * 3);
        }
        let (sub_h, _) = self.chroma_subsampling();
        Some(if plane == 0 { w } else { w.div_ceil(1 << sub_h) })
    }

    /// 指定平面的行数
    pub fn plane_height(&self, plane: usize, height: u32) -> Option<usize> {
        if plane >= self.plane_count() as usize {
            return None;
        }
        let h = height as usize;
        let (_, sub_v) = self.chroma_subsampling();
        Some(if plane == 0 { h } else { h.div_ceil(1 << sub_v) })
    }

    /// 同位深的单平面灰度格式 (仅输出亮度时使用)
    pub const fn luma_only(&self) -> Self {
        match self.bits_per_component() {
            8 => Self::Gray8,
            16 => Self::Gray16le,
            _ => Self::None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Yuv420p => "yuv420p",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Yuv420p10le => "yuv420p10le",
            Self::Yuv420p16le => "yuv420p16le",
            Self::Yuv422p16le => "yuv422p16le",
            Self::Yuv444p16le => "yuv444p16le",
            Self::Gray8 => "gray8",
            Self::Gray16le => "gray16le",
            Self::Rgb24 => "rgb24",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PixelFormat {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yuv420p" => Ok(Self::Yuv420p),
            "yuv422p" => Ok(Self::Yuv422p),
            "yuv444p" => Ok(Self::Yuv444p),
            "yuv420p10le" | "yuv420p10" => Ok(Self::Yuv420p10le),
            "yuv420p16le" | "yuv420p16" => Ok(Self::Yuv420p16le),
            "yuv422p16le" | "yuv422p16" => Ok(Self::Yuv422p16le),
            "yuv444p16le" | "yuv444p16" => Ok(Self::Yuv444p16le),
            "gray8" | "gray" => Ok(Self::Gray8),
            "gray16le" | "gray16" => Ok(Self::Gray16le),
            "rgb24" => Ok(Self::Rgb24),
            other => Err(MaskError::InvalidArgument(format!("未知像素格式: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuv420p_plane_geometry() {
        let pf = PixelFormat::Yuv420p;
        assert_eq!(pf.plane_width(0, 1920), Some(1920));
        assert_eq!(pf.plane_width(1, 1920), Some(960));
        assert_eq!(pf.plane_height(0, 1080), Some(1080));
        assert_eq!(pf.plane_height(2, 1080), Some(540));
        assert_eq!(pf.plane_width(3, 1920), None);
    }

    #[test]
    fn test_odd_size_chroma_rounds_up() {
        let pf = PixelFormat::Yuv420p16le;
        assert_eq!(pf.plane_width(1, 17), Some(9));
        assert_eq!(pf.plane_height(1, 9), Some(5));
    }

    #[test]
    fn test_yuv422p_plane_geometry() {
        let pf = PixelFormat::Yuv422p;
        assert_eq!(pf.plane_width(1, 64), Some(32));
        assert_eq!(pf.plane_height(1, 48), Some(48));
    }

    #[test]
    fn test_luma_only() {
        assert_eq!(PixelFormat::Yuv444p.luma_only(), PixelFormat::Gray8);
        assert_eq!(PixelFormat::Yuv420p16le.luma_only(), PixelFormat::Gray16le);
        assert_eq!(PixelFormat::Yuv420p10le.luma_only(), PixelFormat::None);
    }

    #[test]
    fn test_parse_and_display() {
        let pf: PixelFormat = "yuv422p16".parse().unwrap();
        assert_eq!(pf, PixelFormat::Yuv422p16le);
        assert_eq!(pf.to_string(), "yuv422p16le");
        assert!("nv12".parse::<PixelFormat>().is_err());
    }

    #[test]
    fn test_planar_yuv_flags() {
        assert!(PixelFormat::Yuv444p16le.is_planar_yuv());
        assert!(!PixelFormat::Gray8.is_planar_yuv());
        assert!(!PixelFormat::Rgb24.is_planar_yuv());
        assert_eq!(PixelFormat::Gray16le.plane_count(), 1);
    }
}
