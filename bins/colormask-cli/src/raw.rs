//! 原始平面帧读写.
//!
//! 文件由连续的帧组成, 每帧依次存放各平面, 平面内逐行紧密排列 (无填充).
//! 16 位采样按小端序存放.

use std::io::{self, Read, Write};

use anyhow::{Context, bail};
use byteorder::{ByteOrder, LittleEndian};
use colormask_core::{MaskError, MaskResult, PixelFormat, Sample, VideoFrame};

/// 可按原始字节读写的采样类型
pub trait RawSample: Sample {
    /// 每个采样的字节数
    const BYTES: usize;

    /// 从小端字节解码
    fn decode(bytes: &[u8], dst: &mut [Self]);

    /// 编码为小端字节
    fn encode(src: &[Self], bytes: &mut [u8]);
}

impl RawSample for u8 {
    const BYTES: usize = 1;

    fn decode(bytes: &[u8], dst: &mut [Self]) {
        dst.copy_from_slice(bytes);
    }

    fn encode(src: &[Self], bytes: &mut [u8]) {
        bytes.copy_from_slice(src);
    }
}

impl RawSample for u16 {
    const BYTES: usize = 2;

    fn decode(bytes: &[u8], dst: &mut [Self]) {
        LittleEndian::read_u16_into(bytes, dst);
    }

    fn encode(src: &[Self], bytes: &mut [u8]) {
        LittleEndian::write_u16_into(src, bytes);
    }
}

/// 各平面的 (宽, 高)
fn plane_dims(format: PixelFormat, width: u32, height: u32) -> Vec<(usize, usize)> {
    (0..format.plane_count() as usize)
        .filter_map(|p| Some((format.plane_width(p, width)?, format.plane_height(p, height)?)))
        .collect()
}

/// 一帧的字节数
pub fn frame_size<T: RawSample>(format: PixelFormat, width: u32, height: u32) -> usize {
    plane_dims(format, width, height)
        .iter()
        .map(|(w, h)| w * h * T::BYTES)
        .sum()
}

/// 尽量读满 `buf`, 返回实际读取的字节数 (到达文件末尾时可能不足)
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> MaskResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MaskError::Io(e)),
        }
    }
    Ok(filled)
}

/// 读取一帧, 流结束时返回 `None`
pub fn read_frame<T: RawSample, R: Read>(
    reader: &mut R,
    format: PixelFormat,
    width: u32,
    height: u32,
) -> anyhow::Result<Option<VideoFrame<T>>> {
    let mut bytes = vec![0u8; frame_size::<T>(format, width, height)];
    let n = read_full(reader, &mut bytes).context("读取输入帧失败")?;
    if n == 0 {
        return Ok(None);
    }
    if n < bytes.len() {
        bail!("输入帧不完整: 需要 {} 字节, 实际 {n} 字节", bytes.len());
    }

    let mut planes = Vec::new();
    let mut offset = 0;
    for (w, h) in plane_dims(format, width, height) {
        let len = w * h;
        let mut samples = vec![T::ZERO; len];
        T::decode(&bytes[offset..offset + len * T::BYTES], &mut samples);
        offset += len * T::BYTES;
        planes.push(samples);
    }
    Ok(Some(VideoFrame::from_planes(width, height, format, planes)?))
}

/// 写出一帧 (去掉行尾填充)
pub fn write_frame<T: RawSample, W: Write>(
    writer: &mut W,
    frame: &VideoFrame<T>,
) -> anyhow::Result<()> {
    let mut bytes = Vec::new();
    for plane in 0..frame.data.len() {
        let view = frame.plane(plane)?;
        let mut row_bytes = vec![0u8; view.width() * T::BYTES];
        for y in 0..view.height() {
            T::encode(view.row(y), &mut row_bytes);
            bytes.extend_from_slice(&row_bytes);
        }
    }
    writer
        .write_all(&bytes)
        .map_err(MaskError::from)
        .context("写出遮罩帧失败")?;
    Ok(())
}
