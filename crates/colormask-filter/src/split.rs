//! 两路帧分割.
//!
//! 多线程模式下每帧只派生一个任务处理下半帧, 调用线程同步处理上半帧,
//! 返回前等待派生任务结束. 两半访问互不重叠的行, 之间没有共享可变状态.

use std::thread;

use colormask_core::{MaskError, MaskResult, PlaneViewMut, Subsampling, YuvPlanes};

/// 按高度一分为二的分割器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSplitter {
    layout: Subsampling,
}

impl FrameSplitter {
    /// 检查帧高度能否在色度行边界上对半分割
    ///
    /// 半帧高度必须映射为整数个色度行 (4:2:0 下 `(height / 2) % 2 == 0`).
    pub fn new(height: usize, layout: Subsampling) -> MaskResult<Self> {
        if (height / 2) % layout.vertical() != 0 {
            return Err(MaskError::InvalidArgument(format!(
                "多线程模式下 {layout} 的色度高度必须为偶数, 帧高度 {height}"
            )));
        }
        Ok(Self { layout })
    }

    /// 上半帧的行数, 下半帧处理其余 `height - split_row` 行
    pub fn split_row(height: usize) -> usize {
        height / 2
    }

    /// 上半帧在调用线程执行, 下半帧在派生线程执行, 两者都结束后返回
    ///
    /// `work` 接收对应半帧的源平面与输出平面. 派生任务 panic 时在调用线程重新抛出.
    pub fn run<T, F>(&self, src: &YuvPlanes<'_, T>, dst: PlaneViewMut<'_, T>, work: F)
    where
        T: Send + Sync,
        F: Fn(&YuvPlanes<'_, T>, &mut PlaneViewMut<'_, T>) + Sync,
    {
        let height = dst.height();
        let half = Self::split_row(height);
        let (mut top, mut bottom) = dst.split_rows(half);
        let top_src = src.rows(0, half, self.layout);
        let bottom_src = src.rows(half, height - half, self.layout);

        thread::scope(|scope| {
            let work = &work;
            let handle = scope.spawn(move || work(&bottom_src, &mut bottom));
            work(&top_src, &mut top);
            if let Err(payload) = handle.join() {
                std::panic::resume_unwind(payload);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use colormask_core::PlaneView;

    use super::*;

    #[test]
    fn test_new_checks_chroma_rows() {
        assert!(FrameSplitter::new(8, Subsampling::Yuv420).is_ok());
        assert!(FrameSplitter::new(6, Subsampling::Yuv420).is_err());
        assert!(FrameSplitter::new(6, Subsampling::Yuv422).is_ok());
        assert!(FrameSplitter::new(7, Subsampling::Yuv444).is_ok());
        assert!(matches!(
            FrameSplitter::new(10, Subsampling::Yuv420),
            Err(MaskError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_run_covers_all_rows_once() {
        let (w, h) = (4, 7);
        let y: Vec<u8> = (0..w * h).map(|i| i as u8).collect();
        let planes = YuvPlanes {
            y: PlaneView::new(&y, w, w, h).unwrap(),
            u: PlaneView::new(&y, w, w, h).unwrap(),
            v: PlaneView::new(&y, w, w, h).unwrap(),
        };
        let mut out = vec![0u8; w * h];
        let dst = PlaneViewMut::new(&mut out, w, w, h).unwrap();
        let splitter = FrameSplitter::new(h, Subsampling::Yuv444).unwrap();
        splitter.run(&planes, dst, |src, dst| {
            for row in 0..dst.height() {
                for (o, &s) in dst.row_mut(row).iter_mut().zip(src.y.row(row)) {
                    *o += s + 1;
                }
            }
        });
        let expected: Vec<u8> = y.iter().map(|v| v + 1).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_run_maps_chroma_halves() {
        let (w, h) = (2, 8);
        let y = vec![0u8; w * h];
        let c: Vec<u8> = (0..4).collect();
        let planes = YuvPlanes {
            y: PlaneView::new(&y, w, w, h).unwrap(),
            u: PlaneView::new(&c, 1, 1, 4).unwrap(),
            v: PlaneView::new(&c, 1, 1, 4).unwrap(),
        };
        let mut out = vec![0u8; w * h];
        let dst = PlaneViewMut::new(&mut out, w, w, h).unwrap();
        let splitter = FrameSplitter::new(h, Subsampling::Yuv420).unwrap();
        splitter.run(&planes, dst, |src, dst| {
            assert_eq!(src.u.height(), 2);
            for row in 0..dst.height() {
                let chroma = src.u.row(row / 2)[0];
                dst.row_mut(row).fill(chroma);
            }
        });
        assert_eq!(out, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3]);
    }

    #[test]
    #[should_panic(expected = "下半帧")]
    fn test_run_propagates_panic() {
        let y = vec![0u8; 4];
        let planes = YuvPlanes {
            y: PlaneView::new(&y, 1, 1, 4).unwrap(),
            u: PlaneView::new(&y, 1, 1, 4).unwrap(),
            v: PlaneView::new(&y, 1, 1, 4).unwrap(),
        };
        let mut out = vec![0u8; 4];
        let dst = PlaneViewMut::new(&mut out, 1, 1, 4).unwrap();
        let splitter = FrameSplitter::new(4, Subsampling::Yuv444).unwrap();
        splitter.run(&planes, dst, |src, _| {
            if src.y.row(0).as_ptr() != y.as_ptr() {
                panic!("下半帧");
            }
        });
    }
}
