//! 分类内核.
//!
//! 两种策略 (直接比较, 查表) 各有标量实现与按通道数分块的实现.
//! 分块实现以 `[T; LANES]` 数组为单位, 由 [`simd`] 中的入口在启用
//! 对应指令集的上下文中实例化, 编译器据此生成 128/256/512 位向量代码.
//!
//! 所有变体对同一输入产生逐位一致的结果.

pub(crate) mod direct;
pub(crate) mod lookup;
mod simd;

use colormask_core::{PlaneViewMut, Sample, Subsampling, YuvPlanes};

use crate::color::Palette;
use crate::lut::ToleranceLut;
use crate::strategy::{DispatchPlan, KernelVariant, Strategy};

/// 内核共享的只读状态, 构造后在所有帧与两个半帧之间共享
#[derive(Debug, Clone, Copy)]
pub(crate) struct KernelContext<'a, T> {
    pub palette: &'a Palette<T>,
    pub lut: Option<&'a ToleranceLut<T>>,
    pub layout: Subsampling,
}

/// 一行的输入与输出
///
/// `u`/`v` 是与该亮度行对应的色度行 (按子采样布局寻址后).
pub(crate) struct Row<'a, T> {
    pub y: &'a [T],
    pub u: &'a [T],
    pub v: &'a [T],
    pub dst: &'a mut [T],
}

/// 连续加载 `LANES` 个采样
#[inline(always)]
pub(crate) fn load<T: Sample, const LANES: usize>(src: &[T], start: usize) -> [T; LANES] {
    std::array::from_fn(|i| src[start + i])
}

/// 加载 `LANES / 2` 个色度采样并成对复制, 第 `2k` 与 `2k + 1` 通道都取色度列 `k`
#[inline(always)]
pub(crate) fn widen_pairs<T: Sample, const LANES: usize>(src: &[T], start: usize) -> [T; LANES] {
    std::array::from_fn(|i| src[start + i / 2])
}

/// 加载与亮度列 `x0..x0 + LANES` 对齐的色度采样
#[inline(always)]
pub(crate) fn load_chroma<T: Sample, const LANES: usize>(
    src: &[T],
    x0: usize,
    layout: Subsampling,
) -> [T; LANES] {
    match layout.horizontal() {
        1 => load(src, x0),
        _ => widen_pairs(src, layout.chroma_col(x0)),
    }
}

/// 按调度计划分类 `src` 的全部行, 写入 `dst`
///
/// `src.y` 与 `dst` 必须同尺寸. 主体列由计划选定的策略与变体处理,
/// 不足一组通道的尾列走查表. 查找表缺失时退回精确的直接比较.
pub(crate) fn classify_rows<T: Sample>(
    plan: &DispatchPlan,
    ctx: &KernelContext<'_, T>,
    src: &YuvPlanes<'_, T>,
    dst: &mut PlaneViewMut<'_, T>,
) {
    let width = dst.width();
    let body = width - width % plan.lanes;

    for y in 0..dst.height() {
        let c = ctx.layout.chroma_row(y);
        let row = Row {
            y: src.y.row(y),
            u: src.u.row(c),
            v: src.v.row(c),
            dst: dst.row_mut(y),
        };
        classify_row(plan, ctx, row, body, width);
    }
}

fn classify_row<T: Sample>(
    plan: &DispatchPlan,
    ctx: &KernelContext<'_, T>,
    row: Row<'_, T>,
    body: usize,
    width: usize,
) {
    let Row { y, u, v, dst } = row;
    match (plan.strategy, ctx.lut) {
        (Strategy::Lookup, Some(lut)) => {
            run_lookup_body(plan, lut, ctx.layout, Row { y, u, v, dst: &mut *dst }, body)
        }
        (Strategy::Lookup, None) => {
            direct::scalar(ctx.palette, ctx.layout, Row { y, u, v, dst: &mut *dst }, 0..body)
        }
        (Strategy::Direct, _) => run_body(plan, ctx, Row { y, u, v, dst: &mut *dst }, body),
    }
    if body < width {
        let tail = Row { y, u, v, dst };
        match ctx.lut {
            Some(lut) => lookup::scalar(lut, ctx.layout, tail, body..width),
            None => direct::scalar(ctx.palette, ctx.layout, tail, body..width),
        }
    }
}

fn run_body<T: Sample>(plan: &DispatchPlan, ctx: &KernelContext<'_, T>, row: Row<'_, T>, body: usize) {
    let (palette, layout) = (ctx.palette, ctx.layout);
    // SAFETY: 计划中的向量变体已经与运行时检测到的 CPU 能力求过交集
    unsafe {
        match (plan.variant, T::PARAMS.bits) {
            (KernelVariant::Scalar, _) => direct::scalar(palette, layout, row, 0..body),
            (KernelVariant::V128, 8) => simd::direct_v128::<T, 16>(palette, layout, row, body),
            (KernelVariant::V128, _) => simd::direct_v128::<T, 8>(palette, layout, row, body),
            (KernelVariant::V256, 8) => simd::direct_v256::<T, 32>(palette, layout, row, body),
            (KernelVariant::V256, _) => simd::direct_v256::<T, 16>(palette, layout, row, body),
            (KernelVariant::V512, 8) => simd::direct_v512::<T, 64>(palette, layout, row, body),
            (KernelVariant::V512, _) => simd::direct_v512::<T, 32>(palette, layout, row, body),
        }
    }
}

fn run_lookup_body<T: Sample>(
    plan: &DispatchPlan,
    lut: &ToleranceLut<T>,
    layout: Subsampling,
    row: Row<'_, T>,
    body: usize,
) {
    // SAFETY: 同 run_body
    unsafe {
        match (plan.variant, T::PARAMS.bits) {
            (KernelVariant::Scalar, _) => lookup::scalar(lut, layout, row, 0..body),
            (KernelVariant::V128, 8) => simd::lookup_v128::<T, 16>(lut, layout, row, body),
            (KernelVariant::V128, _) => simd::lookup_v128::<T, 8>(lut, layout, row, body),
            (KernelVariant::V256, 8) => simd::lookup_v256::<T, 32>(lut, layout, row, body),
            (KernelVariant::V256, _) => simd::lookup_v256::<T, 16>(lut, layout, row, body),
            (KernelVariant::V512, 8) => simd::lookup_v512::<T, 64>(lut, layout, row, body),
            (KernelVariant::V512, _) => simd::lookup_v512::<T, 32>(lut, layout, row, body),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use colormask_core::{PlaneView, Sample, Subsampling, YuvPlanes};

    /// 简单的线性同余伪随机序列, 保证测试可复现
    pub struct Lcg(u64);

    impl Lcg {
        pub fn new(seed: u64) -> Self {
            Self(seed)
        }

        pub fn next_u32(&mut self) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 33) as u32
        }

        /// 以 `center` 为中心, 半径 `spread` 内的采样
        pub fn near<T: Sample>(&mut self, center: T, spread: u32) -> T {
            let offset = (self.next_u32() % (2 * spread + 1)) as i64 - spread as i64;
            T::from_clamped(center.to_i32() as i64 + offset)
        }
    }

    /// 测试用的紧密排列三平面帧
    pub struct TestPlanes<T> {
        pub width: usize,
        pub height: usize,
        pub layout: Subsampling,
        pub y: Vec<T>,
        pub u: Vec<T>,
        pub v: Vec<T>,
    }

    impl<T: Sample> TestPlanes<T> {
        /// 采样值聚集在 `centers` 附近, 使匹配与不匹配都大量出现
        pub fn generate(
            width: usize,
            height: usize,
            layout: Subsampling,
            centers: &[(T, T, T)],
            spread: u32,
            seed: u64,
        ) -> Self {
            let mut rng = Lcg::new(seed);
            let cw = layout.chroma_width(width);
            let ch = layout.chroma_height(height);
            let pick = |rng: &mut Lcg| centers[rng.next_u32() as usize % centers.len()];
            let y = (0..width * height)
                .map(|_| {
                    let c = pick(&mut rng);
                    rng.near(c.0, spread)
                })
                .collect();
            let mut u = Vec::with_capacity(cw * ch);
            let mut v = Vec::with_capacity(cw * ch);
            for _ in 0..cw * ch {
                let c = pick(&mut rng);
                u.push(rng.near(c.1, spread));
                v.push(rng.near(c.2, spread));
            }
            Self {
                width,
                height,
                layout,
                y,
                u,
                v,
            }
        }

        pub fn planes(&self) -> YuvPlanes<'_, T> {
            let cw = self.layout.chroma_width(self.width);
            let ch = self.layout.chroma_height(self.height);
            YuvPlanes {
                y: PlaneView::new(&self.y, self.width, self.width, self.height).unwrap(),
                u: PlaneView::new(&self.u, cw, cw, ch).unwrap(),
                v: PlaneView::new(&self.v, cw, cw, ch).unwrap(),
            }
        }
    }
}
