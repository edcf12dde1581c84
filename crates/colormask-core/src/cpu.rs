//! CPU 能力检测.
//!
//! 向量内核按检测到的指令集选择, 检测结果对滤镜而言是一个不透明的输入.

use bitflags::bitflags;

bitflags! {
    /// CPU 指令集能力位掩码
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuFeatures: u32 {
        /// x86 SSE2 (128 位)
        const SSE2     = 1 << 0;
        /// x86 AVX2 (256 位)
        const AVX2     = 1 << 1;
        /// x86 AVX-512 F + BW (512 位)
        const AVX512BW = 1 << 2;
        /// ARM NEON (128 位)
        const NEON     = 1 << 3;
    }
}

impl CpuFeatures {
    /// 检测当前 CPU 支持的指令集
    pub fn detect() -> Self {
        let features = Self::detect_arch();
        log::debug!("检测到 CPU 特性: {features:?}");
        features
    }

    #[cfg(target_arch = "x86_64")]
    fn detect_arch() -> Self {
        let mut features = Self::empty();
        if std::arch::is_x86_feature_detected!("sse2") {
            features |= Self::SSE2;
        }
        if std::arch::is_x86_feature_detected!("avx2") {
            features |= Self::AVX2;
        }
        if std::arch::is_x86_feature_detected!("avx512f")
            && std::arch::is_x86_feature_detected!("avx512bw")
        {
            features |= Self::AVX512BW;
        }
        features
    }

    #[cfg(target_arch = "aarch64")]
    fn detect_arch() -> Self {
        if std::arch::is_aarch64_feature_detected!("neon") {
            Self::NEON
        } else {
            Self::empty()
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn detect_arch() -> Self {
        Self::empty()
    }

    /// 支持的最大向量位宽, 无向量指令时为 `None`
    pub fn widest_vector_bits(&self) -> Option<usize> {
        if self.contains(Self::AVX512BW) {
            Some(512)
        } else if self.contains(Self::AVX2) {
            Some(256)
        } else if self.intersects(Self::SSE2 | Self::NEON) {
            Some(128)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widest_vector_bits() {
        assert_eq!(CpuFeatures::empty().widest_vector_bits(), None);
        assert_eq!(CpuFeatures::SSE2.widest_vector_bits(), Some(128));
        assert_eq!(CpuFeatures::NEON.widest_vector_bits(), Some(128));
        assert_eq!(
            (CpuFeatures::SSE2 | CpuFeatures::AVX2).widest_vector_bits(),
            Some(256)
        );
        assert_eq!(CpuFeatures::all().widest_vector_bits(), Some(512));
    }

    #[test]
    fn test_detect_is_stable() {
        assert_eq!(CpuFeatures::detect(), CpuFeatures::detect());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_x86_64_always_has_sse2() {
        assert!(CpuFeatures::detect().contains(CpuFeatures::SSE2));
    }
}
