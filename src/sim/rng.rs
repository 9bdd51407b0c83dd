//! 随机数源
//!
//! 由仿真器独占的可播种随机流（ChaCha8），保证同一种子下运行完全可复现。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 可播种的随机数源
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// 创建时使用的种子
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// `[0, 1)` 上的均匀分布
    pub fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// 速率为 `rate` 的指数分布等待时间；`rate` 必须为正。
    pub fn exponential(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0, "exponential rate must be positive");
        // 1 - u 落在 (0, 1]，避免 ln(0)
        let u = 1.0 - self.uniform();
        -u.ln() / rate
    }

    /// `[0, len)` 上的均匀下标；`len` 必须大于 0。
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Bernoulli 试验
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// 派生一个独立的随机流（用于集合运行中的每一次独立仿真）。
    pub fn fork(&mut self) -> RandomSource {
        RandomSource::new(self.rng.random::<u64>())
    }
}
