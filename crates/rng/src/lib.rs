use sha3::{digest::{ExtendableOutput, Update, XofReader}, Shake256};

/// Deterministic hash-chain generator. Every draw is labelled with a context
/// so separate decisions never share output bytes.
#[derive(Clone)]
pub struct ONDRng {
    state: [u8; 32],
    step: u64,
}

impl ONDRng {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"OND_INIT"], &mut state);
        Self { state, step: 0 }
    }

    /// Independent stream for one shot of a batch. Depends only on the master
    /// seed and the shot index, never on scheduling.
    pub fn for_shot(seed: &[u8], shot: u64) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"OND_SHOT", &shot.to_be_bytes()], &mut state);
        Self { state, step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self, ctx: &[u8]) -> f64 {
        self.step += 1;

        let state = self.state;
        let step_bytes = self.step.to_be_bytes();
        let mut next_state = self.state;
        shake(&[&state, &step_bytes, b"BOSON"], &mut next_state);
        self.state = next_state;

        let mut out = [0u8; 8];
        shake(&[&self.state, ctx], &mut out);

        // top 53 bits fill the mantissa exactly
        (u64::from_be_bytes(out) >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [lo, hi).
    pub fn next_range(&mut self, lo: f64, hi: f64, ctx: &[u8]) -> f64 {
        lo + (hi - lo) * self.next_f64(ctx)
    }

    /// Uniform integer in 0..n. Returns 0 when n == 0.
    pub fn next_index(&mut self, n: usize, ctx: &[u8]) -> usize {
        if n == 0 {
            return 0;
        }
        let i = (self.next_f64(ctx) * n as f64) as usize;
        i.min(n - 1)
    }

    /// Fisher-Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T], ctx: &[u8]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1, ctx);
            items.swap(i, j);
        }
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}
