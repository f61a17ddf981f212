//! Ring buffers for accumulating incoming events ahead of the grid step
//! that consumes them.
//!
//! The delivery side only ever writes to future slots while the owning
//! instance's update only ever reads the current slot, so the temporal
//! separation between slots stands in for locking.

/// A circular per-channel accumulator, one slot per grid step
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer {
    slots: Vec<f32>,
    head: usize,
}

/// Default number of future steps a buffer can hold before growing
pub const DEFAULT_BUFFER_STEPS: usize = 64;

impl RingBuffer {
    /// Creates a buffer able to stage events up to `steps - 1` steps ahead
    pub fn new(steps: usize) -> Self {
        RingBuffer {
            slots: vec![0.; steps.max(1)],
            head: 0,
        }
    }

    /// Accumulates an amplitude into the slot `delay_steps` ahead of the
    /// current one, growing the buffer if the delay exceeds its span
    pub fn add(&mut self, delay_steps: usize, amplitude: f32) {
        if delay_steps >= self.slots.len() {
            // linearize before growing so slot order is preserved
            self.slots.rotate_left(self.head);
            self.head = 0;
            self.slots.resize(delay_steps + 1, 0.);
        }

        let index = (self.head + delay_steps) % self.slots.len();
        self.slots[index] += amplitude;
    }

    /// Returns the accumulated value for the current step, zeroing the slot
    /// for reuse and advancing to the next one
    pub fn consume(&mut self) -> f32 {
        let value = self.slots[self.head];
        self.slots[self.head] = 0.;
        self.head = (self.head + 1) % self.slots.len();

        value
    }

    /// Zeroes every slot without changing the buffer's span
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = 0.;
        }
    }

    /// Number of steps the buffer can stage without growing
    pub fn span(&self) -> usize {
        self.slots.len()
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        RingBuffer::new(DEFAULT_BUFFER_STEPS)
    }
}

/// The incoming event channels of a two-channel model, one ring buffer for
/// each synaptic sign plus a staging buffer for injected currents
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpikeBuffers {
    /// Accumulated positive spike weights
    pub excitatory: RingBuffer,
    /// Accumulated negative spike weights
    pub inhibitory: RingBuffer,
    /// Staged external current amplitudes (pA)
    pub currents: RingBuffer,
}

impl SpikeBuffers {
    pub fn new(steps: usize) -> Self {
        SpikeBuffers {
            excitatory: RingBuffer::new(steps),
            inhibitory: RingBuffer::new(steps),
            currents: RingBuffer::new(steps),
        }
    }

    /// Routes a weighted spike by its sign, excitatory for non-negative
    /// weights and inhibitory otherwise
    pub fn add_spike(&mut self, delay_steps: usize, weight: f32) {
        if weight >= 0. {
            self.excitatory.add(delay_steps, weight);
        } else {
            self.inhibitory.add(delay_steps, weight);
        }
    }

    pub fn clear(&mut self) {
        self.excitatory.clear();
        self.inhibitory.clear();
        self.currents.clear();
    }
}
