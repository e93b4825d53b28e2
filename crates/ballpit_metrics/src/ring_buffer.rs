//! Fixed-size history of throughput samples

pub struct RingBuffer {
    samples: Vec<f64>,
    capacity: usize,
    index: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            index: 0,
        }
    }

    pub fn push(&mut self, sample: f64) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.index] = sample;
        }
        self.index = (self.index + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn min_max(&self) -> (f64, f64) {
        if self.samples.is_empty() {
            return (0.0, 0.0);
        }
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer() {
        let mut buffer = RingBuffer::new(3);

        buffer.push(100.0);
        assert_eq!(buffer.average(), 100.0);

        buffer.push(200.0);
        assert_eq!(buffer.average(), 150.0);

        buffer.push(300.0);
        assert_eq!(buffer.average(), 200.0);

        // Oldest sample is overwritten
        buffer.push(400.0);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.average(), 300.0);
        assert_eq!(buffer.min_max(), (200.0, 400.0));
    }

    #[test]
    fn test_zero_capacity_still_holds_one_sample() {
        let mut buffer = RingBuffer::new(0);
        buffer.push(5.0);
        buffer.push(7.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.average(), 7.0);
    }
}
