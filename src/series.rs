// Bounded sample history with running bounds, one per metric.

/// How a series derives the value range its graph is scaled against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Lifetime running min/max: min only decreases, max only increases.
    Auto,
    /// Fixed range; pushed values are clamped into it and the bounds never move.
    Fixed { min: f64, max: f64 },
}

/// Fixed-capacity ring of samples. Slots are allocated once; a push at
/// capacity overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    slots: Box<[f64]>,
    /// Index of the oldest sample.
    head: usize,
    len: usize,
    scale: Scale,
    bounds: Option<(f64, f64)>,
}

impl SeriesBuffer {
    /// Series with running bounds. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        Self::with_scale(capacity, Scale::Auto)
    }

    /// Fixed bounds given in reverse order are swapped; a NaN bound falls
    /// back to [`Scale::Auto`].
    pub fn with_scale(capacity: usize, scale: Scale) -> Self {
        let scale = match scale {
            Scale::Fixed { min, max } if min.is_nan() || max.is_nan() => Scale::Auto,
            Scale::Fixed { min, max } if min > max => Scale::Fixed { min: max, max: min },
            other => other,
        };
        let bounds = match scale {
            Scale::Auto => None,
            Scale::Fixed { min, max } => Some((min, max)),
        };
        Self {
            slots: vec![0.0; capacity.max(1)].into_boxed_slice(),
            head: 0,
            len: 0,
            scale,
            bounds,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Appends `value`, evicting the oldest sample when full. Returns the
    /// value actually stored (clamped for [`Scale::Fixed`]).
    pub fn push(&mut self, value: f64) -> f64 {
        let value = match self.scale {
            Scale::Auto => {
                self.bounds = Some(match self.bounds {
                    None => (value, value),
                    Some((min, max)) => (min.min(value), max.max(value)),
                });
                value
            }
            Scale::Fixed { min, max } => value.clamp(min, max),
        };

        let cap = self.slots.len();
        if self.len < cap {
            self.slots[(self.head + self.len) % cap] = value;
            self.len += 1;
        } else {
            self.slots[self.head] = value;
            self.head = (self.head + 1) % cap;
        }
        value
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        let cap = self.slots.len();
        Some(self.slots[(self.head + self.len - 1) % cap])
    }

    /// Running (or fixed) bounds as `(min, max)`; `None` before the first
    /// push of an auto-scaled series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    pub fn running_min(&self) -> Option<f64> {
        self.bounds.map(|(min, _)| min)
    }

    pub fn running_max(&self) -> Option<f64> {
        self.bounds.map(|(_, max)| max)
    }

    /// The most recent `min(max_count, len)` samples, oldest first.
    /// The returned iterator borrows the buffer and can be cloned to restart.
    pub fn window(&self, max_count: usize) -> Window<'_> {
        let count = max_count.min(self.len);
        Window {
            series: self,
            offset: self.len - count,
            end: self.len,
        }
    }

    /// Every stored sample, oldest first.
    pub fn iter(&self) -> Window<'_> {
        self.window(self.len)
    }
}

/// Read-only chronological view over part of a [`SeriesBuffer`].
#[derive(Debug, Clone)]
pub struct Window<'a> {
    series: &'a SeriesBuffer,
    /// Logical position (0 = oldest stored sample).
    offset: usize,
    end: usize,
}

impl Iterator for Window<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.offset >= self.end {
            return None;
        }
        let cap = self.series.slots.len();
        let value = self.series.slots[(self.series.head + self.offset) % cap];
        self.offset += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.offset;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Window<'_> {}

/// Maps `value` into `[0, height]` with 0 at the top (largest value) and
/// `height` at the bottom, truncated to a whole pixel. A degenerate range
/// (`max <= min`) yields a flat line at mid-scale.
pub fn normalize(value: f64, min: f64, max: f64, height: f64) -> f64 {
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return height / 2.0;
    }
    height - (((value - min) / range) * height).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(s: &SeriesBuffer) -> Vec<f64> {
        s.iter().collect()
    }

    #[test]
    fn push_evicts_oldest_when_full() {
        let mut s = SeriesBuffer::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            s.push(v);
            assert!(s.len() <= 3);
        }
        assert_eq!(collect(&s), vec![3.0, 4.0, 5.0]);
        assert_eq!(s.last(), Some(5.0));
    }

    #[test]
    fn running_bounds_are_monotonic() {
        let mut s = SeriesBuffer::new(2);
        s.push(10.0);
        s.push(2.0);
        s.push(7.0);
        s.push(7.0);
        // 2.0 and 10.0 were evicted but still define the bounds
        assert_eq!(s.bounds(), Some((2.0, 10.0)));
    }

    #[test]
    fn fixed_scale_clamps_and_never_moves() {
        let mut s = SeriesBuffer::with_scale(4, Scale::Fixed { min: 0.0, max: 10_000.0 });
        assert_eq!(s.push(12_500.0), 10_000.0);
        assert_eq!(s.push(-3.0), 0.0);
        assert_eq!(s.bounds(), Some((0.0, 10_000.0)));
        assert_eq!(collect(&s), vec![10_000.0, 0.0]);
    }

    #[test]
    fn reversed_fixed_bounds_are_swapped() {
        let mut s = SeriesBuffer::with_scale(4, Scale::Fixed { min: 100.0, max: 0.0 });
        assert_eq!(s.scale(), Scale::Fixed { min: 0.0, max: 100.0 });
        assert_eq!(s.push(150.0), 100.0);
        assert_eq!(s.push(-1.0), 0.0);
        assert_eq!(s.bounds(), Some((0.0, 100.0)));
    }

    #[test]
    fn nan_fixed_bound_falls_back_to_running_bounds() {
        let mut s = SeriesBuffer::with_scale(4, Scale::Fixed { min: f64::NAN, max: 10.0 });
        assert_eq!(s.scale(), Scale::Auto);
        assert_eq!(s.push(42.0), 42.0);
        assert_eq!(s.bounds(), Some((42.0, 42.0)));
    }

    #[test]
    fn window_takes_most_recent_in_order() {
        let mut s = SeriesBuffer::new(5);
        for v in 1..=5 {
            s.push(v as f64);
        }
        s.push(6.0);
        let w: Vec<f64> = s.window(3).collect();
        assert_eq!(w, vec![4.0, 5.0, 6.0]);
        assert_eq!(s.window(3).len(), 3);
    }

    #[test]
    fn window_is_restartable() {
        let mut s = SeriesBuffer::new(4);
        s.push(1.0);
        s.push(2.0);
        let w = s.window(10);
        let first: Vec<f64> = w.clone().collect();
        let second: Vec<f64> = w.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![1.0, 2.0]);
    }

    #[test]
    fn zero_capacity_holds_one_sample() {
        let mut s = SeriesBuffer::new(0);
        s.push(1.0);
        s.push(2.0);
        assert_eq!(s.capacity(), 1);
        assert_eq!(collect(&s), vec![2.0]);
    }

    #[test]
    fn normalize_maps_extremes() {
        assert_eq!(normalize(50.0, 0.0, 100.0, 40.0), 20.0);
        assert_eq!(normalize(100.0, 0.0, 100.0, 40.0), 0.0);
        assert_eq!(normalize(0.0, 0.0, 100.0, 40.0), 40.0);
    }

    #[test]
    fn normalize_degenerate_range_is_mid_scale() {
        assert_eq!(normalize(42.0, 42.0, 42.0, 40.0), 20.0);
        assert_eq!(normalize(1.0, 5.0, 3.0, 40.0), 20.0);
    }
}
