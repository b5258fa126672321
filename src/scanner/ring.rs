//! Enumeration of chunk offsets by squared distance.

/// Integer square root, rounded down.
fn isqrt(value: u64) -> u64 {
    let mut root = (value as f64).sqrt() as u64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

/// Every `(xoff, zoff)` with `xoff² + zoff² == ring`, x ascending then z ascending.
///
/// Only `⌊√ring⌋` candidate x values are visited per ring, so sparse rings
/// (most of them have no points at all) cost almost nothing.
///
/// # Example
/// ```
/// use voxel_scanner::scanner::RingIterator;
///
/// let ring: Vec<_> = RingIterator::new(5).collect();
/// assert_eq!(ring, vec![(-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1)]);
/// assert_eq!(RingIterator::new(3).count(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct RingIterator {
    ring: i64,
    x: i64,
    max_x: i64,
    pending_positive_z: Option<i64>,
}

impl RingIterator {
    /// Iterates ring `ring` (a squared distance, not a radius).
    pub fn new(ring: u64) -> Self {
        let max_x = isqrt(ring) as i64;
        RingIterator {
            ring: ring as i64,
            x: -max_x,
            max_x,
            pending_positive_z: None,
        }
    }
}

impl Iterator for RingIterator {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if let Some(z) = self.pending_positive_z.take() {
            return Some(((self.x - 1) as i32, z as i32));
        }
        while self.x <= self.max_x {
            let x = self.x;
            self.x += 1;
            let remainder = self.ring - x * x;
            let z = isqrt(remainder as u64) as i64;
            if z * z != remainder {
                continue;
            }
            if z != 0 {
                self.pending_positive_z = Some(z);
            }
            return Some((x as i32, -z as i32));
        }
        None
    }
}
