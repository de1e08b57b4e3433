//! Walking strided memory: logical index to memory offset, and the
//! N-dimensional offset loop used whenever a loop nest cannot be flattened.

/// Converts the flat logical index `elem` (row-major over `shape`) into the
/// memory offset of that element under `strides`.
///
/// Zero strides (broadcast dimensions) contribute nothing. Extent-0 dimensions
/// are skipped rather than divided by; no index is valid for such a shape, so
/// the result is only meaningful for `elem < product(shape)`.
#[inline]
pub fn elem_to_loc(elem: usize, shape: &[usize], strides: &[isize]) -> isize {
    debug_assert_eq!(shape.len(), strides.len());
    let mut loc = 0isize;
    let mut remaining = elem;
    for (&extent, &stride) in shape.iter().zip(strides).rev() {
        if extent == 0 {
            continue;
        }
        loc += (remaining % extent) as isize * stride;
        remaining /= extent;
    }
    loc
}

/// Row-major iterator over the cumulative offsets `Σ coord[d] * strides[d]`
/// of every coordinate in `shape`.
///
/// Yields exactly one offset (0) for an empty shape and nothing at all when
/// any extent is 0.
#[derive(Debug, Clone)]
pub struct NdOffsets<'a> {
    shape: &'a [usize],
    strides: &'a [isize],
    coords: Vec<usize>,
    offset: isize,
    done: bool,
}

impl<'a> NdOffsets<'a> {
    pub fn new(shape: &'a [usize], strides: &'a [isize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape,
            strides,
            coords: vec![0; shape.len()],
            offset: 0,
            done: shape.contains(&0),
        }
    }

    /// Moves the odometer one step, returning false once every coordinate has
    /// been visited.
    fn advance(&mut self) -> bool {
        // Offsets never step past the last coordinate, so they stay within
        // the layout's bounds.
        for dim in (0..self.shape.len()).rev() {
            if self.coords[dim] + 1 < self.shape[dim] {
                self.coords[dim] += 1;
                self.offset += self.strides[dim];
                return true;
            }
            self.offset -= self.coords[dim] as isize * self.strides[dim];
            self.coords[dim] = 0;
        }
        false
    }
}

impl Iterator for NdOffsets<'_> {
    type Item = isize;

    fn next(&mut self) -> Option<isize> {
        if self.done {
            return None;
        }
        let current = self.offset;
        self.done = !self.advance();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Remaining = total - already visited, with visited read off the odometer.
        let mut visited = 0usize;
        for (&coord, &extent) in self.coords.iter().zip(self.shape) {
            visited = visited * extent + coord;
        }
        let remaining = self.shape.iter().product::<usize>() - visited;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NdOffsets<'_> {}

/// Invokes `callback` once per coordinate of `shape`, in row-major order, with
/// the cumulative offset of that coordinate.
pub fn nd_loop<F>(shape: &[usize], strides: &[isize], mut callback: F)
where
    F: FnMut(isize),
{
    for offset in NdOffsets::new(shape, strides) {
        callback(offset);
    }
}
