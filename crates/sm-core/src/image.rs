use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel in row-major
    /// order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns a pixel reference without bounds checks.
    ///
    /// # Safety
    /// Caller must guarantee `x < self.width()` and `y < self.height()`.
    pub unsafe fn get_unchecked(&self, x: usize, y: usize) -> &'a T {
        // SAFETY: Caller guarantees `x < width` and `y < height`. With view
        // invariants this implies `idx` is in bounds of `data`.
        unsafe { self.data.get_unchecked(y * self.stride + x) }
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.width * self.height;
        self.data.get(0..len)
    }
}

impl<T: Copy + Default> ImageView<'_, T> {
    /// Copies column `x` (all rows, top to bottom) into `out` and returns the
    /// filled slice.
    pub fn gather_column<'o>(&self, x: usize, out: &'o mut Vec<T>) -> Result<&'o [T], Error> {
        if x >= self.width {
            return Err(Error::ColumnOutOfBounds {
                x,
                width: self.width,
            });
        }

        let h = self.height;
        out.clear();
        out.resize(h, T::default());

        if let Some(data) = self.as_contiguous_slice() {
            let w = self.width;
            for (dst, src) in out.iter_mut().zip(data.iter().skip(x).step_by(w)) {
                *dst = *src;
            }
            return Ok(&out[..h]);
        }

        for (y, dst) in out.iter_mut().enumerate() {
            // SAFETY: `x < width` is checked above and `y < height` by the
            // length of `out`.
            *dst = unsafe { *self.get_unchecked(x, y) };
        }
        Ok(&out[..h])
    }
}

impl<T: Copy + Into<f32>> ImageView<'_, T> {
    /// Like [`ImageView::gather_column`], converting samples to `f32`.
    pub fn gather_column_f32<'o>(
        &self,
        x: usize,
        out: &'o mut Vec<f32>,
    ) -> Result<&'o [f32], Error> {
        if x >= self.width {
            return Err(Error::ColumnOutOfBounds {
                x,
                width: self.width,
            });
        }

        out.clear();
        out.extend((0..self.height).map(|y| {
            // SAFETY: `x < width` is checked above and `y < height`.
            let v = unsafe { *self.get_unchecked(x, y) };
            v.into()
        }));
        Ok(&out[..])
    }
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageView};
    use crate::Error;

    #[test]
    fn view_indexing_with_stride() {
        let data = vec![1u8, 2, 3, 99, 4, 5, 6, 88];
        let view = ImageView::from_slice(3, 2, 4, &data).expect("valid view");

        assert_eq!(view.stride(), 4);
        let mut buf = Vec::new();
        assert_eq!(view.gather_column(0, &mut buf).expect("in bounds"), &[1, 4]);
        assert_eq!(view.gather_column(2, &mut buf).expect("in bounds"), &[3, 6]);
        assert!(view.gather_column(3, &mut buf).is_err());
        assert!(!view.is_contiguous());
        assert!(view.as_contiguous_slice().is_none());
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Image::from_vec(3, 2, vec![0u8; 5]).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn from_slice_rejects_short_stride() {
        let data = vec![0u8; 16];
        assert_eq!(
            ImageView::from_slice(4, 2, 3, &data).unwrap_err(),
            Error::InvalidStride
        );
    }

    #[test]
    fn from_fn_is_row_major() {
        let img = Image::from_fn(3, 2, |x, y| (10 * y + x) as u16);
        assert_eq!(img.data(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn gather_column_contiguous_and_strided() {
        let img = Image::from_fn(4, 3, |x, y| (10 * y + x) as u8);
        let mut buf = Vec::new();
        let col = img.as_view().gather_column(2, &mut buf).expect("in bounds");
        assert_eq!(col, &[2, 12, 22]);

        let padded = vec![
            1u8, 2, 0, // row 0
            3, 4, 0, // row 1
            5, 6, 0, // row 2
        ];
        let view = ImageView::from_slice(2, 3, 3, &padded).expect("valid view");
        let col = view.gather_column(1, &mut buf).expect("in bounds");
        assert_eq!(col, &[2, 4, 6]);
    }

    #[test]
    fn gather_column_f32_converts_wide_samples() {
        let img = Image::from_fn(2, 3, |x, y| (1000 * y + x) as u16);
        let mut buf = Vec::new();
        let col = img.as_view().gather_column_f32(1, &mut buf).expect("in bounds");
        assert_eq!(col, &[1.0, 1001.0, 2001.0]);
        assert!(img.as_view().gather_column_f32(2, &mut buf).is_err());
    }

    #[test]
    fn gather_column_out_of_bounds() {
        let img = Image::from_fn(4, 3, |_, _| 0u8);
        let mut buf = Vec::new();
        assert_eq!(
            img.as_view().gather_column(4, &mut buf).unwrap_err(),
            Error::ColumnOutOfBounds { x: 4, width: 4 }
        );
    }
}
