use rayon::prelude::*;

use inkdigit_image::Image;

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel in the image in parallel with a value.
pub fn par_iter_rows_val<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Clone + Send + Sync,
    T2: Clone + Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel of an image in place, in parallel over rows.
pub fn par_iter_rows_inplace<T, const C: usize>(
    img: &mut Image<T, C>,
    f: impl Fn(&mut T) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = img.cols();
    if cols == 0 {
        return;
    }
    img.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .for_each(|row| row.iter_mut().for_each(&f));
}

/// Fill each output row in parallel from its row index.
///
/// `dst` is split into rows of `C * cols` samples and `f` receives the row
/// index together with the mutable row.
pub fn par_fill_rows<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    if cols == 0 {
        return;
    }
    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(r, row)| f(r, row));
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdigit_image::{ImageError, ImageSize};

    #[test]
    fn iter_rows_val_doubles() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<u8, 1>::new(size, vec![1, 2, 3, 4])?;
        let mut dst = Image::<u16, 1>::from_size_val(size, 0)?;
        par_iter_rows_val(&src, &mut dst, |s, d| *d = *s as u16 * 2);
        assert_eq!(dst.as_slice(), &[2, 4, 6, 8]);
        Ok(())
    }

    #[test]
    fn iter_rows_collapses_channels() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let src = Image::<u8, 3>::new(size, vec![1, 2, 3, 4, 5, 6])?;
        let mut dst = Image::<u32, 1>::from_size_val(size, 0)?;
        par_iter_rows(&src, &mut dst, |s, d| {
            d[0] = s.iter().map(|&v| v as u32).sum();
        });
        assert_eq!(dst.as_slice(), &[6, 15]);
        Ok(())
    }

    #[test]
    fn fill_rows_with_index() -> Result<(), ImageError> {
        let mut dst = Image::<usize, 1>::from_size_val([3, 2].into(), 0)?;
        par_fill_rows(&mut dst, |r, row| row.iter_mut().for_each(|v| *v = r));
        assert_eq!(dst.as_slice(), &[0, 0, 0, 1, 1, 1]);
        Ok(())
    }

    #[test]
    fn inplace_on_empty_image() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val([0, 0].into(), 0)?;
        par_iter_rows_inplace(&mut img, |v| *v = 1);
        assert!(img.is_empty());
        Ok(())
    }
}
