use inkdigit_image::{Image, ImageError, ImageSize, ScanDirection};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// Crop an image to a specified region.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the region does not fit in `src`.
///
/// # Examples
///
/// ```rust
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if x + dst.cols() > src.cols() || y + dst.rows() > src.rows() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            x + dst.cols(),
            y + dst.rows(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            // copy the slice to the destination
            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

/// Bounding box of the ink of a digit, with exclusive upper bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkBounds {
    /// First column inside the box.
    pub x_min: usize,
    /// One past the last column inside the box.
    pub x_max: usize,
    /// First row inside the box.
    pub y_min: usize,
    /// One past the last row inside the box.
    pub y_max: usize,
}

/// An axis aligned region of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropBox {
    /// Column of the top-left corner.
    pub x: usize,
    /// Row of the top-left corner.
    pub y: usize,
    /// Size of the region.
    pub size: ImageSize,
}

// ink is dark, so the mass of a pixel is its distance to white
#[inline]
fn ink_mass(v: u8) -> u64 {
    (u8::MAX - v) as u64
}

/// Per-row and per-column ink mass of an 8-bit image.
fn ink_projections(src: &Image<u8, 1>) -> (Vec<u64>, Vec<u64>) {
    let cols = src.cols();

    let rows = src
        .as_slice()
        .par_chunks_exact(cols)
        .map(|row| row.iter().map(|&v| ink_mass(v)).sum::<u64>())
        .collect::<Vec<_>>();

    let columns = src
        .as_slice()
        .par_chunks_exact(cols)
        .fold(
            || vec![0u64; cols],
            |mut acc, row| {
                acc.iter_mut()
                    .zip(row.iter())
                    .for_each(|(a, &v)| *a += ink_mass(v));
                acc
            },
        )
        .reduce(
            || vec![0u64; cols],
            |mut a, b| {
                a.iter_mut().zip(b.iter()).for_each(|(x, y)| *x += y);
                a
            },
        );

    (rows, columns)
}

/// Number of lines a sweep crosses before the excluded mass exceeds `limit`.
///
/// Returns the index of the line whose mass pushes the running total above
/// `limit`, or `None` when the sweep reaches the far edge first.
fn sweep<'a>(mass: impl Iterator<Item = &'a u64>, limit: f64) -> Option<usize> {
    let mut excluded = 0u64;
    mass.enumerate().find_map(|(i, &m)| {
        excluded += m;
        (excluded as f64 > limit).then_some(i)
    })
}

/// Locate the ink of a dark-on-light digit.
///
/// The ink mass of a pixel is `255 - value`. Four sweep lines advance from
/// the image edges inwards and stop as soon as the ink mass they have passed
/// exceeds `limite` times the total mass. At most a `limite` fraction of the
/// ink therefore lies outside the box on each side.
///
/// # Arguments
///
/// * `src` - The cleaned 8-bit image, 255 being the background.
/// * `limite` - Fraction of the total ink mass allowed outside each side.
///
/// # Errors
///
/// Returns [`ImageError::CropBoundsNotFound`] with the failing direction when a
/// sweep crosses the whole image, which happens for images without ink, and
/// [`ImageError::CropSweepsCrossed`] with both directions when two opposite
/// sweeps pass each other and leave an empty box.
///
/// # Example
///
/// ```
/// use inkdigit_image::{Image, ImageSize};
/// use inkdigit_imgproc::crop::{ink_bounds, InkBounds};
///
/// #[rustfmt::skip]
/// let image = Image::<u8, 1>::new(ImageSize { width: 4, height: 3 }, vec![
///     255, 255, 255, 255,
///     255,   0,   0, 255,
///     255, 255, 255, 255,
/// ]).unwrap();
///
/// let bounds = ink_bounds(&image, 0.01).unwrap();
/// assert_eq!(bounds, InkBounds { x_min: 1, x_max: 3, y_min: 1, y_max: 2 });
/// ```
pub fn ink_bounds(src: &Image<u8, 1>, limite: f64) -> Result<InkBounds, ImageError> {
    if src.is_empty() {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }

    let (rows, columns) = ink_projections(src);
    let total: u64 = rows.iter().sum();
    let limit = total as f64 * limite;

    let y_min = sweep(rows.iter(), limit).ok_or(ImageError::CropBoundsNotFound(
        ScanDirection::TopDown,
    ))?;
    let y_max = rows.len()
        - sweep(rows.iter().rev(), limit).ok_or(ImageError::CropBoundsNotFound(
            ScanDirection::BottomUp,
        ))?;
    let x_min = sweep(columns.iter(), limit).ok_or(ImageError::CropBoundsNotFound(
        ScanDirection::LeftRight,
    ))?;
    let x_max = columns.len()
        - sweep(columns.iter().rev(), limit).ok_or(ImageError::CropBoundsNotFound(
            ScanDirection::RightLeft,
        ))?;

    if y_min >= y_max {
        return Err(ImageError::CropSweepsCrossed(
            ScanDirection::TopDown,
            ScanDirection::BottomUp,
        ));
    }
    if x_min >= x_max {
        return Err(ImageError::CropSweepsCrossed(
            ScanDirection::LeftRight,
            ScanDirection::RightLeft,
        ));
    }

    Ok(InkBounds {
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

/// Expand ink bounds into a padded square region clipped to the image.
///
/// The side is `f_lados` times the longest side of the bounds, centred on the
/// centre of the bounds. Corners are rounded half to even and then clipped to
/// `image_size`, so the region may be smaller than the square near the edges.
///
/// # Arguments
///
/// * `bounds` - The ink bounds.
/// * `f_lados` - Padding multiplier applied to the longest side.
/// * `image_size` - The size of the image the bounds were computed on.
pub fn square_crop_box(bounds: &InkBounds, f_lados: f64, image_size: ImageSize) -> CropBox {
    let delta_x = (bounds.x_max - bounds.x_min) as f64;
    let delta_y = (bounds.y_max - bounds.y_min) as f64;
    let delta = delta_x.max(delta_y);

    let x_cent = bounds.x_min as f64 + delta_x / 2.0;
    let y_cent = bounds.y_min as f64 + delta_y / 2.0;
    let half = f_lados * delta / 2.0;

    let clip = |v: f64, upper: usize| v.round_ties_even().clamp(0.0, upper as f64) as usize;

    let x0 = clip(x_cent - half, image_size.width);
    let x1 = clip(x_cent + half, image_size.width);
    let y0 = clip(y_cent - half, image_size.height);
    let y1 = clip(y_cent + half, image_size.height);

    CropBox {
        x: x0,
        y: y0,
        size: ImageSize {
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        },
    }
}

/// Crop a cleaned digit image to a padded square around its ink.
///
/// Combines [`ink_bounds`], [`square_crop_box`] and [`crop_image`]. The crop
/// keeps the input convention, 255 being the background.
///
/// # Arguments
///
/// * `src` - The cleaned 8-bit image.
/// * `limite` - Fraction of the total ink mass allowed outside each side.
/// * `f_lados` - Padding multiplier applied to the longest side.
///
/// # Errors
///
/// Propagates the errors of [`ink_bounds`].
pub fn auto_crop(src: &Image<u8, 1>, limite: f64, f_lados: f64) -> Result<Image<u8, 1>, ImageError> {
    let bounds = ink_bounds(src, limite)?;
    let crop_box = square_crop_box(&bounds, f_lados, src.size());
    log::trace!("ink bounds {bounds:?}, crop box {crop_box:?}");

    let mut dst = Image::<u8, 1>::from_size_val(crop_box.size, u8::MAX)?;
    crop_image(src, &mut dst, crop_box.x, crop_box.y)?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::{CropBox, InkBounds};
    use inkdigit_image::{Image, ImageError, ImageSize, ScanDirection};
    use rand::Rng;

    fn white_with_square(size: ImageSize, x: usize, y: usize, side: usize) -> Image<u8, 1> {
        let mut data = vec![255u8; size.area()];
        for r in y..y + side {
            for c in x..x + side {
                data[r * size.width + c] = 0;
            }
        }
        Image::new(size, data).unwrap()
    }

    #[test]
    fn test_crop() -> Result<(), ImageError> {
        let image_size = ImageSize {
            width: 2,
            height: 3,
        };

        #[rustfmt::skip]
        let image = Image::<_, 3>::new(
            image_size,
            vec![
                0u8, 1, 2, 3, 4, 5,
                6u8, 7, 8, 9, 10, 11,
                12u8, 13, 14, 15, 16, 17,
            ],
        )?;

        let data_expected = vec![9u8, 10, 11, 15, 16, 17];

        let crop_size = ImageSize {
            width: 1,
            height: 2,
        };

        let mut cropped = Image::<_, 3>::from_size_val(crop_size, 0u8)?;

        super::crop_image(&image, &mut cropped, 1, 1)?;

        assert_eq!(cropped.as_slice(), &data_expected);

        Ok(())
    }

    #[test]
    fn test_crop_out_of_bounds() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([4, 4].into(), 0)?;
        let mut cropped = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        assert_eq!(
            super::crop_image(&image, &mut cropped, 2, 0),
            Err(ImageError::InvalidImageSize(4, 4, 5, 3))
        );
        Ok(())
    }

    #[test]
    fn ink_bounds_centered_square() -> Result<(), ImageError> {
        let image = white_with_square([100, 100].into(), 40, 40, 20);
        let bounds = super::ink_bounds(&image, 0.02)?;
        assert_eq!(
            bounds,
            InkBounds {
                x_min: 40,
                x_max: 60,
                y_min: 40,
                y_max: 60
            }
        );
        Ok(())
    }

    #[test]
    fn ink_bounds_tolerate_stray_ink() -> Result<(), ImageError> {
        let mut image = white_with_square([60, 60].into(), 20, 20, 20);
        // a faint speck far from the digit, well below 5% of the mass
        image.as_slice_mut()[2 * 60 + 2] = 100;

        let bounds = super::ink_bounds(&image, 0.05)?;
        assert_eq!(bounds.x_min, 20);
        assert_eq!(bounds.y_min, 20);

        // with a tiny limit the speck is kept inside
        let bounds = super::ink_bounds(&image, 1e-9)?;
        assert_eq!(bounds.x_min, 2);
        assert_eq!(bounds.y_min, 2);
        assert_eq!(bounds.x_max, 40);
        assert_eq!(bounds.y_max, 40);

        Ok(())
    }

    #[test]
    fn ink_bounds_blank_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([50, 50].into(), 255)?;
        assert_eq!(
            super::ink_bounds(&image, 0.02),
            Err(ImageError::CropBoundsNotFound(ScanDirection::TopDown))
        );
        Ok(())
    }

    #[test]
    fn ink_bounds_crossing_sweeps() -> Result<(), ImageError> {
        // rows 3..7: top stops at row 6, bottom at row 3
        let image = white_with_square([10, 10].into(), 3, 3, 4);
        assert_eq!(
            super::ink_bounds(&image, 0.9),
            Err(ImageError::CropSweepsCrossed(
                ScanDirection::TopDown,
                ScanDirection::BottomUp
            ))
        );

        // a single ink row keeps the rows apart, only the columns cross
        let size = ImageSize {
            width: 10,
            height: 10,
        };
        let data = (0..size.area())
            .map(|i| if i / 10 == 5 && (2..8).contains(&(i % 10)) { 0 } else { 255 })
            .collect();
        let image = Image::<u8, 1>::new(size, data)?;
        assert_eq!(
            super::ink_bounds(&image, 0.9),
            Err(ImageError::CropSweepsCrossed(
                ScanDirection::LeftRight,
                ScanDirection::RightLeft
            ))
        );
        Ok(())
    }

    #[test]
    fn square_box_padding() {
        let bounds = InkBounds {
            x_min: 40,
            x_max: 60,
            y_min: 45,
            y_max: 55,
        };
        let crop_box = super::square_crop_box(&bounds, 1.4, [100, 100].into());
        assert_eq!(
            crop_box,
            CropBox {
                x: 36,
                y: 36,
                size: [28, 28].into()
            }
        );
    }

    #[test]
    fn square_box_rounds_half_to_even() {
        // center 5.5, half side 1.5 -> corners 4.0 and 7.0
        let bounds = InkBounds {
            x_min: 4,
            x_max: 7,
            y_min: 4,
            y_max: 7,
        };
        let crop_box = super::square_crop_box(&bounds, 1.0, [20, 20].into());
        assert_eq!(crop_box.x, 4);
        assert_eq!(crop_box.size.width, 3);

        // center 2.5 and half side 2.0 put both corners on a tie: 0.5 and 4.5
        let crop_box = super::square_crop_box(
            &InkBounds {
                x_min: 2,
                x_max: 3,
                y_min: 0,
                y_max: 4,
            },
            1.0,
            [20, 20].into(),
        );
        assert_eq!(crop_box.x, 0);
        assert_eq!(crop_box.size.width, 4);
        assert_eq!(crop_box.y, 0);
        assert_eq!(crop_box.size.height, 4);
    }

    #[test]
    fn square_box_clipped_to_image() {
        let bounds = InkBounds {
            x_min: 0,
            x_max: 10,
            y_min: 90,
            y_max: 100,
        };
        let crop_box = super::square_crop_box(&bounds, 2.0, [100, 100].into());
        assert_eq!(crop_box.x, 0);
        assert_eq!(crop_box.y, 85);
        assert_eq!(crop_box.size, [15, 15].into());
    }

    #[test]
    fn auto_crop_containment() -> Result<(), ImageError> {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let width = rng.random_range(8..80);
            let height = rng.random_range(8..80);
            let side = rng.random_range(1..width.min(height));
            let x = rng.random_range(0..=width - side);
            let y = rng.random_range(0..=height - side);
            let image = white_with_square([width, height].into(), x, y, side);

            let bounds = super::ink_bounds(&image, 1e-6)?;
            assert_eq!(
                bounds,
                InkBounds {
                    x_min: x,
                    x_max: x + side,
                    y_min: y,
                    y_max: y + side
                }
            );

            let f_lados = rng.random_range(1.0..2.0);
            let crop_box = super::square_crop_box(&bounds, f_lados, image.size());
            assert!(crop_box.x + crop_box.size.width <= width);
            assert!(crop_box.y + crop_box.size.height <= height);

            let cropped = super::auto_crop(&image, 1e-6, f_lados)?;
            assert_eq!(cropped.size(), crop_box.size);
            assert!(cropped.as_slice().contains(&0));
        }
        Ok(())
    }

    #[test]
    fn auto_crop_tight_box() -> Result<(), ImageError> {
        let image = white_with_square([30, 20].into(), 5, 4, 6);
        let cropped = super::auto_crop(&image, 1e-6, 1.0)?;
        assert_eq!(cropped.size(), [6, 6].into());
        assert!(cropped.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }
}
