//! Two dimensional affine transforms between data grid coordinates
//! `(row, col)` and map coordinates `(x, y)`
use crate::Error;
use log::warn;

/// A 6-coefficient affine transform:
///
/// ```txt
/// x = a*row + b*col + c
/// y = d*row + e*col + f
/// ```
///
/// Note that the input order is `(row, col)`: a north-up grid has
/// `a = 0, e = 0`, with the pixel width in `b` and the negated pixel
/// height in `d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Affine::identity()
    }
}

impl Affine {
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Affine { a, b, c, d, e, f }
    }

    #[must_use]
    pub fn identity() -> Self {
        Affine::new(1., 0., 0., 0., 1., 0.)
    }

    /// Pure translation by `(dr, dc)`
    #[must_use]
    pub fn translation(dr: f64, dc: f64) -> Self {
        Affine::new(1., 0., dr, 0., 1., dc)
    }

    /// Pure scaling by `(sr, sc)`
    #[must_use]
    pub fn scaling(sr: f64, sc: f64) -> Self {
        Affine::new(sr, 0., 0., 0., sc, 0.)
    }

    /// From the column major flat matrix `[a, d, b, e, c, f]`, the
    /// layout used when affines are stored alongside GCTP parameters.
    #[must_use]
    pub fn from_flat(m: &[f64; 6]) -> Self {
        Affine::new(m[0], m[2], m[4], m[1], m[3], m[5])
    }

    /// The column major flat matrix `[a, d, b, e, c, f]`
    #[must_use]
    pub fn to_flat(&self) -> [f64; 6] {
        [self.a, self.d, self.b, self.e, self.c, self.f]
    }

    /// The affine of a north-up grid of `dims = [rows, cols]` pixels of
    /// size `pixel_dims = [height, width]`, centered on the map point
    /// `(x, y)`.
    #[must_use]
    pub fn centered(x: f64, y: f64, pixel_dims: [f64; 2], dims: [usize; 2]) -> Self {
        let [height, width] = pixel_dims;
        let rows = dims[0] as f64;
        let cols = dims[1] as f64;
        Affine::new(
            0.,
            width,
            x - width * (cols - 1.) / 2.,
            -height,
            0.,
            y + height * (rows - 1.) / 2.,
        )
    }

    /// Apply the transform to `(row, col)`
    #[must_use]
    pub fn forward(&self, row: f64, col: f64) -> (f64, f64) {
        (
            self.a * row + self.b * col + self.c,
            self.d * row + self.e * col + self.f,
        )
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Compute the inverse affine transform.
    pub fn inverse(&self) -> Result<Affine, Error> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            warn!("Affine: singular transform (determinant {det})");
            return Err(Error::NonInvertible);
        }
        let inv_det = 1.0 / det;
        Ok(Affine {
            a: self.e * inv_det,
            b: -self.b * inv_det,
            c: (self.b * self.f - self.e * self.c) * inv_det,
            d: -self.d * inv_det,
            e: self.a * inv_det,
            f: (self.d * self.c - self.a * self.f) * inv_det,
        })
    }

    /// The transform applying `first`, then `self`
    #[must_use]
    pub fn compose(&self, first: &Affine) -> Affine {
        Affine {
            a: self.a * first.a + self.b * first.d,
            b: self.a * first.b + self.b * first.e,
            c: self.a * first.c + self.b * first.f + self.c,
            d: self.d * first.a + self.e * first.d,
            e: self.d * first.b + self.e * first.e,
            f: self.d * first.c + self.e * first.f + self.f,
        }
    }

    /// Shift the input grid by `(dr, dc)` before applying `self`
    #[must_use]
    pub fn translated(&self, dr: f64, dc: f64) -> Affine {
        self.compose(&Affine::translation(dr, dc))
    }

    /// Scale the input grid by `(sr, sc)` before applying `self`
    #[must_use]
    pub fn scaled(&self, sr: f64, sc: f64) -> Affine {
        self.compose(&Affine::scaling(sr, sc))
    }

    /// Coefficient-wise comparison within a relative tolerance of 1e-10
    #[must_use]
    pub fn almost_eq(&self, other: &Affine) -> bool {
        almost_equal(&self.to_flat(), &other.to_flat())
    }
}

/// Compare two arrays element by element, accepting values that are
/// identical or within a relative difference of 1e-10.
pub fn almost_equal(x: &[f64], y: &[f64]) -> bool {
    if x.len() != y.len() {
        return false;
    }
    x.iter().zip(y).all(|(&a, &b)| {
        if a == b {
            return true;
        }
        let relative = ((a - b) / a.abs().max(b.abs())).abs();
        relative <= 1e-10
    })
}

// ----- T E S T S ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn forward_and_inverse() -> Result<(), Error> {
        // 1 km pixels, north-up, 512x512 grid centered at the origin
        let aff = Affine::centered(0., 0., [1000., 1000.], [512, 512]);
        let (x, y) = aff.forward(0., 0.);
        assert_eq!((x, y), (-255_500., 255_500.));
        let (x, y) = aff.forward(255.5, 255.5);
        assert_eq!((x, y), (0., 0.));

        let inv = aff.inverse()?;
        let (row, col) = inv.forward(-255_500., 255_500.);
        assert_float_eq!(row, 0., abs <= 1e-9);
        assert_float_eq!(col, 0., abs <= 1e-9);

        let (row, col) = inv.forward(1000., -2000.);
        assert_float_eq!(row, 257.5, abs <= 1e-9);
        assert_float_eq!(col, 256.5, abs <= 1e-9);

        let (x, y) = aff.compose(&inv).forward(1234., -5678.);
        assert_float_eq!(x, 1234., abs <= 1e-6);
        assert_float_eq!(y, -5678., abs <= 1e-6);
        Ok(())
    }

    #[test]
    fn singular() {
        let aff = Affine::new(0., 0., 0., 0., 0., 0.);
        assert!(matches!(aff.inverse(), Err(Error::NonInvertible)));
        let aff = Affine::centered(0., 0., [0., 1000.], [10, 10]);
        assert!(aff.inverse().is_err());
    }

    #[test]
    fn translate_and_scale() {
        let aff = Affine::centered(0., 0., [1000., 1000.], [11, 11]);
        let moved = aff.translated(2., 3.);
        assert_eq!(moved.forward(0., 0.), aff.forward(2., 3.));

        let strided = aff.translated(1., 1.).scaled(2., 2.);
        assert_eq!(strided.forward(2., 2.), aff.forward(5., 5.));
    }

    #[test]
    fn flat_layout() {
        let aff = Affine::new(1., 2., 3., 4., 5., 6.);
        assert_eq!(aff.to_flat(), [1., 4., 2., 5., 3., 6.]);
        assert_eq!(Affine::from_flat(&aff.to_flat()), aff);
    }

    #[test]
    fn relative_comparison() {
        assert!(almost_equal(&[1e6, 0.], &[1e6 + 1e-5, 0.]));
        assert!(!almost_equal(&[1e6, 0.], &[1e6 + 1e-3, 0.]));
        assert!(!almost_equal(&[1.], &[1., 2.]));
        assert!(!almost_equal(&[0.], &[1e-300]));
    }
}
