//! Truncated-Taylor dual numbers for forward autodifferentiation

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

/// Dual number holding a value and up to three derivatives with respect to
/// the parameter identified by `Param`.
///
/// Binary operations truncate to the shorter operand's length. There is no
/// error type: non-positive inputs to [`DualNum::recip`] and
/// [`DualNum::sqrt`] propagate ordinary floating-point NaN/infinity.
pub struct DualNum<Param> {
    values: [f64; 4],
    len: usize,
    param: PhantomData<Param>,
}

// Manual impls keep `Param` free of `Clone`/`Copy` bounds.
impl<Param> Clone for DualNum<Param> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Param> Copy for DualNum<Param> {}

impl<Param> fmt::Debug for DualNum<Param> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values().iter()).finish()
    }
}

impl<Param> DualNum<Param> {
    /// Creates a dual number from its raw derivative tuple (at most four
    /// entries: value, then derivatives 1-3).
    pub fn new(values: &[f64]) -> Self {
        assert!(values.len() <= 4);
        let mut vs = [0.0; 4];
        vs[..values.len()].copy_from_slice(values);
        DualNum {
            values: vs,
            len: values.len(),
            param: PhantomData,
        }
    }

    fn zeros(len: usize) -> Self {
        assert!(len <= 4, "dual number length {} exceeds the storage cap of 4", len);
        DualNum {
            values: [0.0; 4],
            len,
            param: PhantomData,
        }
    }

    /// Makes the dual number `(c, 0, ..., 0)` of length `n` representing a
    /// constant function.
    pub fn constant(c: f64, n: usize) -> Self {
        let mut out = Self::zeros(n);
        if n > 0 {
            out.values[0] = c;
        }
        out
    }

    /// Makes the dual number `(x0, 1, 0, ..., 0)` of length `n` representing
    /// the parameter itself at `x0`.
    pub fn variable(x0: f64, n: usize) -> Self {
        let mut out = Self::zeros(n);
        if n > 0 {
            out.values[0] = x0;
        }
        if n > 1 {
            out.values[1] = 1.0;
        }
        out
    }

    /// Prepends `x`, shifting `d`'s entries into the derivative slots.
    pub fn cons(x: f64, d: DualNum<Param>) -> Self {
        let mut out = Self::zeros((d.len + 1).min(4));
        out.values[0] = x;
        for i in 1..out.len {
            out.values[i] = d.values[i - 1];
        }
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn value(&self) -> f64 {
        self.values[0]
    }

    pub fn values(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Discards the first `n` slots, promoting derivatives to values
    /// (e.g. extracting a velocity from a position dual).
    pub fn drop_first(&self, n: usize) -> Self {
        let mut out = Self::zeros(self.len - n);
        for i in 0..out.len {
            out.values[i] = self.values[i + n];
        }
        out
    }

    /// Reinterprets this dual number as differentiated with respect to a
    /// different parameter without touching the entries.
    pub fn retag<NewParam>(&self) -> DualNum<NewParam> {
        DualNum {
            values: self.values,
            len: self.len,
            param: PhantomData,
        }
    }

    pub fn recip(&self) -> Self {
        let mut out = Self::zeros(self.len);
        if out.len == 0 {
            return out;
        }

        let recip = 1.0 / self.values[0];
        out.values[0] = recip;
        if out.len == 1 {
            return out;
        }

        let neg_recip = -recip;
        let neg_recip2 = recip * neg_recip;
        let deriv = neg_recip2 * self.values[1];
        out.values[1] = deriv;
        if out.len == 2 {
            return out;
        }

        let int1 = 2.0 * neg_recip * deriv;
        let deriv2 = int1 * self.values[1] + neg_recip2 * self.values[2];
        out.values[2] = deriv2;
        if out.len == 3 {
            return out;
        }

        let int2 = int1 * self.values[2];
        out.values[3] = int2 + neg_recip2 * self.values[3] + int2
            - 2.0 * (deriv * deriv + recip * deriv2) * self.values[1];
        out
    }

    pub fn sqrt(&self) -> Self {
        let mut out = Self::zeros(self.len);
        if out.len == 0 {
            return out;
        }

        let sqrt = self.values[0].sqrt();
        out.values[0] = sqrt;
        if out.len == 1 {
            return out;
        }

        let recip = 1.0 / (2.0 * sqrt);
        let deriv = recip * self.values[1];
        out.values[1] = deriv;
        if out.len == 2 {
            return out;
        }

        let neg_recip = -2.0 * recip;
        let neg_recip2 = recip * neg_recip;
        let int1 = neg_recip2 * deriv;
        let second_deriv = int1 * self.values[1] + recip * self.values[2];
        out.values[2] = second_deriv;
        if out.len == 3 {
            return out;
        }

        let int2 = 2.0 * int1;
        out.values[3] = recip * self.values[3]
            + int2 * self.values[2]
            + (deriv * neg_recip * int2 + neg_recip2 * second_deriv) * self.values[1];
        out
    }

    pub fn sin(&self) -> Self {
        let mut out = Self::zeros(self.len);
        if out.len == 0 {
            return out;
        }

        let sin = self.values[0].sin();
        out.values[0] = sin;
        if out.len == 1 {
            return out;
        }

        let cos = self.values[0].cos();
        let deriv = cos * self.values[1];
        out.values[1] = deriv;
        if out.len == 2 {
            return out;
        }

        let in_deriv2 = self.values[1] * self.values[1];
        out.values[2] = cos * self.values[2] - sin * in_deriv2;
        if out.len == 3 {
            return out;
        }

        out.values[3] =
            cos * self.values[3] - 3.0 * sin * self.values[1] * self.values[2] - deriv * in_deriv2;
        out
    }

    pub fn cos(&self) -> Self {
        let mut out = Self::zeros(self.len);
        if out.len == 0 {
            return out;
        }

        let cos = self.values[0].cos();
        out.values[0] = cos;
        if out.len == 1 {
            return out;
        }

        let sin = self.values[0].sin();
        let neg_in_deriv = -self.values[1];
        let deriv = sin * neg_in_deriv;
        out.values[1] = deriv;
        if out.len == 2 {
            return out;
        }

        let int = cos * neg_in_deriv;
        out.values[2] = int * self.values[1] - sin * self.values[2];
        if out.len == 3 {
            return out;
        }

        out.values[3] =
            deriv * neg_in_deriv * self.values[1] + 3.0 * int * self.values[2] - sin * self.values[3];
        out
    }

    /// Substitutes parameters via the chain rule: given this dual number's
    /// derivatives with respect to `Param` and `old_param`'s derivatives of
    /// `Param` with respect to `NewParam`, yields this quantity's
    /// derivatives with respect to `NewParam`.
    pub fn reparam<NewParam>(&self, old_param: DualNum<NewParam>) -> DualNum<NewParam> {
        let mut out = DualNum::<NewParam>::zeros(self.len.min(old_param.len));
        if out.len == 0 {
            return out;
        }

        out.values[0] = self.values[0];
        if out.len == 1 {
            return out;
        }

        out.values[1] = self.values[1] * old_param.values[1];
        if out.len == 2 {
            return out;
        }

        let old_deriv2 = old_param.values[1] * old_param.values[1];
        out.values[2] = old_deriv2 * self.values[2] + old_param.values[2] * self.values[1];
        if out.len == 3 {
            return out;
        }

        out.values[3] = self.values[1] * old_param.values[3]
            + (3.0 * self.values[2] * old_param.values[2] + self.values[3] * old_deriv2)
                * old_param.values[1];
        out
    }
}

impl<Param> Index<usize> for DualNum<Param> {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.values()[i]
    }
}

impl<Param> Add for DualNum<Param> {
    type Output = DualNum<Param>;

    fn add(self, d: DualNum<Param>) -> DualNum<Param> {
        let mut out = Self::zeros(self.len.min(d.len));
        for i in 0..out.len {
            out.values[i] = self.values[i] + d.values[i];
        }
        out
    }
}

impl<Param> Sub for DualNum<Param> {
    type Output = DualNum<Param>;

    fn sub(self, d: DualNum<Param>) -> DualNum<Param> {
        let mut out = Self::zeros(self.len.min(d.len));
        for i in 0..out.len {
            out.values[i] = self.values[i] - d.values[i];
        }
        out
    }
}

impl<Param> Mul for DualNum<Param> {
    type Output = DualNum<Param>;

    fn mul(self, d: DualNum<Param>) -> DualNum<Param> {
        let mut out = Self::zeros(self.len.min(d.len));
        if out.len == 0 {
            return out;
        }

        out.values[0] = self.values[0] * d.values[0];
        if out.len == 1 {
            return out;
        }

        out.values[1] = self.values[0] * d.values[1] + self.values[1] * d.values[0];
        if out.len == 2 {
            return out;
        }

        out.values[2] = self.values[0] * d.values[2]
            + self.values[2] * d.values[0]
            + 2.0 * self.values[1] * d.values[1];
        if out.len == 3 {
            return out;
        }

        out.values[3] = self.values[0] * d.values[3]
            + self.values[3] * d.values[0]
            + 3.0 * (self.values[2] * d.values[1] + self.values[1] * d.values[2]);
        out
    }
}

impl<Param> Neg for DualNum<Param> {
    type Output = DualNum<Param>;

    fn neg(self) -> DualNum<Param> {
        let mut out = Self::zeros(self.len);
        for i in 0..out.len {
            out.values[i] = -self.values[i];
        }
        out
    }
}

impl<Param> Div for DualNum<Param> {
    type Output = DualNum<Param>;

    fn div(self, d: DualNum<Param>) -> DualNum<Param> {
        self * d.recip()
    }
}

impl<Param> Add<f64> for DualNum<Param> {
    type Output = DualNum<Param>;

    fn add(self, c: f64) -> DualNum<Param> {
        let mut out = self;
        if out.len > 0 {
            out.values[0] += c;
        }
        out
    }
}

impl<Param> Sub<f64> for DualNum<Param> {
    type Output = DualNum<Param>;

    fn sub(self, c: f64) -> DualNum<Param> {
        self + (-c)
    }
}

impl<Param> Mul<f64> for DualNum<Param> {
    type Output = DualNum<Param>;

    fn mul(self, c: f64) -> DualNum<Param> {
        let mut out = Self::zeros(self.len);
        for i in 0..out.len {
            out.values[i] = self.values[i] * c;
        }
        out
    }
}

impl<Param> Div<f64> for DualNum<Param> {
    type Output = DualNum<Param>;

    fn div(self, c: f64) -> DualNum<Param> {
        let mut out = Self::zeros(self.len);
        for i in 0..out.len {
            out.values[i] = self.values[i] / c;
        }
        out
    }
}
