//! GF(2^8) arithmetic for the threshold splitter
//!
//! The field is built from the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//! (`0x11d`) with generator 2. Multiplication and division go through
//! log/exp tables computed at compile time. This is the field used by
//! `secrets.js` in its 8-bit configuration, which keeps our shares
//! interchangeable with it.

use std::ops::{Add, Div, Mul};

use zeroize::Zeroize;

const PRIMITIVE: u16 = 0x11d;
const ORDER: usize = 255;

struct Tables {
    exp: [u8; ORDER],
    log: [u8; 256],
}

const TABLES: Tables = build_tables();

const fn build_tables() -> Tables {
    let mut exp = [0u8; ORDER];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < ORDER {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x > 0xff {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    Tables { exp, log }
}

/// An element of GF(256)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroize)]
pub(crate) struct FieldElement(u8);

impl FieldElement {
    pub(crate) const ZERO: Self = FieldElement(0);
    pub(crate) const ONE: Self = FieldElement(1);

    fn log(self) -> usize {
        TABLES.log[self.0 as usize] as usize
    }

    fn exp(power: usize) -> Self {
        FieldElement(TABLES.exp[power % ORDER])
    }

    /// Evaluate `coeffs[0] + coeffs[1]·x + ...` with Horner's method
    pub(crate) fn evaluate(coeffs: &[u8], x: Self) -> Self {
        coeffs
            .iter()
            .rev()
            .fold(Self::ZERO, |acc, &c| acc * x + FieldElement(c))
    }

    /// Lagrange interpolation of the polynomial through `points`, evaluated at `at`
    ///
    /// All `x` coordinates must be distinct. With fewer points than the degree
    /// of the original polynomial plus one, the result is some other value of
    /// the field; nothing here can detect that.
    pub(crate) fn interpolate(points: &[(Self, Self)], at: Self) -> Self {
        let mut acc = Self::ZERO;

        for (i, &(xi, yi)) in points.iter().enumerate() {
            let mut num = Self::ONE;
            let mut den = Self::ONE;

            for (j, &(xj, _)) in points.iter().enumerate() {
                if i != j {
                    // subtraction is addition in characteristic 2
                    num = num * (at + xj);
                    den = den * (xi + xj);
                }
            }

            acc = acc + yi * (num / den);
        }

        acc
    }
}

impl From<u8> for FieldElement {
    fn from(n: u8) -> Self {
        FieldElement(n)
    }
}

impl From<FieldElement> for u8 {
    fn from(e: FieldElement) -> Self {
        e.0
    }
}

impl Add for FieldElement {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        FieldElement(self.0 ^ rhs.0)
    }
}

impl Mul for FieldElement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return Self::ZERO;
        }
        Self::exp(self.log() + rhs.log())
    }
}

impl Div for FieldElement {
    type Output = Self;

    /// Division by zero yields zero; callers only divide by products of
    /// differences of distinct coordinates, which are never zero.
    fn div(self, rhs: Self) -> Self {
        debug_assert!(rhs.0 != 0, "division by zero in GF(256)");
        if self.0 == 0 || rhs.0 == 0 {
            return Self::ZERO;
        }
        Self::exp(self.log() + ORDER - rhs.log())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn slow_mul(mut a: u8, mut b: u8) -> u8 {
        let mut res = 0u8;
        while b != 0 {
            if b & 1 != 0 {
                res ^= a;
            }
            let carry = a & 0x80;
            a <<= 1;
            if carry != 0 {
                a ^= (PRIMITIVE & 0xff) as u8;
            }
            b >>= 1;
        }
        res
    }

    #[test]
    fn test_tables_match_bitwise_multiplication() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let product = FieldElement::from(a) * FieldElement::from(b);
                assert_eq!(u8::from(product), slow_mul(a, b));
            }
        }
    }

    #[test]
    fn test_division_inverts_multiplication() {
        for a in 0..=255u8 {
            for b in 1..=255u8 {
                let (a, b) = (FieldElement::from(a), FieldElement::from(b));
                assert_eq!((a * b) / b, a);
            }
        }
    }

    #[test]
    fn test_generator_has_full_order() {
        let mut seen = std::collections::HashSet::new();
        for i in 0..ORDER {
            seen.insert(TABLES.exp[i]);
        }
        assert_eq!(seen.len(), ORDER);
        assert!(!seen.contains(&0));
    }

    #[test]
    fn test_interpolate_recovers_constant_term() {
        // f(x) = 0x2a + 0x11 x + 0x07 x^2
        let coeffs = [0x2a, 0x11, 0x07];
        let points: Vec<_> = (1..=3u8)
            .map(|x| {
                let x = FieldElement::from(x);
                (x, FieldElement::evaluate(&coeffs, x))
            })
            .collect();
        assert_eq!(
            FieldElement::interpolate(&points, FieldElement::ZERO),
            FieldElement::from(0x2a)
        );

        // and any other point on the curve
        let at = FieldElement::from(200);
        assert_eq!(
            FieldElement::interpolate(&points, at),
            FieldElement::evaluate(&coeffs, at)
        );
    }
}
