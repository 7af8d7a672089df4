//! Exact ordering of an integer against a floating-point bound.
//!
//! Converting a large integer to `f64` rounds once it passes 2^53, which
//! would let values just beyond an inclusive bound slip through. The bound
//! is decomposed into its integral magnitude and a fractional flag instead,
//! so the comparison stays in integer arithmetic.

use std::cmp::Ordering;

const SIGN_SHIFT: u32 = 63;
const EXPONENT_SHIFT: u32 = 52;
const EXPONENT_MASK: u64 = 0x7ff;
const FRACTION_MASK: u64 = (1 << EXPONENT_SHIFT) - 1;
const IMPLICIT_BIT: u64 = 1 << EXPONENT_SHIFT;
/// Biased exponent at which the mantissa is a plain integer.
const INTEGRAL_EXPONENT: u64 = 1075;
/// Largest left shift that keeps a 53-bit mantissa inside `u128`.
const MAX_LEFT_SHIFT: u64 = 75;
const MANTISSA_BITS: u64 = 64;

/// Magnitude of a finite bound split at the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Magnitude {
    negative: bool,
    integral: Option<u128>,
    fractional: bool,
}

impl Magnitude {
    fn of(bound: f64) -> Option<Self> {
        let bits = bound.to_bits();
        let negative = bits >> SIGN_SHIFT == 1;
        let biased = (bits >> EXPONENT_SHIFT) & EXPONENT_MASK;
        let fraction = bits & FRACTION_MASK;

        if biased == EXPONENT_MASK {
            // Infinite bounds sit beyond every integer; NaN has no order.
            return (fraction == 0).then_some(Self {
                negative,
                integral: None,
                fractional: false,
            });
        }
        if biased == 0 {
            return Some(Self {
                negative,
                integral: Some(0),
                fractional: fraction != 0,
            });
        }

        let mantissa = fraction | IMPLICIT_BIT;
        if biased >= INTEGRAL_EXPONENT {
            let shift = biased - INTEGRAL_EXPONENT;
            let integral = u32::try_from(shift)
                .ok()
                .filter(|_| shift <= MAX_LEFT_SHIFT)
                .and_then(|bits_left| u128::from(mantissa).checked_shl(bits_left));
            return Some(Self {
                negative,
                integral,
                fractional: false,
            });
        }

        let shift = INTEGRAL_EXPONENT - biased;
        if shift >= MANTISSA_BITS {
            return Some(Self {
                negative,
                integral: Some(0),
                fractional: true,
            });
        }
        let low_bits = (1_u64 << shift) - 1;
        Some(Self {
            negative,
            integral: Some(u128::from(mantissa >> shift)),
            fractional: mantissa & low_bits != 0,
        })
    }

    /// Orders a value against the unsigned magnitude.
    fn order(self, value: i128) -> Ordering {
        let Some(integral) = self.integral else {
            return Ordering::Less;
        };
        if value < 0 {
            return Ordering::Less;
        }
        match value.unsigned_abs().cmp(&integral) {
            Ordering::Equal if self.fractional => Ordering::Less,
            ordering => ordering,
        }
    }
}

/// Orders `value` against `bound` without rounding either side.
///
/// Returns `None` when the bound is NaN.
pub(super) fn compare_integer(value: i128, bound: f64) -> Option<Ordering> {
    let magnitude = Magnitude::of(bound)?;
    if magnitude.negative {
        Some(magnitude.order(-value).reverse())
    } else {
        Some(magnitude.order(value))
    }
}
