//! Canonical text tokens for scalar command arguments.
//!
//! Every dtype has exactly one text form, chosen so the engine's parser
//! recovers the transmitted value: integers as plain decimal with no
//! grouping, floats as the shortest representation that round-trips, bools
//! as `true`/`false`. Cross-kind renderings (an integral float under an
//! integer dtype, an integer under a float dtype) are allowed only when
//! exact; everything else is a format error.

use crate::dtype::{Dtype, Scalar};
use crate::error::{ArraywireError, Result};

/// Canonical numeric token formatter.
pub struct NumericText;

impl NumericText {
    /// Plain decimal integer token.
    #[inline]
    pub fn int_token(value: i64) -> String {
        value.to_string()
    }

    /// Shortest round-trip float token. Non-finite values render as
    /// `nan` / `inf` / `-inf`, the spellings the engine's parser accepts.
    #[inline]
    pub fn float_token(value: f64) -> String {
        // `Display` spells NaN `NaN`; the wire convention is lowercase.
        if value.is_nan() {
            return "nan".to_string();
        }
        format!("{value}")
    }

    /// `true` / `false`.
    #[inline]
    pub fn bool_token(value: bool) -> String {
        value.to_string()
    }

    /// Render a scalar in the target dtype's canonical form.
    ///
    /// # Errors
    ///
    /// `Format` when the value cannot be rendered exactly in the target
    /// dtype's form: a fractional or out-of-range float under `Int64`, an
    /// integer too large for lossless `f64` conversion under `Float64`, or
    /// a boolean under a numeric dtype.
    pub fn scalar_token(value: Scalar, dtype: Dtype) -> Result<String> {
        match (value, dtype) {
            (Scalar::Int(v), Dtype::Int64) => Ok(Self::int_token(v)),
            (Scalar::Float(v), Dtype::Float64) => Ok(Self::float_token(v)),
            (Scalar::Bool(v), Dtype::Bool) => Ok(Self::bool_token(v)),
            // Integer bounds under a bool dtype keep their decimal form;
            // the engine reads them as the generator's 0/1 range.
            (Scalar::Int(v), Dtype::Bool) => Ok(Self::int_token(v)),
            (Scalar::Int(v), Dtype::Float64) => {
                let f = v as f64;
                // Compare in i128 so the saturating back-cast at the top
                // of the i64 range cannot fake a match.
                if f as i128 == v as i128 {
                    Ok(Self::float_token(f))
                } else {
                    Err(format_error(value, dtype))
                }
            }
            (Scalar::Float(v), Dtype::Int64) => {
                if v.is_finite()
                    && v.fract() == 0.0
                    && v as i128 >= i64::MIN as i128
                    && v as i128 <= i64::MAX as i128
                {
                    Ok(Self::int_token(v as i64))
                } else {
                    Err(format_error(value, dtype))
                }
            }
            (Scalar::Bool(_), Dtype::Int64 | Dtype::Float64)
            | (Scalar::Float(_), Dtype::Bool) => Err(format_error(value, dtype)),
        }
    }
}

fn format_error(value: Scalar, dtype: Dtype) -> ArraywireError {
    ArraywireError::Format {
        value: value.to_string(),
        dtype,
    }
}
