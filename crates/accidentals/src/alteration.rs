//! Exact rational alteration values.

use std::{
    fmt::{self, Display, Formatter},
    ops::Neg,
    str::FromStr,
};

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The pitch change an accidental represents, as an exact fraction.
///
/// Written `"1/2"`, `"-2/3"`, `"0"` or as a bare JSON integer. Values are
/// always kept in lowest terms with a positive denominator, so equal
/// alterations compare and hash equal. `i64::MIN` is never a valid numerator
/// or denominator, which keeps negation and normalization overflow-free.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "AlterationRepr", into = "String")]
pub struct Alteration(Ratio<i64>);

#[derive(Deserialize)]
#[serde(untagged)]
enum AlterationRepr {
    Integer(i64),
    Text(String),
}

impl Alteration {
    pub const ZERO: Self = Self(Ratio::new_raw(0, 1));

    /// Create `numer/denom` in lowest terms.
    ///
    /// `None` for a zero denominator or when either part is `i64::MIN`.
    pub fn new(numer: i64, denom: i64) -> Option<Self> {
        (denom != 0 && numer != i64::MIN && denom != i64::MIN).then(|| Self(Ratio::new(numer, denom)))
    }

    /// Whole-number alteration; `None` for `i64::MIN`.
    pub fn integer(value: i64) -> Option<Self> {
        Self::new(value, 1)
    }

    pub fn numer(self) -> i64 {
        *self.0.numer()
    }

    pub fn denom(self) -> i64 {
        *self.0.denom()
    }

    pub fn ratio(self) -> Ratio<i64> {
        self.0
    }

    /// Number of `1/denominator` steps this value spans, if it is a whole number of them.
    ///
    /// `None` as well when the step count does not fit in an `i64`.
    pub fn steps(self, denominator: u32) -> Option<i64> {
        let n = i64::from(denominator);
        // p/q is in lowest terms, so p*n/q is whole exactly when q divides n.
        if n == 0 || n % self.denom() != 0 {
            return None;
        }
        self.numer().checked_mul(n / self.denom())
    }

    /// Alteration of `steps` units of `1/denominator`.
    pub fn from_steps(steps: i64, denominator: u32) -> Option<Self> {
        Self::new(steps, i64::from(denominator))
    }

    pub fn is_zero(self) -> bool {
        self.numer() == 0
    }
}

impl Neg for Alteration {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Display for Alteration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.denom() == 1 {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

impl FromStr for Alteration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAlteration(s.to_string());
        let text = s.trim();
        match text.split_once('/') {
            Some((numer, denom)) => {
                let numer: i64 = numer.trim().parse().map_err(|_| invalid())?;
                let denom: i64 = denom.trim().parse().map_err(|_| invalid())?;
                Self::new(numer, denom).ok_or_else(invalid)
            }
            None => {
                let value: i64 = text.parse().map_err(|_| invalid())?;
                Self::integer(value).ok_or_else(invalid)
            }
        }
    }
}

impl TryFrom<AlterationRepr> for Alteration {
    type Error = Error;

    fn try_from(repr: AlterationRepr) -> Result<Self, Self::Error> {
        match repr {
            AlterationRepr::Integer(value) => {
                Self::integer(value).ok_or_else(|| Error::InvalidAlteration(value.to_string()))
            }
            AlterationRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Alteration> for String {
    fn from(alteration: Alteration) -> Self {
        alteration.to_string()
    }
}
