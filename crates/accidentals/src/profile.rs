//! EDO tuning profiles: which alteration values a font variant must support.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    alteration::Alteration,
    error::{Error, Result},
};

/// Most `k/N` values a single profile `range` may expand to.
pub const MAX_RANGE_STEPS: usize = 1024;

/// The equal divisions of the octave the font family ships variants for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Edo {
    Twelve,
    TwentyFour,
    SeventyTwo,
}

impl Edo {
    pub const ALL: [Self; 3] = [Self::Twelve, Self::TwentyFour, Self::SeventyTwo];

    pub const fn denominator(self) -> u32 {
        match self {
            Self::Twelve => 12,
            Self::TwentyFour => 24,
            Self::SeventyTwo => 72,
        }
    }

    pub fn from_denominator(denominator: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|edo| edo.denominator() == denominator)
    }
}

impl TryFrom<u32> for Edo {
    type Error = Error;

    fn try_from(denominator: u32) -> Result<Self> {
        Self::from_denominator(denominator).ok_or(Error::UnsupportedDenominator(denominator))
    }
}

impl From<Edo> for u32 {
    fn from(edo: Edo) -> Self {
        edo.denominator()
    }
}

impl fmt::Display for Edo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-EDO", self.denominator())
    }
}

/// One profile as written in `profiles.json`.
///
/// Required values are `values`, plus every `k/N` inside the inclusive
/// `range`, minus `exclude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub name: String,
    pub denominator: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Alteration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<(Alteration, Alteration)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Alteration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfiles {
    pub profiles: Vec<RawProfile>,
}

/// A validated, read-only tuning profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdoProfile {
    name: String,
    edo: Edo,
    required: BTreeSet<Alteration>,
}

impl EdoProfile {
    /// Create a profile from explicit values, each of which must be a multiple of `1/N`.
    pub fn new(name: impl Into<String>, edo: Edo, values: impl IntoIterator<Item = Alteration>) -> Result<Self> {
        let name = name.into();
        let required: BTreeSet<Alteration> = values.into_iter().collect();
        if required.is_empty() {
            return Err(Error::EmptyProfile(name));
        }
        if let Some(&value) = required.iter().find(|v| v.steps(edo.denominator()).is_none()) {
            return Err(Error::NotInTuning { profile: name, value, denominator: edo.denominator() });
        }
        Ok(Self { name, edo, required })
    }

    /// Create a profile requiring every `k/N` with `min <= k/N <= max`.
    ///
    /// Fails with [`Error::RangeTooWide`] past [`MAX_RANGE_STEPS`] values.
    pub fn from_range(name: impl Into<String>, edo: Edo, min: Alteration, max: Alteration) -> Result<Self> {
        let name = name.into();
        let values = steps_in_range(&name, edo, min, max)?;
        Self::new(name, edo, values)
    }

    pub fn from_raw(raw: RawProfile) -> Result<Self> {
        let edo = Edo::try_from(raw.denominator)?;
        let name = if raw.name.trim().is_empty() { edo.to_string() } else { raw.name };

        let mut values: BTreeSet<Alteration> = raw.values.into_iter().collect();
        if let Some((min, max)) = raw.range {
            values.extend(steps_in_range(&name, edo, min, max)?);
        }
        for excluded in &raw.exclude {
            values.remove(excluded);
        }
        Self::new(name, edo, values)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edo(&self) -> Edo {
        self.edo
    }

    pub fn denominator(&self) -> u32 {
        self.edo.denominator()
    }

    /// Required alteration values in ascending order.
    pub fn required_values(&self) -> &BTreeSet<Alteration> {
        &self.required
    }

    pub fn requires(&self, value: &Alteration) -> bool {
        self.required.contains(value)
    }

    /// Match a command-line selector: the profile name or its denominator.
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        self.name.eq_ignore_ascii_case(selector)
            || selector.parse::<u32>().is_ok_and(|n| n == self.denominator())
    }
}

fn steps_in_range(profile: &str, edo: Edo, min: Alteration, max: Alteration) -> Result<Vec<Alteration>> {
    let denominator = edo.denominator();
    let n = i128::from(denominator);
    // Widened so that numer * N cannot overflow; denominators are always positive.
    let first = -(-i128::from(min.numer()) * n).div_euclid(i128::from(min.denom()));
    let last = (i128::from(max.numer()) * n).div_euclid(i128::from(max.denom()));
    if last >= first && last - first >= MAX_RANGE_STEPS as i128 {
        return Err(Error::RangeTooWide { profile: profile.to_string(), min, max, denominator, limit: MAX_RANGE_STEPS });
    }
    (first..=last)
        .map(|k| {
            i64::try_from(k)
                .ok()
                .and_then(|k| Alteration::from_steps(k, denominator))
                .ok_or_else(|| Error::InvalidAlteration(format!("{k}/{denominator}")))
        })
        .collect()
}

/// Parse a `profiles.json` document; profile names must be unique, ignoring ASCII case.
pub fn profiles_from_json(json: &str) -> Result<Vec<EdoProfile>> {
    let raw: RawProfiles = serde_json::from_str(json)?;
    let profiles = raw.profiles.into_iter().map(EdoProfile::from_raw).collect::<Result<Vec<_>>>()?;
    check_unique_names(&profiles)?;
    Ok(profiles)
}

/// Names are compared the way [`EdoProfile::matches`] compares selectors.
pub fn check_unique_names(profiles: &[EdoProfile]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for profile in profiles {
        if !seen.insert(profile.name().to_ascii_lowercase()) {
            return Err(Error::DuplicateProfile(profile.name().to_string()));
        }
    }
    Ok(())
}
