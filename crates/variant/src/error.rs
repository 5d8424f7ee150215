//! Error types for variant derivation.

use std::result;

use ekmelos_accidentals::Alteration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A profile requires values the catalog has no accidental for.
    ///
    /// Names every missing value, not only the first.
    #[error("profile '{profile}' is unsatisfiable: no accidental defined for {}", join(values))]
    UnsatisfiableProfile { profile: String, values: Vec<Alteration> },
}

fn join(values: &[Alteration]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = result::Result<T, Error>;
