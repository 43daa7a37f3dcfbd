//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies, paths, and query strings carry identifiers as plain
//! strings. These helpers parse them into domain ids and report failures with
//! the offending field so clients can point at the exact input.

use std::str::FromStr;

use crate::domain::{Error, IdValidationError, TripError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_id(field: FieldName, index: Option<usize>, source: IdValidationError) -> Error {
    Error::from(TripError::InvalidId {
        field: field.as_str(),
        index,
        source,
    })
}

/// Parse one identifier, reporting failures as [`TripError::InvalidId`].
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdValidationError>,
{
    value
        .parse()
        .map_err(|err| invalid_id(field, None, err))
}

pub(crate) fn parse_optional_id<T>(value: Option<&str>, field: FieldName) -> Result<Option<T>, Error>
where
    T: FromStr<Err = IdValidationError>,
{
    value.map(|raw| parse_id(raw, field)).transpose()
}

/// Parse a list of identifiers, reporting the index of the first bad entry.
pub(crate) fn parse_id_list<T, I, S>(values: I, field: FieldName) -> Result<Vec<T>, Error>
where
    T: FromStr<Err = IdValidationError>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .as_ref()
                .parse()
                .map_err(|err| invalid_id(field, Some(index), err))
        })
        .collect()
}
