use core::fmt::Debug;
use std::fmt::Display;

use crate::{HpoError, HpoResult};

/// The unique identifier of an HPO term, e.g. `HP:0000118`
///
/// Internally the id is the numerical part of the canonical
/// `HP:0000118` notation. It can be constructed from the canonical
/// string or from the bare integer and always displays in canonical
/// form.
///
/// # Examples
///
/// ```
/// use hpoquery::HpoTermId;
///
/// let id1 = HpoTermId::try_from("HP:0000118").unwrap();
/// let id2 = HpoTermId::from(118u32);
/// assert_eq!(id1, id2);
/// assert_eq!(id1.to_string(), "HP:0000118");
/// assert_eq!(id1.as_u32(), 118);
/// ```
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HpoTermId {
    inner: u32,
}

impl HpoTermId {
    /// Returns the numerical part of the id
    pub fn as_u32(self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for HpoTermId {
    type Error = HpoError;

    /// Parses the canonical `HP:0001234` notation or a bare integer string
    fn try_from(s: &str) -> HpoResult<Self> {
        let digits = s.strip_prefix("HP:").unwrap_or(s);
        Ok(HpoTermId {
            inner: digits.parse::<u32>()?,
        })
    }
}

impl From<u32> for HpoTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for HpoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HpoTermId({self})")
    }
}

impl Display for HpoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HP:{:07}", self.inner)
    }
}

impl PartialEq<str> for HpoTermId {
    fn eq(&self, other: &str) -> bool {
        match HpoTermId::try_from(other) {
            Ok(other) => self == &other,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_canonical() {
        let id = HpoTermId::try_from("HP:0007401").unwrap();
        assert_eq!(id.as_u32(), 7401);
        assert_eq!(id.to_string(), "HP:0007401");
    }

    #[test]
    fn parse_bare_integer() {
        let id = HpoTermId::try_from("7401").unwrap();
        assert_eq!(id, HpoTermId::from(7401u32));
    }

    #[test]
    fn parse_invalid() {
        assert_eq!(
            HpoTermId::try_from("Macular atrophy"),
            Err(HpoError::ParseIntError)
        );
        assert_eq!(HpoTermId::try_from("HP:12x4"), Err(HpoError::ParseIntError));
    }

    #[test]
    fn compare_to_str() {
        let id = HpoTermId::from(118u32);
        assert!(&id == "HP:0000118");
        assert!(&id != "HP:0000119");
        assert!(&id != "not an id");
    }
}
