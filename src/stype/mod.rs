//! Scattering-parameter representations.
//!
//! A device response can be stored in three interchangeable encodings:
//!
//! | Kind | Type | Storage |
//! |------|------|---------|
//! | sparse dictionary | [`SDict`] | `(port, port) -> values` for nonzero entries |
//! | sparse coordinates | [`SCoo`] | parallel `rows`, `cols`, `values` plus a port map |
//! | dense matrix | [`SDense`] | square matrix of values plus a port map |
//!
//! Every entry is a batch of complex values (a scalar is a batch of one).
//! [`SType`] is the closed union of the three; conversions between them keep
//! every nonzero entry. Only the dense form stores explicit zeros.

mod dense;
mod ports;
mod sparse;

use std::collections::BTreeMap;
use std::fmt;

use num_complex::Complex64;

pub use dense::SDense;
pub use ports::{
    is_multimode, is_singlemode, present_modes, split_mode, validate_not_mixedmode, with_mode,
    MODE_SEPARATOR,
};
pub use sparse::{SCoo, SDict};

use crate::error::Result;

/// A batch of complex values for one port pair.
pub type Batch = Vec<Complex64>;

/// Ordered pair of port names.
pub type PortPair = (String, String);

/// Mapping from port name to matrix index.
pub type PortMap = BTreeMap<String, usize>;

/// The encoding a representation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SKind {
    SDict,
    SCoo,
    SDense,
}

impl fmt::Display for SKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SKind::SDict => write!(f, "sparse-dict"),
            SKind::SCoo => write!(f, "sparse-coord"),
            SKind::SDense => write!(f, "dense"),
        }
    }
}

/// A scattering representation in any of the three encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum SType {
    Dict(SDict),
    Coo(SCoo),
    Dense(SDense),
}

impl SType {
    /// Which encoding this value uses.
    pub fn kind(&self) -> SKind {
        match self {
            SType::Dict(_) => SKind::SDict,
            SType::Coo(_) => SKind::SCoo,
            SType::Dense(_) => SKind::SDense,
        }
    }

    /// Port names: sorted for dictionaries, by index for indexed forms.
    pub fn ports(&self) -> Vec<String> {
        match self {
            SType::Dict(s) => s.ports(),
            SType::Coo(s) => s.ports(),
            SType::Dense(s) => s.ports(),
        }
    }

    /// Sparse-dictionary view of the nonzero entries.
    pub fn to_sdict(&self) -> SDict {
        match self {
            SType::Dict(s) => s.clone(),
            SType::Coo(s) => s.to_sdict(),
            SType::Dense(s) => s.to_sdict(),
        }
    }

    /// Sparse-coordinate view.
    pub fn to_scoo(&self) -> SCoo {
        match self {
            SType::Dict(s) => s.to_scoo(),
            SType::Coo(s) => s.clone(),
            SType::Dense(s) => s.to_scoo(),
        }
    }

    /// Dense view; fails when entry batches cannot be broadcast together.
    pub fn to_sdense(&self) -> Result<SDense> {
        match self {
            SType::Dict(s) => s.to_sdense(),
            SType::Coo(s) => s.to_sdense(),
            SType::Dense(s) => Ok(s.clone()),
        }
    }
}

/// Classify a representation by encoding.
pub fn classify(s: &SType) -> SKind {
    s.kind()
}

impl From<SDict> for SType {
    fn from(s: SDict) -> Self {
        SType::Dict(s)
    }
}

impl From<SCoo> for SType {
    fn from(s: SCoo) -> Self {
        SType::Coo(s)
    }
}

impl From<SDense> for SType {
    fn from(s: SDense) -> Self {
        SType::Dense(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mzi_arm() -> SDict {
        SDict::new()
            .with_scalar("in", "out", Complex64::new(0.0, 1.0))
            .with_scalar("out", "in", Complex64::new(0.0, 1.0))
            .with_scalar("in", "in", 0.1)
    }

    #[test]
    fn test_classify() {
        let s = SType::from(mzi_arm());
        assert_eq!(classify(&s), SKind::SDict);
        assert_eq!(classify(&SType::from(s.to_scoo())), SKind::SCoo);
        assert_eq!(classify(&SType::from(s.to_sdense().unwrap())), SKind::SDense);
        assert_eq!(SKind::SCoo.to_string(), "sparse-coord");
    }

    #[test]
    fn test_round_trips_preserve_nonzero_entries() {
        let sdict = mzi_arm();
        let s = SType::from(sdict.clone());
        assert_eq!(SType::from(s.to_scoo()).to_sdict(), sdict);
        assert_eq!(SType::from(s.to_sdense().unwrap()).to_sdict(), sdict);
        assert_eq!(SType::from(s.to_sdense().unwrap()).to_scoo().to_sdict(), sdict);
    }

    #[test]
    fn test_ports_agree_across_encodings() {
        let s = SType::from(mzi_arm());
        let expected = vec!["in".to_string(), "out".to_string()];
        assert_eq!(s.ports(), expected);
        assert_eq!(SType::from(s.to_scoo()).ports(), expected);
        assert_eq!(SType::from(s.to_sdense().unwrap()).ports(), expected);
    }
}
