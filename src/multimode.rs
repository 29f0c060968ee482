//! Mode expansion and contraction.
//!
//! A singlemode representation with ports `in`, `out` becomes a multimode one
//! with ports `in@TE`, `in@TM`, `out@TE`, `out@TM`. Every entry is copied to
//! each selected pair of modes. By default only equal modes are paired
//! (distinct modes are uncoupled); [`ModeCoupling::Cross`] pairs every mode
//! with every other.
//!
//! The same transforms lift to models: [`multimode_model`] and
//! [`singlemode_model`] wrap a response-producing closure.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{LightpathError, Result};
use crate::stype::{
    is_singlemode, present_modes, split_mode, validate_not_mixedmode, with_mode, Batch, PortMap, SCoo,
    SDense, SDict, SType, MODE_SEPARATOR,
};

/// Modes used when none are given.
pub const DEFAULT_MODES: [&str; 2] = ["TE", "TM"];

/// Mode kept by contraction when none is given.
pub const DEFAULT_MODE: &str = "TE";

/// Which pairs of modes receive a copy of each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeCoupling {
    /// Only `(m, m)`; dense matrices become block diagonal.
    #[default]
    Uncoupled,
    /// Every `(m1, m2)` in the cartesian product.
    Cross,
}

/// Index pairs of the modes that receive a copy of each entry.
fn mode_index_pairs(num_modes: usize, coupling: ModeCoupling) -> Vec<(usize, usize)> {
    match coupling {
        ModeCoupling::Uncoupled => (0..num_modes).map(|m| (m, m)).collect(),
        ModeCoupling::Cross => (0..num_modes)
            .flat_map(|m1| (0..num_modes).map(move |m2| (m1, m2)))
            .collect(),
    }
}

/// Pairs of mode labels that receive a copy of each entry.
pub fn mode_combinations<M: AsRef<str>>(modes: &[M], coupling: ModeCoupling) -> Vec<(String, String)> {
    mode_index_pairs(modes.len(), coupling)
        .into_iter()
        .map(|(m1, m2)| (modes[m1].as_ref().to_string(), modes[m2].as_ref().to_string()))
        .collect()
}

fn check_modes<M: AsRef<str>>(modes: &[M]) -> Result<Vec<&str>> {
    let mut seen = BTreeSet::new();
    let mut labels = Vec::with_capacity(modes.len());
    for mode in modes {
        let mode = mode.as_ref();
        if mode.is_empty() || mode.contains(MODE_SEPARATOR) {
            return Err(LightpathError::invalid_argument(
                mode,
                format!("mode labels must be non-empty and must not contain '{MODE_SEPARATOR}'"),
            ));
        }
        if !seen.insert(mode) {
            return Err(LightpathError::invalid_argument(mode, "duplicate mode label"));
        }
        labels.push(mode);
    }
    Ok(labels)
}

/// Check that a multimode representation uses exactly the given modes.
pub fn validate_multimode<M: AsRef<str>>(s: &SType, modes: &[M]) -> Result<()> {
    let found = present_modes(s);
    let expected: BTreeSet<String> = modes.iter().map(|m| m.as_ref().to_string()).collect();
    if found != expected {
        return Err(LightpathError::ModeMismatch {
            expected: expected.into_iter().collect(),
            found: found.into_iter().collect(),
        });
    }
    Ok(())
}

/// Expand a singlemode representation into the given modes, uncoupled.
pub fn expand_to_multimode<M: AsRef<str>>(s: &SType, modes: &[M]) -> Result<SType> {
    expand_to_multimode_with(s, modes, ModeCoupling::default())
}

/// Expand a singlemode representation into the given modes.
///
/// A representation that is already multimode is returned unchanged when its
/// modes match `modes`, and rejected otherwise.
pub fn expand_to_multimode_with<M: AsRef<str>>(s: &SType, modes: &[M], coupling: ModeCoupling) -> Result<SType> {
    let modes = check_modes(modes)?;
    validate_not_mixedmode(s)?;
    if !is_singlemode(s) {
        validate_multimode(s, modes.as_slice())?;
        return Ok(s.clone());
    }

    debug!(kind = %s.kind(), ?modes, ?coupling, "expanding to multimode");
    let pairs = mode_index_pairs(modes.len(), coupling);
    Ok(match s {
        SType::Dict(sdict) => expand_sdict(sdict, &modes, &pairs).into(),
        SType::Coo(scoo) => expand_scoo(scoo, &modes, &pairs).into(),
        SType::Dense(sdense) => expand_sdense(sdense, &modes, &pairs).into(),
    })
}

fn expand_sdict(sdict: &SDict, modes: &[&str], pairs: &[(usize, usize)]) -> SDict {
    let mut expanded = SDict::new();
    for ((p1, p2), value) in sdict.iter() {
        for &(m1, m2) in pairs {
            expanded.insert(with_mode(p1, modes[m1]), with_mode(p2, modes[m2]), value.clone());
        }
    }
    expanded
}

/// Port map with one block of indices per mode, `stride` apart.
fn expand_port_map(port_map: &PortMap, modes: &[&str], stride: usize) -> PortMap {
    modes
        .iter()
        .enumerate()
        .flat_map(|(m, mode)| {
            port_map
                .iter()
                .map(move |(port, &idx)| (with_mode(port, mode), idx + m * stride))
        })
        .collect()
}

fn expand_scoo(scoo: &SCoo, modes: &[&str], pairs: &[(usize, usize)]) -> SCoo {
    // Coordinates may reference indices dropped from the port map, so the
    // block stride covers every index in use.
    let stride = scoo
        .port_map()
        .values()
        .chain(scoo.rows())
        .chain(scoo.cols())
        .max()
        .map_or(0, |&max| max + 1);

    let mut rows = Vec::with_capacity(scoo.nnz() * pairs.len());
    let mut cols = Vec::with_capacity(scoo.nnz() * pairs.len());
    let mut values: Vec<Batch> = Vec::with_capacity(scoo.nnz() * pairs.len());
    for &(m1, m2) in pairs {
        rows.extend(scoo.rows().iter().map(|i| i + m1 * stride));
        cols.extend(scoo.cols().iter().map(|j| j + m2 * stride));
        values.extend(scoo.values().iter().cloned());
    }
    SCoo::from_parts(rows, cols, values, expand_port_map(scoo.port_map(), modes, stride))
}

fn expand_sdense(sdense: &SDense, modes: &[&str], pairs: &[(usize, usize)]) -> SDense {
    let size = sdense.size();
    let port_map = expand_port_map(sdense.port_map(), modes, size);
    let mut expanded = SDense::zeros(size * modes.len(), sdense.batch(), port_map);
    for &(m1, m2) in pairs {
        for i in 0..size {
            for j in 0..size {
                expanded.set_entry(i + m1 * size, j + m2 * size, sdense.entry(i, j));
            }
        }
    }
    expanded
}

/// Keep only the ports of one mode and strip their suffix.
///
/// Singlemode input is returned unchanged.
pub fn contract_to_singlemode(s: &SType, mode: &str) -> Result<SType> {
    validate_not_mixedmode(s)?;
    if is_singlemode(s) {
        return Ok(s.clone());
    }

    debug!(kind = %s.kind(), mode, "contracting to singlemode");
    Ok(match s {
        SType::Dict(sdict) => contract_sdict(sdict, mode).into(),
        SType::Coo(scoo) => SCoo::from_parts(
            scoo.rows().to_vec(),
            scoo.cols().to_vec(),
            scoo.values().to_vec(),
            contract_port_map(scoo.port_map(), mode),
        )
        .into(),
        SType::Dense(sdense) => contract_sdense(sdense, mode).into(),
    })
}

/// Strip `mode` from a port name, or `None` if the port belongs to another mode.
fn port_in_mode<'a>(port: &'a str, mode: &str) -> Option<&'a str> {
    match split_mode(port) {
        Some((base, m)) if m == mode => Some(base),
        _ => None,
    }
}

fn contract_sdict(sdict: &SDict, mode: &str) -> SDict {
    sdict
        .iter()
        .filter_map(|((p1, p2), value)| {
            let p1 = port_in_mode(p1, mode)?;
            let p2 = port_in_mode(p2, mode)?;
            Some(((p1.to_string(), p2.to_string()), value.clone()))
        })
        .collect()
}

fn contract_port_map(port_map: &PortMap, mode: &str) -> PortMap {
    port_map
        .iter()
        .filter_map(|(port, &idx)| Some((port_in_mode(port, mode)?.to_string(), idx)))
        .collect()
}

fn contract_sdense(sdense: &SDense, mode: &str) -> SDense {
    sdense
        .with_port_map(contract_port_map(sdense.port_map(), mode))
        .consolidate()
}

/// Wrap a model so every response it produces is expanded to `modes`.
pub fn multimode_model<P, F, M>(model: F, modes: &[M]) -> impl Fn(P) -> Result<SType>
where
    F: Fn(P) -> Result<SType>,
    M: AsRef<str>,
{
    let modes: Vec<String> = modes.iter().map(|m| m.as_ref().to_string()).collect();
    move |params| expand_to_multimode(&model(params)?, modes.as_slice())
}

/// Wrap a model so every response it produces is contracted to `mode`.
pub fn singlemode_model<P, F>(model: F, mode: &str) -> impl Fn(P) -> Result<SType>
where
    F: Fn(P) -> Result<SType>,
{
    let mode = mode.to_string();
    move |params| contract_to_singlemode(&model(params)?, &mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn waveguide(transmission: f64) -> SDict {
        SDict::new()
            .with_scalar("in", "out", transmission)
            .with_scalar("out", "in", transmission)
    }

    #[test]
    fn test_mode_combinations() {
        assert_eq!(
            mode_combinations(&DEFAULT_MODES, ModeCoupling::Uncoupled),
            vec![
                ("TE".to_string(), "TE".to_string()),
                ("TM".to_string(), "TM".to_string())
            ]
        );
        assert_eq!(mode_combinations(&["a", "b", "c"], ModeCoupling::Cross).len(), 9);
    }

    #[test]
    fn test_expand_sdict_uncoupled() {
        let s = expand_to_multimode(&waveguide(0.9).into(), &DEFAULT_MODES).unwrap();
        let SType::Dict(sdict) = s else {
            panic!("expected sparse dict");
        };
        assert_eq!(sdict.len(), 4);
        assert_eq!(sdict.get("in@TE", "out@TE"), Some(&vec![c(0.9)]));
        assert_eq!(sdict.get("out@TM", "in@TM"), Some(&vec![c(0.9)]));
        assert!(sdict.get("in@TE", "out@TM").is_none());
    }

    #[test]
    fn test_expand_sdict_cross() {
        let s = expand_to_multimode_with(&waveguide(0.9).into(), &DEFAULT_MODES, ModeCoupling::Cross).unwrap();
        let sdict = s.to_sdict();
        assert_eq!(sdict.len(), 8);
        assert_eq!(sdict.get("in@TE", "out@TM"), Some(&vec![c(0.9)]));
    }

    #[test]
    fn test_expand_scoo_offsets_mode_blocks() {
        let scoo = waveguide(0.5).to_scoo();
        let s = expand_to_multimode(&scoo.clone().into(), &DEFAULT_MODES).unwrap();
        let SType::Coo(expanded) = &s else {
            panic!("expected sparse coo");
        };
        assert_eq!(expanded.nnz(), 4);
        assert_eq!(expanded.rows(), &[0, 1, 2, 3]);
        assert_eq!(expanded.cols(), &[1, 0, 3, 2]);
        assert_eq!(expanded.port_map()["in@TM"], 2);
        assert_eq!(s.to_sdict(), expand_sdict(&waveguide(0.5), &DEFAULT_MODES, &[(0, 0), (1, 1)]));
    }

    #[test]
    fn test_expand_sdense_is_block_diagonal() {
        let dense = waveguide(0.5).to_sdense().unwrap();
        let s = expand_to_multimode(&dense.into(), &DEFAULT_MODES).unwrap();
        let SType::Dense(expanded) = &s else {
            panic!("expected dense");
        };
        assert_eq!(expanded.size(), 4);
        assert_eq!(expanded.entry(0, 1), &[c(0.5)]);
        assert_eq!(expanded.entry(2, 3), &[c(0.5)]);
        assert_eq!(expanded.entry(0, 3), &[c(0.0)]);
        assert_eq!(expanded.port_map()["out@TM"], 3);
    }

    #[test]
    fn test_expand_already_multimode() {
        let multi = expand_to_multimode(&waveguide(1.0).into(), &DEFAULT_MODES).unwrap();
        assert_eq!(expand_to_multimode(&multi, &["TM", "TE"]).unwrap(), multi);

        let err = expand_to_multimode(&multi, &["TE", "TM", "HE11"]).unwrap_err();
        assert!(matches!(err, LightpathError::ModeMismatch { .. }));
    }

    #[test]
    fn test_expand_rejects_mixed_mode() {
        let mixed: SType = SDict::new().with_scalar("in@TE", "out", 1.0).into();
        let err = expand_to_multimode(&mixed, &DEFAULT_MODES).unwrap_err();
        assert!(matches!(err, LightpathError::MixedMode { .. }));
        assert!(contract_to_singlemode(&mixed, DEFAULT_MODE).is_err());
    }

    #[test]
    fn test_expand_rejects_bad_mode_labels() {
        let s: SType = waveguide(1.0).into();
        assert!(expand_to_multimode(&s, &["TE", "TE"]).is_err());
        assert!(expand_to_multimode(&s, &["T@E"]).is_err());
    }

    #[test]
    fn test_expand_empty_is_empty() {
        let empty: SType = SDict::new().into();
        assert_eq!(expand_to_multimode(&empty, &DEFAULT_MODES).unwrap(), empty);
    }

    #[test]
    fn test_contract_inverts_expand() {
        let mut sdict = waveguide(0.7);
        sdict.insert_scalar("in", "in", Complex64::new(0.0, -0.1));
        let single: SType = sdict.clone().into();

        for coupling in [ModeCoupling::Uncoupled, ModeCoupling::Cross] {
            for kind in [single.clone(), single.to_scoo().into(), single.to_sdense().unwrap().into()] {
                let multi = expand_to_multimode_with(&kind, &DEFAULT_MODES, coupling).unwrap();
                for mode in DEFAULT_MODES {
                    let back = contract_to_singlemode(&multi, mode).unwrap();
                    assert_eq!(back.kind(), kind.kind());
                    assert_eq!(back.to_sdict(), sdict);
                }
            }
        }
    }

    #[test]
    fn test_contract_scoo_keeps_data() {
        let multi = expand_to_multimode(&waveguide(0.3).to_scoo().into(), &DEFAULT_MODES).unwrap();
        let SType::Coo(single) = contract_to_singlemode(&multi, "TM").unwrap() else {
            panic!("expected sparse coo");
        };
        assert_eq!(single.nnz(), 4);
        assert_eq!(single.port_map().len(), 2);
        assert_eq!(single.port_map()["in"], 2);
    }

    #[test]
    fn test_contract_singlemode_is_noop() {
        let s: SType = waveguide(0.3).into();
        assert_eq!(contract_to_singlemode(&s, DEFAULT_MODE).unwrap(), s);
    }

    #[test]
    fn test_model_wrappers() {
        let model = |transmission: f64| -> Result<SType> { Ok(waveguide(transmission).into()) };
        let multi = multimode_model(model, &DEFAULT_MODES);
        let s = multi(0.25).unwrap();
        assert_eq!(s.to_sdict().get("in@TM", "out@TM"), Some(&vec![c(0.25)]));

        let single = singlemode_model(multi, "TM");
        assert_eq!(single(0.25).unwrap().to_sdict(), waveguide(0.25));
    }
}
