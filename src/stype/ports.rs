//! Mode-suffix predicates over port names.

use std::collections::BTreeSet;

use super::SType;
use crate::error::{LightpathError, Result};

/// Separator between a port name and its mode label (`port@mode`).
pub const MODE_SEPARATOR: char = '@';

/// Split `port@mode` into `(port, mode)` at the last separator. Returns
/// `None` for bare ports.
pub fn split_mode(port: &str) -> Option<(&str, &str)> {
    port.rsplit_once(MODE_SEPARATOR)
}

/// Decorate a port name with a mode label.
pub fn with_mode(port: &str, mode: &str) -> String {
    format!("{port}{MODE_SEPARATOR}{mode}")
}

fn has_mode(port: &str) -> bool {
    port.contains(MODE_SEPARATOR)
}

/// Every port carries a mode suffix. An empty representation is singlemode.
pub fn is_multimode(s: &SType) -> bool {
    let ports = s.ports();
    !ports.is_empty() && ports.iter().all(|p| has_mode(p))
}

/// No port carries a mode suffix.
pub fn is_singlemode(s: &SType) -> bool {
    !s.ports().iter().any(|p| has_mode(p))
}

/// Reject representations where only some ports carry a mode suffix.
pub fn validate_not_mixedmode(s: &SType) -> Result<()> {
    let (multimode, singlemode): (Vec<String>, Vec<String>) = s.ports().into_iter().partition(|p| has_mode(p));
    if !multimode.is_empty() && !singlemode.is_empty() {
        return Err(LightpathError::MixedMode { multimode, singlemode });
    }
    Ok(())
}

/// Mode labels present on the ports of a multimode representation.
pub fn present_modes(s: &SType) -> BTreeSet<String> {
    s.ports()
        .iter()
        .filter_map(|p| split_mode(p))
        .map(|(_, mode)| mode.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stype::SDict;

    fn sdict(pairs: &[(&str, &str)]) -> SType {
        let mut s = SDict::new();
        for (p1, p2) in pairs {
            s.insert_scalar(*p1, *p2, 1.0);
        }
        s.into()
    }

    #[test]
    fn test_split_and_join_mode() {
        assert_eq!(split_mode("in@TE"), Some(("in", "TE")));
        assert_eq!(split_mode("in"), None);
        assert_eq!(with_mode("out", "TM"), "out@TM");
    }

    #[test]
    fn test_mode_is_last_segment() {
        assert_eq!(split_mode("tap@1@TE"), Some(("tap@1", "TE")));

        let s = sdict(&[("tap@1@TE", "out@TE"), ("tap@1@TM", "out@TM")]);
        assert_eq!(
            present_modes(&s).into_iter().collect::<Vec<_>>(),
            vec!["TE".to_string(), "TM".to_string()]
        );
    }

    #[test]
    fn test_empty_is_singlemode_only() {
        let empty = sdict(&[]);
        assert!(is_singlemode(&empty));
        assert!(!is_multimode(&empty));
    }

    #[test]
    fn test_singlemode_and_multimode() {
        let single = sdict(&[("in", "out")]);
        assert!(is_singlemode(&single));
        assert!(!is_multimode(&single));

        let multi = sdict(&[("in@TE", "out@TE"), ("in@TM", "out@TM")]);
        assert!(is_multimode(&multi));
        assert!(!is_singlemode(&multi));
        assert_eq!(
            present_modes(&multi).into_iter().collect::<Vec<_>>(),
            vec!["TE".to_string(), "TM".to_string()]
        );
    }

    #[test]
    fn test_mixed_mode_rejected() {
        let mixed = sdict(&[("in@TE", "out")]);
        assert!(!is_multimode(&mixed));
        assert!(!is_singlemode(&mixed));
        let err = validate_not_mixedmode(&mixed).unwrap_err();
        assert_eq!(
            err,
            LightpathError::MixedMode {
                multimode: vec!["in@TE".to_string()],
                singlemode: vec!["out".to_string()],
            }
        );
    }

    #[test]
    fn test_consistent_representations_pass() {
        assert!(validate_not_mixedmode(&sdict(&[("a", "b")])).is_ok());
        assert!(validate_not_mixedmode(&sdict(&[("a@TE", "b@TE")])).is_ok());
        assert!(validate_not_mixedmode(&sdict(&[])).is_ok());
    }
}
