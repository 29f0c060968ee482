//! Dense scattering matrix.

use num_complex::Complex64;

use super::sparse::{ports_by_index, renumber, SCoo, SDict};
use super::{Batch, PortMap};
use crate::error::{LightpathError, Result};

/// Dense encoding: a square matrix of value batches sharing one batch size.
///
/// Storage is entry-major: the batch for `(row, col)` occupies
/// `data[(row * size + col) * batch..][..batch]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SDense {
    size: usize,
    batch: usize,
    data: Vec<Complex64>,
    port_map: PortMap,
}

impl SDense {
    /// Create a dense matrix from raw entry-major data.
    pub fn new(size: usize, batch: usize, data: Vec<Complex64>, port_map: PortMap) -> Result<Self> {
        if batch == 0 {
            return Err(LightpathError::unknown_representation("dense batch size must be at least 1"));
        }
        if data.len() != size * size * batch {
            return Err(LightpathError::unknown_representation(format!(
                "dense data has {} values, expected {size}x{size}x{batch}",
                data.len()
            )));
        }
        if let Some((port, &idx)) = port_map.iter().find(|(_, idx)| **idx >= size) {
            return Err(LightpathError::unknown_representation(format!(
                "port '{port}' maps to index {idx} outside a {size}x{size} matrix"
            )));
        }
        Ok(Self {
            size,
            batch,
            data,
            port_map,
        })
    }

    /// All-zero matrix.
    pub fn zeros(size: usize, batch: usize, port_map: PortMap) -> Self {
        Self {
            size,
            batch,
            data: vec![Complex64::new(0.0, 0.0); size * size * batch],
            port_map,
        }
    }

    /// Matrix dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values per entry.
    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn port_map(&self) -> &PortMap {
        &self.port_map
    }

    /// Port names ordered by index.
    pub fn ports(&self) -> Vec<String> {
        ports_by_index(&self.port_map)
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        (row * self.size + col) * self.batch
    }

    /// Values stored at `(row, col)`.
    pub fn entry(&self, row: usize, col: usize) -> &[Complex64] {
        let start = self.offset(row, col);
        &self.data[start..start + self.batch]
    }

    /// Overwrite `(row, col)`; a length-1 value is broadcast over the batch.
    pub(crate) fn set_entry(&mut self, row: usize, col: usize, value: &[Complex64]) {
        let start = self.offset(row, col);
        let slot = &mut self.data[start..start + self.batch];
        if value.len() == 1 {
            slot.fill(value[0]);
        } else {
            slot.copy_from_slice(value);
        }
    }

    /// Same data under a different port map; indices must stay below `size`.
    pub(crate) fn with_port_map(&self, port_map: PortMap) -> SDense {
        SDense {
            port_map,
            ..self.clone()
        }
    }

    /// Drop rows/columns of unmapped indices and renumber the remaining
    /// ports contiguously in their original relative order.
    pub fn consolidate(&self) -> SDense {
        let retained: Vec<usize> = ports_by_index(&self.port_map)
            .iter()
            .map(|port| self.port_map[port])
            .collect();
        let port_map = renumber(&self.port_map);
        let mut dense = SDense::zeros(retained.len(), self.batch, port_map);
        for (new_i, &old_i) in retained.iter().enumerate() {
            for (new_j, &old_j) in retained.iter().enumerate() {
                dense.set_entry(new_i, new_j, self.entry(old_i, old_j));
            }
        }
        dense
    }

    /// Whether every index in `0..size` is mapped exactly once.
    pub fn is_consolidated(&self) -> bool {
        self.port_map.len() == self.size && renumber(&self.port_map) == self.port_map
    }

    /// Mapped `(port1, port2, value)` triplets with at least one nonzero value.
    fn nonzero_entries(&self) -> impl Iterator<Item = (&String, &String, &[Complex64])> {
        self.port_map.iter().flat_map(move |(p1, &i)| {
            self.port_map.iter().filter_map(move |(p2, &j)| {
                let value = self.entry(i, j);
                value.iter().any(|v| *v != Complex64::new(0.0, 0.0)).then_some((p1, p2, value))
            })
        })
    }

    /// Convert to the dictionary encoding, dropping all-zero entries.
    pub fn to_sdict(&self) -> SDict {
        self.nonzero_entries()
            .map(|(p1, p2, value)| ((p1.clone(), p2.clone()), value.to_vec()))
            .collect()
    }

    /// Convert to the coordinate encoding over the consolidated port map.
    pub fn to_scoo(&self) -> SCoo {
        let dense = self.consolidate();
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        let mut values: Vec<Batch> = Vec::new();
        for (p1, p2, value) in dense.nonzero_entries() {
            rows.push(dense.port_map[p1]);
            cols.push(dense.port_map[p2]);
            values.push(value.to_vec());
        }
        let port_map = dense.port_map.clone();
        SCoo::from_parts(rows, cols, values, port_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn three_port() -> SDense {
        let port_map: PortMap = [("a", 0), ("b", 1), ("c", 2)]
            .into_iter()
            .map(|(p, i)| (p.to_string(), i))
            .collect();
        let data = (0..9).map(|v| c(v as f64)).collect();
        SDense::new(3, 1, data, port_map).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_shape() {
        let err = SDense::new(2, 1, vec![c(1.0); 3], PortMap::new()).unwrap_err();
        assert!(matches!(err, LightpathError::UnknownRepresentation { .. }));
    }

    #[test]
    fn test_new_rejects_out_of_range_port() {
        let port_map: PortMap = [("a".to_string(), 2)].into_iter().collect();
        assert!(SDense::new(2, 1, vec![c(1.0); 4], port_map).is_err());
    }

    #[test]
    fn test_consolidate_drops_removed_ports() {
        let mut dense = three_port();
        dense.port_map.remove("b");
        assert!(!dense.is_consolidated());

        let consolidated = dense.consolidate();
        assert!(consolidated.is_consolidated());
        assert_eq!(consolidated.size(), 2);
        assert_eq!(consolidated.port_map()["a"], 0);
        assert_eq!(consolidated.port_map()["c"], 1);
        // old (0, 2) and (2, 0)
        assert_eq!(consolidated.entry(0, 1), &[c(2.0)]);
        assert_eq!(consolidated.entry(1, 0), &[c(6.0)]);
        assert_eq!(consolidated.entry(1, 1), &[c(8.0)]);
    }

    #[test]
    fn test_to_sdict_skips_zeros() {
        let sdict = three_port().to_sdict();
        // entry (a, a) holds 0.0
        assert_eq!(sdict.len(), 8);
        assert!(sdict.get("a", "a").is_none());
        assert_eq!(sdict.get("b", "c"), Some(&vec![c(5.0)]));
    }

    #[test]
    fn test_dense_round_trip_through_sdict() {
        let dense = three_port();
        let mut sdict = dense.to_sdict();
        sdict.insert_scalar("a", "a", 0.0);
        assert_eq!(sdict.to_sdense().unwrap(), dense);
    }

    #[test]
    fn test_to_scoo_matches_sdict() {
        let dense = three_port();
        assert_eq!(dense.to_scoo().to_sdict(), dense.to_sdict());
    }
}
