//! Sparse scattering encodings: port-pair dictionary and coordinate lists.

use std::collections::{BTreeMap, BTreeSet};

use num_complex::Complex64;

use super::dense::SDense;
use super::{Batch, PortMap, PortPair};
use crate::error::{LightpathError, Result};

/// Sparse-dictionary encoding: one batch of values per nonzero port pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SDict {
    entries: BTreeMap<PortPair, Batch>,
}

impl SDict {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the entry between two ports.
    pub fn insert(&mut self, p1: impl Into<String>, p2: impl Into<String>, value: Batch) -> Option<Batch> {
        self.entries.insert((p1.into(), p2.into()), value)
    }

    /// Insert a single-valued entry.
    pub fn insert_scalar(
        &mut self,
        p1: impl Into<String>,
        p2: impl Into<String>,
        value: impl Into<Complex64>,
    ) -> Option<Batch> {
        self.insert(p1, p2, vec![value.into()])
    }

    /// Builder-style variant of [`SDict::insert_scalar`].
    pub fn with_scalar(mut self, p1: impl Into<String>, p2: impl Into<String>, value: impl Into<Complex64>) -> Self {
        self.insert_scalar(p1, p2, value);
        self
    }

    /// Look up the entry between two ports.
    pub fn get(&self, p1: &str, p2: &str) -> Option<&Batch> {
        self.entries.get(&(p1.to_string(), p2.to_string()))
    }

    /// Iterate over entries in port-pair order.
    pub fn iter(&self) -> impl Iterator<Item = (&PortPair, &Batch)> {
        self.entries.iter()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, de-duplicated port names appearing in any key.
    pub fn ports(&self) -> Vec<String> {
        let ports: BTreeSet<&String> = self.entries.keys().flat_map(|(p1, p2)| [p1, p2]).collect();
        ports.into_iter().cloned().collect()
    }

    /// Port map assigning contiguous indices in sorted port order.
    fn port_map(&self) -> PortMap {
        self.ports().into_iter().enumerate().map(|(idx, port)| (port, idx)).collect()
    }

    /// Convert to the coordinate encoding.
    pub fn to_scoo(&self) -> SCoo {
        let port_map = self.port_map();
        let mut rows = Vec::with_capacity(self.len());
        let mut cols = Vec::with_capacity(self.len());
        let mut values = Vec::with_capacity(self.len());
        for ((p1, p2), value) in &self.entries {
            rows.push(port_map[p1]);
            cols.push(port_map[p2]);
            values.push(value.clone());
        }
        SCoo {
            rows,
            cols,
            values,
            port_map,
        }
    }

    /// Convert to the dense encoding.
    ///
    /// Length-1 batches broadcast to the widest batch; any other mismatch fails.
    pub fn to_sdense(&self) -> Result<SDense> {
        let port_map = self.port_map();
        let batch = common_batch(self.entries.iter().map(|((p1, p2), v)| (p1.as_str(), p2.as_str(), v)))?;
        let mut dense = SDense::zeros(port_map.len(), batch, port_map);
        for ((p1, p2), value) in &self.entries {
            let (i, j) = (dense.port_map()[p1], dense.port_map()[p2]);
            dense.set_entry(i, j, value);
        }
        Ok(dense)
    }
}

impl FromIterator<(PortPair, Batch)> for SDict {
    fn from_iter<I: IntoIterator<Item = (PortPair, Batch)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SDict {
    type Item = (PortPair, Batch);
    type IntoIter = std::collections::btree_map::IntoIter<PortPair, Batch>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Sparse-coordinate encoding: parallel row/column/value sequences.
///
/// Indices not present in the port map are tolerated and ignored on
/// conversion; contraction to a single mode relies on this.
#[derive(Debug, Clone, PartialEq)]
pub struct SCoo {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<Batch>,
    port_map: PortMap,
}

impl SCoo {
    /// Create a coordinate representation, checking that the sequences line up.
    pub fn new(rows: Vec<usize>, cols: Vec<usize>, values: Vec<Batch>, port_map: PortMap) -> Result<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(LightpathError::unknown_representation(format!(
                "coordinate sequences differ in length (rows: {}, cols: {}, values: {})",
                rows.len(),
                cols.len(),
                values.len()
            )));
        }
        Ok(Self::from_parts(rows, cols, values, port_map))
    }

    pub(crate) fn from_parts(rows: Vec<usize>, cols: Vec<usize>, values: Vec<Batch>, port_map: PortMap) -> Self {
        Self {
            rows,
            cols,
            values,
            port_map,
        }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn values(&self) -> &[Batch] {
        &self.values
    }

    pub fn port_map(&self) -> &PortMap {
        &self.port_map
    }

    /// Number of stored coordinates.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Port names ordered by index.
    pub fn ports(&self) -> Vec<String> {
        ports_by_index(&self.port_map)
    }

    /// Iterate over `(port1, port2, value)` for coordinates whose ports are mapped.
    fn mapped_entries(&self) -> impl Iterator<Item = (&str, &str, &Batch)> + Clone {
        let inverse: BTreeMap<usize, &str> = self.port_map.iter().map(|(p, &i)| (i, p.as_str())).collect();
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .filter_map(move |((i, j), v)| Some((*inverse.get(i)?, *inverse.get(j)?, v)))
    }

    /// Convert to the dictionary encoding. Later duplicates overwrite earlier ones.
    pub fn to_sdict(&self) -> SDict {
        self.mapped_entries()
            .map(|(p1, p2, v)| ((p1.to_string(), p2.to_string()), v.clone()))
            .collect()
    }

    /// Convert to the dense encoding, keeping the relative index order of ports.
    pub fn to_sdense(&self) -> Result<SDense> {
        let port_map = renumber(&self.port_map);
        let batch = common_batch(self.mapped_entries())?;
        let mut dense = SDense::zeros(port_map.len(), batch, port_map);
        for (p1, p2, value) in self.mapped_entries() {
            let (i, j) = (dense.port_map()[p1], dense.port_map()[p2]);
            dense.set_entry(i, j, value);
        }
        Ok(dense)
    }
}

/// Port names ordered by their index in the map.
pub(crate) fn ports_by_index(port_map: &PortMap) -> Vec<String> {
    let mut ports: Vec<(&String, usize)> = port_map.iter().map(|(p, &i)| (p, i)).collect();
    ports.sort_by_key(|&(_, i)| i);
    ports.into_iter().map(|(p, _)| p.clone()).collect()
}

/// Renumber a port map contiguously, preserving relative index order.
pub(crate) fn renumber(port_map: &PortMap) -> PortMap {
    ports_by_index(port_map)
        .into_iter()
        .enumerate()
        .map(|(idx, port)| (port, idx))
        .collect()
}

/// Common batch size of a set of entries; length-1 entries broadcast.
pub(crate) fn common_batch<'a>(entries: impl Iterator<Item = (&'a str, &'a str, &'a Batch)> + Clone) -> Result<usize> {
    let batch = entries.clone().map(|(_, _, v)| v.len()).max().unwrap_or(1).max(1);
    for (p1, p2, value) in entries {
        if value.len() != 1 && value.len() != batch {
            return Err(LightpathError::BatchMismatch {
                port1: p1.to_string(),
                port2: p2.to_string(),
                expected: batch,
                found: value.len(),
            });
        }
    }
    Ok(batch)
}
