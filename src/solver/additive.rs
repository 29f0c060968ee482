//! Additive (path-length) circuit evaluation.

use std::collections::BTreeMap;

use tracing::{debug, info_span};

use super::paths::{path_lengths, search_paths};
use super::SolverConfig;
use crate::circuit::{CircuitGraph, Connections, Instances, Netlist, Ports, QualifiedPort};
use crate::error::{LightpathError, Result};

/// Length batches of every valid path, keyed by `(source, target)` port names.
pub type PathLengths = BTreeMap<(String, String), Vec<Vec<f64>>>;

/// A circuit whose wiring has been parsed once and can be evaluated against
/// any number of instance sets.
#[derive(Debug, Clone)]
pub struct AdditiveCircuit {
    netlist: Netlist,
    config: SolverConfig,
}

impl AdditiveCircuit {
    /// Parse and validate the wiring.
    pub fn analyze(connections: &Connections, ports: &Ports) -> Result<Self> {
        Ok(Self {
            netlist: Netlist::parse(connections, ports)?,
            config: SolverConfig::default(),
        })
    }

    /// Replace the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    /// Build the graph for `instances`, pruned unless disabled.
    pub fn graph(&self, instances: &Instances) -> Result<CircuitGraph> {
        let mut graph = CircuitGraph::from_netlist(instances, &self.netlist)?;
        if self.config.prune {
            graph.prune();
        }
        Ok(graph)
    }

    /// Path lengths between every ordered pair of external ports.
    ///
    /// Pairs without a valid path are left out.
    pub fn evaluate(&self, instances: &Instances) -> Result<PathLengths> {
        let names: Vec<&str> = self.netlist.external_names().collect();
        let _span = info_span!("additive_evaluate", ports = names.len(), instances = instances.len()).entered();

        let graph = self.graph(instances)?;
        let pairs: Vec<(&str, &str)> = names
            .iter()
            .flat_map(|&source| names.iter().map(move |&target| (source, target)))
            .collect();

        #[cfg(feature = "parallel")]
        let evaluated: Vec<_> = {
            use rayon::prelude::*;
            pairs
                .into_par_iter()
                .map(|(source, target)| self.evaluate_pair(&graph, source, target))
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let evaluated: Vec<_> = pairs
            .into_iter()
            .map(|(source, target)| self.evaluate_pair(&graph, source, target))
            .collect::<Result<_>>()?;

        Ok(evaluated.into_iter().flatten().collect())
    }

    fn evaluate_pair(
        &self,
        graph: &CircuitGraph,
        source: &str,
        target: &str,
    ) -> Result<Option<((String, String), Vec<Vec<f64>>)>> {
        let (Some(from), Some(to)) = (
            graph.find_node(&QualifiedPort::external(source)),
            graph.find_node(&QualifiedPort::external(target)),
        ) else {
            return Ok(None);
        };

        let paths = search_paths(graph, from, to, self.config.max_paths).ok_or_else(|| {
            LightpathError::PathLimitExceeded {
                source_port: source.to_string(),
                target_port: target.to_string(),
                limit: self.config.max_paths.unwrap_or_default(),
            }
        })?;
        debug!(source, target, paths = paths.len(), "enumerated paths");

        if paths.is_empty() {
            return Ok(None);
        }
        let key = (source.to_string(), target.to_string());
        Ok(Some((key, path_lengths(graph, &paths))))
    }
}

/// Evaluate the additive response of a circuit in one call.
pub fn evaluate_additive(instances: &Instances, connections: &Connections, ports: &Ports) -> Result<PathLengths> {
    AdditiveCircuit::analyze(connections, ports)?.evaluate(instances)
}
