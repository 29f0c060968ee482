//! Command-line argument parsing for the `lightpath` binary.
//!
//! Circuits are described entirely on the command line:
//!
//! ```text
//! --instance <name>:<port1>:<port2>=<length>[;<length>...]
//! --connection <instance>,<port>=<instance>,<port>
//! --port <external>=<instance>,<port>
//! ```
//!
//! `--instance` may be repeated for the same instance to add more entries.

use std::collections::BTreeMap;

use num_complex::Complex64;

use crate::circuit::{Connections, Instances, Ports};
use crate::display::format_sdict;
use crate::error::{LightpathError, Result};
use crate::stype::{SDict, SType};

/// Separator between batch values in an `--instance` argument.
pub const BATCH_SEPARATOR: char = ';';

/// One parsed `--instance` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceEntry {
    pub instance: String,
    pub port1: String,
    pub port2: String,
    pub lengths: Vec<f64>,
}

/// Split `left=right`, trimming both sides.
pub fn parse_assignment(argument: &str) -> Result<(String, String)> {
    let (left, right) = argument
        .split_once('=')
        .ok_or_else(|| LightpathError::invalid_argument(argument, "expected '<left>=<right>'"))?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return Err(LightpathError::invalid_argument(argument, "both sides of '=' must be non-empty"));
    }
    Ok((left.to_string(), right.to_string()))
}

/// Parse `name:port1:port2=length[;length...]`.
pub fn parse_instance_entry(argument: &str) -> Result<InstanceEntry> {
    let (target, values) = parse_assignment(argument)?;
    let parts: Vec<&str> = target.split(':').map(str::trim).collect();
    let [instance, port1, port2] = parts.as_slice() else {
        return Err(LightpathError::invalid_argument(argument, "expected '<instance>:<port1>:<port2>'"));
    };
    if [instance, port1, port2].iter().any(|part| part.is_empty()) {
        return Err(LightpathError::invalid_argument(argument, "instance and port names must be non-empty"));
    }

    let lengths = values
        .split(BATCH_SEPARATOR)
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| LightpathError::invalid_argument(argument, format!("invalid length '{value}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(InstanceEntry {
        instance: instance.to_string(),
        port1: port1.to_string(),
        port2: port2.to_string(),
        lengths,
    })
}

/// Group instance entries into sparse-dictionary representations.
pub fn collect_instances(entries: &[InstanceEntry]) -> Instances {
    let mut sdicts: BTreeMap<String, SDict> = BTreeMap::new();
    for entry in entries {
        let values = entry.lengths.iter().map(|&l| Complex64::new(l, 0.0)).collect();
        sdicts
            .entry(entry.instance.clone())
            .or_default()
            .insert(entry.port1.clone(), entry.port2.clone(), values);
    }
    sdicts.into_iter().map(|(name, sdict)| (name, SType::from(sdict))).collect()
}

/// Parse repeated `left=right` arguments into a mapping.
pub fn collect_assignments(arguments: &[String]) -> Result<Connections> {
    arguments.iter().map(|argument| parse_assignment(argument)).collect()
}

/// Parse repeated `--port` arguments.
pub fn collect_ports(arguments: &[String]) -> Result<Ports> {
    collect_assignments(arguments)
}

/// Render every instance as a `name:` header followed by its entries.
pub fn format_instances(instances: &Instances) -> String {
    instances
        .iter()
        .map(|(name, stype)| format!("{name}:\n{}", format_sdict(&stype.to_sdict())))
        .collect::<Vec<_>>()
        .join("\n")
}
