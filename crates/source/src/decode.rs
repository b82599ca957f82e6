//! Multi-document YAML decoding into generic resources.

use std::io::Read;

use manifold_core::Resource;
use metrics::counter;
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::debug;

use crate::{SourceError, SourceResult};

const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_MAX_NODES: usize = 100_000;

/// Input guards applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum size of one input stream.
    pub max_bytes: usize,
    /// Maximum number of JSON nodes in one document.
    pub max_nodes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_BYTES, max_nodes: DEFAULT_MAX_NODES }
    }
}

impl DecodeLimits {
    /// Defaults overridden by `MANIFOLD_MAX_YAML_BYTES` / `MANIFOLD_MAX_YAML_NODES`.
    pub fn from_env() -> Self {
        Self {
            max_bytes: env_usize("MANIFOLD_MAX_YAML_BYTES").unwrap_or(DEFAULT_MAX_BYTES),
            max_nodes: env_usize("MANIFOLD_MAX_YAML_NODES").unwrap_or(DEFAULT_MAX_NODES),
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse::<usize>().ok())
}

/// Decode every document in `reader` using limits from the environment.
///
/// Empty or whitespace-only input yields no resources. The first bad document
/// fails the whole call; nothing decoded before it is returned.
pub fn decode<R: Read>(reader: R) -> SourceResult<Vec<Resource>> {
    decode_with(reader, &DecodeLimits::from_env())
}

pub fn decode_with<R: Read>(reader: R, limits: &DecodeLimits) -> SourceResult<Vec<Resource>> {
    let mut buf = String::new();
    reader.take((limits.max_bytes as u64).saturating_add(1)).read_to_string(&mut buf)?;
    if buf.len() > limits.max_bytes {
        counter!("decode_errors_total", 1u64);
        return Err(SourceError::TooLarge { limit: limits.max_bytes });
    }
    decode_str(&buf, limits)
}

pub fn decode_str(input: &str, limits: &DecodeLimits) -> SourceResult<Vec<Resource>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    match decode_documents(input, limits) {
        Ok(out) => {
            counter!("decode_documents_total", out.len() as u64);
            debug!(documents = out.len(), bytes = input.len(), "decoded manifest stream");
            Ok(out)
        }
        Err(e) => {
            counter!("decode_errors_total", 1u64);
            Err(e)
        }
    }
}

fn decode_documents(input: &str, limits: &DecodeLimits) -> SourceResult<Vec<Resource>> {
    let mut out = Vec::new();
    for (document, de) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let val = serde_yaml::Value::deserialize(de).map_err(|source| SourceError::Parse { document, source })?;
        // `---` separators with nothing between them
        if val.is_null() {
            continue;
        }
        let json = serde_json::to_value(val).map_err(|source| SourceError::Convert { document, source })?;
        if json_node_budget_exceeded(&json, limits.max_nodes) {
            return Err(SourceError::TooComplex { document, limit: limits.max_nodes });
        }
        let resource = Resource::new(json).map_err(|_| SourceError::NotAMapping { document })?;
        out.push(resource);
    }
    Ok(out)
}

/// True when `v` has more than `max` nodes.
fn json_node_budget_exceeded(v: &Json, max: usize) -> bool {
    // Bail out as soon as the running count passes max.
    fn walk(v: &Json, cur: &mut usize, max: usize) {
        if *cur >= max {
            return;
        }
        *cur += 1;
        match v {
            Json::Object(map) => {
                for vv in map.values() {
                    if *cur >= max {
                        break;
                    }
                    walk(vv, cur, max);
                }
            }
            Json::Array(arr) => {
                for vv in arr {
                    if *cur >= max {
                        break;
                    }
                    walk(vv, cur, max);
                }
            }
            _ => {}
        }
    }
    let mut count = 0usize;
    walk(v, &mut count, max.saturating_add(1));
    count > max
}
