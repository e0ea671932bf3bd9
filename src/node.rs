//! Cluster node input model and loading.
//!
//! Nodes arrive as a JSON array, either from a file or fetched from the
//! cluster membership endpoint. `ip` is a packed 32-bit IPv4 address and
//! serves as the node's identity key.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Geographic and descriptive host metadata
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Host {
    pub latitude: Option<f32>,
    pub longitude: Option<f32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
}

/// One cluster member as reported by the membership endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub ip: u32,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub host: Host,
}

impl Node {
    /// Dotted-quad form of the packed address, for logs and output
    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ip)
    }

    /// (lat, lng) if both coordinates are present and finite
    pub fn coordinates(&self) -> Option<(f32, f32)> {
        match (self.host.latitude, self.host.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Load a node list from a JSON file
pub fn load_nodes(path: &Path) -> Result<Vec<Node>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Fetch a node list from an HTTP endpoint
pub fn fetch_nodes(url: &str) -> Result<Vec<Node>> {
    let response = ureq::get(url).timeout(FETCH_TIMEOUT).call()?;
    Ok(response.into_json()?)
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "ip": 16909060,
            "state": "alive",
            "host": {
                "latitude": 48.9,
                "longitude": 2.3,
                "name": "par-1",
                "city": "Paris",
                "region": "IDF",
                "country": "FR",
                "org": "Example"
            }
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.addr().to_string(), "1.2.3.4");
        assert_eq!(node.state, "alive");
        assert_eq!(node.coordinates(), Some((48.9, 2.3)));
    }

    #[test]
    fn missing_coordinates_yield_none() {
        let json = r#"{"ip": 1, "state": "alive", "host": {"name": "x"}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert!(node.coordinates().is_none());
    }

    #[test]
    fn missing_host_yields_none() {
        let json = r#"{"ip": 1}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert!(node.coordinates().is_none());
        assert!(node.state.is_empty());
    }
}
