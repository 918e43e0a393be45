//! Shared types for pipeline snapshots.
//!
//! These types match the JSON format written by the pipeline's
//! instrumentation subsystem. They are the common data format between the
//! metrics producer and this read-only dashboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete point-in-time snapshot of pipeline state.
///
/// Element names map to their statistics; the CPU load array carries one
/// percentage per core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    /// Load per CPU core, in percent.
    #[serde(default)]
    pub cpu_load: Vec<f64>,
    /// Element statistics, keyed by element name.
    #[serde(default)]
    pub elements: BTreeMap<String, ElementStats>,
}

/// Processing time samples for an element, in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcTime {
    /// Latest sample.
    #[serde(default)]
    pub value: u64,
    /// Running average.
    #[serde(default)]
    pub avg: f64,
}

/// Statistics for a single pipeline element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStats {
    #[serde(default)]
    pub proctime: ProcTime,
    /// Buffers currently queued in front of the element.
    #[serde(default)]
    pub queue_level: u32,
    /// Highest queue level observed.
    #[serde(default)]
    pub max_queue_level: u32,
    /// Pad statistics, keyed by pad name.
    #[serde(default)]
    pub pads: BTreeMap<String, PadStats>,
}

/// Buffer size sample for a pad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferSize {
    #[serde(default)]
    pub value: i64,
}

/// Statistics for a single pad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadStats {
    /// Data rate through the pad.
    #[serde(default)]
    pub datarate: f64,
    #[serde(default)]
    pub buffer_size: BufferSize,
    /// The pad on the other end of this pad's link, if linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer: Option<PeerRef>,
}

/// Names an element and one of its pads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRef {
    pub element: String,
    pub pad: String,
}

impl PeerRef {
    pub fn new(element: impl Into<String>, pad: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            pad: pad.into(),
        }
    }
}

/// Read-only access to a pipeline snapshot.
///
/// Every call is a lookup against in-memory data; none of them block. Keys
/// that vanished since they were enumerated resolve to `None`.
pub trait SnapshotStore {
    /// Element names in the store's stable enumeration order.
    fn list_element_names(&self) -> Vec<String>;

    fn get_element(&self, name: &str) -> Option<&ElementStats>;

    /// Pad names of an element in stable enumeration order.
    fn list_pad_names(&self, element: &ElementStats) -> Vec<String>;

    fn get_pad<'a>(&self, element: &'a ElementStats, name: &str) -> Option<&'a PadStats>;

    /// The element and pad on the other end of a pad's link.
    fn resolve_peer(&self, pad: &PadStats) -> Option<PeerRef>;

    /// Load per CPU core, in percent. The slice length is the core count.
    fn cpu_loads(&self) -> &[f64];
}

impl SnapshotStore for PipelineSnapshot {
    fn list_element_names(&self) -> Vec<String> {
        self.elements.keys().cloned().collect()
    }

    fn get_element(&self, name: &str) -> Option<&ElementStats> {
        self.elements.get(name)
    }

    fn list_pad_names(&self, element: &ElementStats) -> Vec<String> {
        element.pads.keys().cloned().collect()
    }

    fn get_pad<'a>(&self, element: &'a ElementStats, name: &str) -> Option<&'a PadStats> {
        element.pads.get(name)
    }

    fn resolve_peer(&self, pad: &PadStats) -> Option<PeerRef> {
        pad.peer.clone()
    }

    fn cpu_loads(&self) -> &[f64] {
        &self.cpu_load
    }
}

impl PipelineSnapshot {
    /// Check if the snapshot has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements in the snapshot.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Total number of pads across all elements.
    pub fn pad_count(&self) -> usize {
        self.elements.values().map(|e| e.pads.len()).sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Two elements linked `src.src0 <-> sink.sink0`.
    pub fn linked_pair() -> PipelineSnapshot {
        let json = r#"{
            "cpu_load": [12.5, 3.0],
            "elements": {
                "src": {
                    "proctime": { "value": 1200, "avg": 1100.5 },
                    "queue_level": 1,
                    "max_queue_level": 4,
                    "pads": {
                        "src0": {
                            "datarate": 12.5,
                            "buffer_size": { "value": 4096 },
                            "peer": { "element": "sink", "pad": "sink0" }
                        }
                    }
                },
                "sink": {
                    "pads": {
                        "sink0": {
                            "datarate": 12.5,
                            "buffer_size": { "value": 4096 },
                            "peer": { "element": "src", "pad": "src0" }
                        }
                    }
                }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    /// `src -> queue -> sink` with two pads on the queue.
    pub fn three_stage() -> PipelineSnapshot {
        let mut snapshot = PipelineSnapshot {
            cpu_load: vec![50.0],
            ..Default::default()
        };
        let pad = |element: &str, pad: &str| PadStats {
            datarate: 30.0,
            buffer_size: BufferSize { value: 1024 },
            peer: Some(PeerRef::new(element, pad)),
        };

        let mut src = ElementStats::default();
        src.pads.insert("src".into(), pad("queue", "sink"));
        let mut queue = ElementStats::default();
        queue.pads.insert("sink".into(), pad("src", "src"));
        queue.pads.insert("src".into(), pad("sink", "sink"));
        let mut sink = ElementStats::default();
        sink.pads.insert("sink".into(), pad("queue", "src"));

        snapshot.elements.insert("src".into(), src);
        snapshot.elements.insert("queue".into(), queue);
        snapshot.elements.insert("sink".into(), sink);
        snapshot
    }
}
