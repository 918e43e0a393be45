//! Synthetic snapshot producer.
//!
//! Stands in for the instrumentation subsystem when no real pipeline is
//! available: a `videotestsrc ! queue ! videoconvert ! fakesink` chain whose
//! metrics drift every tick.

use std::thread;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use super::{
    BufferSize, ChannelSource, ElementStats, PadStats, PeerRef, PipelineSnapshot, ProcTime,
};

const CHAIN: [&str; 4] = ["videotestsrc0", "queue0", "videoconvert0", "fakesink0"];

/// Publishes synthetic snapshots into a [`ChannelSource`].
#[derive(Debug)]
pub struct DemoProducer {
    sender: watch::Sender<PipelineSnapshot>,
    cores: usize,
}

impl DemoProducer {
    /// Create a producer and the source that receives its snapshots.
    pub fn create(cores: usize) -> (Self, ChannelSource) {
        let (sender, source) = ChannelSource::create("demo");
        (Self { sender, cores }, source)
    }

    /// Run on a background thread until the receiving source is dropped.
    pub fn spawn(self, interval: Duration) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let mut tick = 0u64;
            while self.sender.send(Self::snapshot_at(tick, self.cores)).is_ok() {
                tick += 1;
                thread::sleep(interval);
            }
            debug!("demo producer stopped after {} ticks", tick);
        })
    }

    /// Build the snapshot for a given tick.
    pub fn snapshot_at(tick: u64, cores: usize) -> PipelineSnapshot {
        let wobble = |seed: u64, span: u64| (tick.wrapping_mul(31).wrapping_add(seed * 17)) % span;

        let cpu_load = (0..cores as u64).map(|core| wobble(core, 1000) as f64 / 10.0).collect();

        let mut elements = std::collections::BTreeMap::new();
        for (index, name) in CHAIN.iter().enumerate() {
            let seed = index as u64;
            let proctime = 20_000 + wobble(seed, 5_000) * 10;
            let queue_level = if *name == "queue0" { wobble(seed, 200) as u32 } else { 0 };

            let mut pads = std::collections::BTreeMap::new();
            let rate = 30.0 - (wobble(seed, 30) as f64) / 10.0;
            if index > 0 {
                pads.insert(
                    "sink".to_string(),
                    demo_pad(rate, PeerRef::new(CHAIN[index - 1], "src")),
                );
            }
            if index + 1 < CHAIN.len() {
                pads.insert(
                    "src".to_string(),
                    demo_pad(rate, PeerRef::new(CHAIN[index + 1], "sink")),
                );
            }

            elements.insert(
                name.to_string(),
                ElementStats {
                    proctime: ProcTime {
                        value: proctime,
                        avg: 20_000.0 + 25_000.0 * (index as f64 + 1.0) / 2.0,
                    },
                    queue_level,
                    max_queue_level: 200,
                    pads,
                },
            );
        }

        PipelineSnapshot { cpu_load, elements }
    }
}

fn demo_pad(datarate: f64, peer: PeerRef) -> PadStats {
    PadStats {
        datarate,
        buffer_size: BufferSize { value: 460_800 },
        peer: Some(peer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DataSource, SnapshotStore};

    #[test]
    fn chain_pads_link_both_ways() {
        let snapshot = DemoProducer::snapshot_at(7, 2);
        assert_eq!(snapshot.cpu_loads().len(), 2);
        assert_eq!(snapshot.len(), CHAIN.len());

        for name in snapshot.list_element_names() {
            let element = snapshot.get_element(&name).unwrap();
            for pad_name in snapshot.list_pad_names(element) {
                let pad = snapshot.get_pad(element, &pad_name).unwrap();
                let peer = snapshot.resolve_peer(pad).unwrap();
                let peer_element = snapshot.get_element(&peer.element).unwrap();
                let back = snapshot.get_pad(peer_element, &peer.pad).unwrap();
                assert_eq!(back.peer, Some(PeerRef::new(name.clone(), pad_name)));
            }
        }
    }

    #[test]
    fn cpu_loads_stay_in_percent_range() {
        for tick in 0..50 {
            let snapshot = DemoProducer::snapshot_at(tick, 8);
            assert!(snapshot.cpu_load.iter().all(|l| (0.0..100.0).contains(l)));
        }
    }

    #[test]
    fn spawned_producer_feeds_source() {
        let (producer, mut source) = DemoProducer::create(1);
        let handle = producer.spawn(Duration::from_millis(5));

        thread::sleep(Duration::from_millis(30));
        let snapshot = source.poll().unwrap();
        assert!(snapshot.elements.contains_key("queue0"));

        drop(source);
        handle.join().unwrap();
    }
}
