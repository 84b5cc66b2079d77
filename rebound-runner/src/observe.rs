//! Passive replica fed by frames on a reader (stdin in the binary).

use log::{debug, warn};
use rebound_core::World;
use rebound_simulation::{replicate, ReplicaOutcome};
use rebound_transport::Serializer;
use std::io::{self, BufRead};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObserveSummary {
    pub applied: u64,
    pub spawned: u64,
    pub malformed: u64,
}

/// Applies every decodable line to `world` until EOF or `limit` frames applied.
pub fn observe_frames<R: BufRead>(
    reader: R,
    serializer: &dyn Serializer,
    world: &mut World,
    limit: Option<u64>,
) -> io::Result<ObserveSummary> {
    let mut summary = ObserveSummary::default();

    for (line_no, line) in reader.lines().enumerate() {
        if limit.map_or(false, |max| summary.applied >= max) {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serializer.deserialize(line.as_bytes()) {
            Ok(action) => {
                let outcome = replicate(world, &action);
                match outcome {
                    ReplicaOutcome::Rejected => {
                        summary.malformed += 1;
                        continue;
                    }
                    ReplicaOutcome::Spawned => summary.spawned += 1,
                    ReplicaOutcome::Moved | ReplicaOutcome::Ignored => {}
                }
                summary.applied += 1;
                debug!(
                    "Ball {} {:?}: ({:.2}, {:.2})",
                    action.id, outcome, action.position.x, action.position.y
                );
            }
            Err(e) => {
                summary.malformed += 1;
                warn!("Skipping malformed frame on line {}: {}", line_no + 1, e);
            }
        }
    }

    Ok(summary)
}
