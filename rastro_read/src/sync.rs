//! Clock correction between trace files.
//!
//! Every producer timestamps its events with its own clock. To merge the
//! files of several hosts, an offline synchronization step estimates, per
//! host, a linear map from the local clock to a common reference clock:
//!
//! ```text
//! global = (local - loc0) * a + ref0
//! ```
//!
//! The sync description lists one such map per host, one host per line:
//!
//! ```text
//! # hostname  a          loc0        ref0
//! node-1      1.0000002  1000000000  1000000000
//! node-2      0.9999998  2000000000  1000000350
//! ```
//!
//! `loc0` and `ref0` are in clock ticks of the trace files. Blank lines and
//! lines starting with `#` are ignored. Files of hosts without an entry get
//! the identity map.

use crate::error::ReadError;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A linear clock correction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SyncTime {
    pub a: f64,
    pub loc0: u64,
    pub ref0: u64,
}

impl SyncTime {
    pub const IDENTITY: SyncTime = SyncTime {
        a: 1.0,
        loc0: 0,
        ref0: 0,
    };

    /// Maps a local time to the reference clock, both in ticks.
    #[inline]
    pub fn apply(&self, local: u64) -> f64 {
        (local as f64 - self.loc0 as f64) * self.a + self.ref0 as f64
    }

    /// Maps a local time to the reference clock in whole ticks.
    ///
    /// Only the offset from `loc0` is scaled in floating point, and rounding
    /// is monotonic, so two local times never swap order. The identity map
    /// is exact.
    pub fn apply_ticks(&self, local: u64) -> i128 {
        let offset = local as i128 - self.loc0 as i128;
        let scaled = if self.a == 1.0 {
            offset
        } else {
            (offset as f64 * self.a).round() as i128
        };
        self.ref0 as i128 + scaled
    }

    pub fn is_identity(&self) -> bool {
        *self == SyncTime::IDENTITY
    }
}

impl Default for SyncTime {
    fn default() -> Self {
        SyncTime::IDENTITY
    }
}

/// Clock corrections by host name.
#[derive(Clone, Debug, Default)]
pub struct SyncDescription {
    hosts: FxHashMap<String, SyncTime>,
}

impl SyncDescription {
    pub fn new() -> SyncDescription {
        SyncDescription::default()
    }

    pub fn from_path(path: &Path) -> Result<SyncDescription, ReadError> {
        let text = fs::read_to_string(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        SyncDescription::parse(&text)
    }

    pub fn parse(text: &str) -> Result<SyncDescription, ReadError> {
        let mut description = SyncDescription::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let error = |message: String| ReadError::Sync {
                line: i + 1,
                message,
            };

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [hostname, a, loc0, ref0] = fields[..] else {
                return Err(error(format!(
                    "expected `<hostname> <a> <loc0> <ref0>`, found {} fields",
                    fields.len()
                )));
            };

            let sync_time = SyncTime {
                a: a.parse()
                    .map_err(|_| error(format!("invalid coefficient {:?}", a)))?,
                loc0: loc0
                    .parse()
                    .map_err(|_| error(format!("invalid local reference {:?}", loc0)))?,
                ref0: ref0
                    .parse()
                    .map_err(|_| error(format!("invalid global reference {:?}", ref0)))?,
            };

            if description.hosts.insert(hostname.to_string(), sync_time).is_some() {
                warn!("sync description: host {:?} is listed more than once, using the last entry", hostname);
            }
        }

        Ok(description)
    }

    pub fn insert(&mut self, hostname: impl Into<String>, sync_time: SyncTime) {
        self.hosts.insert(hostname.into(), sync_time);
    }

    pub fn get(&self, hostname: &str) -> Option<SyncTime> {
        self.hosts.get(hostname).copied()
    }

    /// The correction for `hostname`, the identity if there is none.
    pub fn lookup(&self, hostname: &str) -> SyncTime {
        self.get(hostname).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let sync = SyncTime::default();
        assert!(sync.is_identity());
        assert_eq!(sync.apply(12345), 12345.0);
    }

    #[test]
    fn linear_map() {
        let sync = SyncTime {
            a: 2.0,
            loc0: 10,
            ref0: 100,
        };
        assert_eq!(sync.apply(10), 100.0);
        assert_eq!(sync.apply(25), 130.0);
        // Local times before `loc0` map before `ref0`.
        assert_eq!(sync.apply(0), 80.0);
    }

    #[test]
    fn ticks_keep_nanosecond_order() {
        let local = 1_700_000_000_000_000_000u64;
        let identity = SyncTime::IDENTITY;
        assert_eq!(identity.apply_ticks(local + 100), (local + 100) as i128);
        assert!(identity.apply_ticks(local) < identity.apply_ticks(local + 1));

        // f64 steps are about 256 ns at this scale.
        assert_eq!(identity.apply(local), identity.apply(local + 100));

        let sync = SyncTime {
            a: 1.5,
            loc0: local,
            ref0: 10,
        };
        assert_eq!(sync.apply_ticks(local + 100), 160);
        assert_eq!(sync.apply_ticks(local - 2), 7);
    }

    #[test]
    fn parse_description() {
        let description = SyncDescription::parse(
            "# host a loc0 ref0\n\
             \n\
             node-1 1 0 0\n\
             \tnode-2   2.5  1000 5000  \n",
        )
        .unwrap();

        assert_eq!(description.len(), 2);
        assert_eq!(description.get("node-1"), Some(SyncTime::IDENTITY));
        assert_eq!(
            description.get("node-2"),
            Some(SyncTime {
                a: 2.5,
                loc0: 1000,
                ref0: 5000
            })
        );
        assert_eq!(description.get("node-3"), None);
        assert!(description.lookup("node-3").is_identity());
    }

    #[test]
    fn parse_errors_name_the_line() {
        for (text, line) in [
            ("node-1 1 0\n", 1),
            ("# ok\nnode-1 x 0 0\n", 2),
            ("node-1 1 0 0\n\nnode-2 1 -5 0\n", 3),
            ("node-1 1 0 0 extra\n", 1),
        ] {
            match SyncDescription::parse(text) {
                Err(ReadError::Sync { line: found, .. }) => assert_eq!(found, line, "{:?}", text),
                other => panic!("unexpected result for {:?}: {:?}", text, other),
            }
        }
    }
}
