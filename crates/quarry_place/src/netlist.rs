//! Collapsed cluster-level netlist and the cluster → nets index.
//!
//! Nets connect terminals that are either fixed external positions (I/O pads
//! and the like, keyed by name) or cluster pseudo-terminals keyed `x<id>`.

use crate::cluster::Cluster;
use crate::error::{PlaceError, PlaceResult};
use crate::ids::{ClusterId, NetId};
use std::collections::{BTreeMap, BTreeSet};

/// One endpoint of a net.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Terminal {
    /// A terminal with a fixed position, looked up by key.
    Fixed(String),
    /// The center of a cluster's box.
    Cluster(ClusterId),
}

impl Terminal {
    /// Parses a terminal key: `x<digits>` is a cluster pseudo-terminal,
    /// anything else a fixed key.
    ///
    /// Only the canonical spelling written by [`Terminal::key`] names a
    /// cluster, so `x+5` and `x007` stay fixed keys.
    pub fn from_key(key: &str) -> Self {
        key.strip_prefix('x')
            .filter(|id| {
                id.bytes().all(|b| b.is_ascii_digit()) && (*id == "0" || !id.starts_with('0'))
            })
            .and_then(|id| id.parse::<u32>().ok())
            .map_or_else(
                || Terminal::Fixed(key.to_string()),
                |id| Terminal::Cluster(ClusterId::from_raw(id)),
            )
    }

    /// The key this terminal is written as.
    pub fn key(&self) -> String {
        match self {
            Terminal::Fixed(key) => key.clone(),
            Terminal::Cluster(id) => format!("x{id}"),
        }
    }
}

/// Nets plus the positions of their fixed terminals.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    nets: BTreeMap<NetId, Vec<Terminal>>,
    fixed_pos: BTreeMap<String, (f64, f64)>,
}

impl Netlist {
    /// Builds a netlist, checking that every terminal resolves to a fixed
    /// position or a known cluster.
    pub fn new(
        nets: BTreeMap<NetId, BTreeSet<Terminal>>,
        fixed_pos: BTreeMap<String, (f64, f64)>,
        clusters: &BTreeMap<ClusterId, Cluster>,
    ) -> PlaceResult<Self> {
        for (&net, terminals) in &nets {
            for terminal in terminals {
                let known = match terminal {
                    Terminal::Fixed(key) => fixed_pos.contains_key(key),
                    Terminal::Cluster(id) => clusters.contains_key(id),
                };
                if !known {
                    return Err(PlaceError::UnknownTerminal {
                        net,
                        key: terminal.key(),
                    });
                }
            }
        }
        Ok(Self {
            nets: nets
                .into_iter()
                .map(|(id, terms)| (id, terms.into_iter().collect()))
                .collect(),
            fixed_pos,
        })
    }

    /// Builds a netlist from raw terminal keys.
    pub fn from_keys(
        nets: BTreeMap<NetId, BTreeSet<String>>,
        fixed_pos: BTreeMap<String, (f64, f64)>,
        clusters: &BTreeMap<ClusterId, Cluster>,
    ) -> PlaceResult<Self> {
        let nets = nets
            .into_iter()
            .map(|(id, keys)| (id, keys.iter().map(|k| Terminal::from_key(k)).collect()))
            .collect();
        Self::new(nets, fixed_pos, clusters)
    }

    /// Terminals of a net, empty for an unknown id.
    pub fn terminals(&self, net: NetId) -> &[Terminal] {
        self.nets.get(&net).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates all nets in id order.
    pub fn nets(&self) -> impl Iterator<Item = (NetId, &[Terminal])> {
        self.nets.iter().map(|(&id, t)| (id, t.as_slice()))
    }

    /// Number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Position of a fixed terminal.
    pub fn fixed_position(&self, key: &str) -> Option<(f64, f64)> {
        self.fixed_pos.get(key).copied()
    }
}

/// Maps each cluster to the nets it appears on, so a single-cluster move only
/// re-evaluates those nets.
#[derive(Debug, Clone, Default)]
pub struct NetlistIndex {
    by_cluster: BTreeMap<ClusterId, BTreeSet<NetId>>,
}

impl NetlistIndex {
    /// Indexes every cluster terminal of the netlist.
    pub fn build(netlist: &Netlist) -> Self {
        let mut by_cluster: BTreeMap<ClusterId, BTreeSet<NetId>> = BTreeMap::new();
        for (net, terminals) in netlist.nets() {
            for terminal in terminals {
                if let Terminal::Cluster(id) = terminal {
                    by_cluster.entry(*id).or_default().insert(net);
                }
            }
        }
        Self { by_cluster }
    }

    /// Nets touching `cluster`, in id order.
    pub fn nets_of(&self, cluster: ClusterId) -> impl Iterator<Item = NetId> + '_ {
        self.by_cluster
            .get(&cluster)
            .into_iter()
            .flat_map(|nets| nets.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters(n: u32) -> BTreeMap<ClusterId, Cluster> {
        (0..n)
            .map(|i| (ClusterId::from_raw(i), Cluster::new(["c0"])))
            .collect()
    }

    fn keys(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn terminal_keys() {
        assert_eq!(Terminal::from_key("x12"), Terminal::Cluster(ClusterId::from_raw(12)));
        assert_eq!(Terminal::from_key("i3"), Terminal::Fixed("i3".into()));
        assert_eq!(Terminal::from_key("xy"), Terminal::Fixed("xy".into()));
        assert_eq!(Terminal::from_key("x0"), Terminal::Cluster(ClusterId::from_raw(0)));
    }

    #[test]
    fn non_canonical_cluster_keys_stay_fixed() {
        for key in ["x+5", "x007", "x", "x-1"] {
            let terminal = Terminal::from_key(key);
            assert_eq!(terminal, Terminal::Fixed(key.into()));
            assert_eq!(terminal.key(), key);
        }
        let nets = BTreeMap::from([(NetId::from_raw(1), keys(&["x007"]))]);
        let err = Netlist::from_keys(nets, BTreeMap::new(), &clusters(8)).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownTerminal { key, .. } if key == "x007"));
        assert_eq!(Terminal::Cluster(ClusterId::from_raw(5)).key(), "x5");
    }

    #[test]
    fn unknown_fixed_terminal_rejected() {
        let nets = BTreeMap::from([(NetId::from_raw(0), keys(&["x0", "i9"]))]);
        let err = Netlist::from_keys(nets, BTreeMap::new(), &clusters(1)).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownTerminal { key, .. } if key == "i9"));
    }

    #[test]
    fn unknown_cluster_terminal_rejected() {
        let nets = BTreeMap::from([(NetId::from_raw(3), keys(&["x7"]))]);
        let err = Netlist::from_keys(nets, BTreeMap::new(), &clusters(2)).unwrap_err();
        assert!(matches!(err, PlaceError::UnknownTerminal { net, .. } if net.as_raw() == 3));
    }

    #[test]
    fn index_scopes_nets_per_cluster() {
        let nets = BTreeMap::from([
            (NetId::from_raw(0), keys(&["x0", "x1"])),
            (NetId::from_raw(1), keys(&["x1", "i0"])),
            (NetId::from_raw(2), keys(&["x2", "i0"])),
        ]);
        let fixed = BTreeMap::from([("i0".to_string(), (0.0, 0.0))]);
        let netlist = Netlist::from_keys(nets, fixed, &clusters(3)).unwrap();
        let index = NetlistIndex::build(&netlist);

        let of = |c| index.nets_of(ClusterId::from_raw(c)).map(NetId::as_raw).collect::<Vec<_>>();
        assert_eq!(of(0), vec![0]);
        assert_eq!(of(1), vec![0, 1]);
        assert_eq!(of(2), vec![2]);
        assert!(of(9).is_empty());
        assert_eq!(netlist.net_count(), 3);
        assert_eq!(netlist.terminals(NetId::from_raw(1)).len(), 2);
    }
}
