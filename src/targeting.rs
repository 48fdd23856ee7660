use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Toleration;

/* ============================= CONSTANTS ============================= */

pub const HOSTNAME_LABEL: &str = "kubernetes.io/hostname";
pub const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";
pub const NO_SCHEDULE: &str = "NoSchedule";

/// Roles whose nodes carry a `NoSchedule` taint keyed on the role label.
const CONTROL_PLANE_ROLES: &[&str] = &["master", "control-plane"];

/* ============================= TYPES ============================= */

/// Which nodes a Sosreport should run on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTarget {
    /// A single node, matched on its hostname label.
    Hostname(String),
    /// Every node carrying the role label.
    Role(String),
    /// No restriction.
    All,
}

/// Outcome of resolving `--node` and `--role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: NodeTarget,
    /// Set when a role was given alongside a node name and dropped.
    pub ignored_role: Option<String>,
}

/* ============================= RESOLUTION ============================= */

/// Resolve the node target. A node name takes priority over a role.
pub fn resolve_target(node_name: &str, role: &str) -> Resolution {
    match (node_name.is_empty(), role.is_empty()) {
        (false, false) => Resolution {
            target: NodeTarget::Hostname(node_name.to_string()),
            ignored_role: Some(role.to_string()),
        },
        (false, true) => Resolution {
            target: NodeTarget::Hostname(node_name.to_string()),
            ignored_role: None,
        },
        (true, false) => Resolution {
            target: NodeTarget::Role(role.to_string()),
            ignored_role: None,
        },
        (true, true) => Resolution {
            target: NodeTarget::All,
            ignored_role: None,
        },
    }
}

impl NodeTarget {
    pub fn node_selector(&self) -> BTreeMap<String, String> {
        match self {
            NodeTarget::Hostname(name) => {
                BTreeMap::from([(HOSTNAME_LABEL.to_string(), name.clone())])
            }
            NodeTarget::Role(role) => {
                BTreeMap::from([(format!("{ROLE_LABEL_PREFIX}{role}"), String::new())])
            }
            NodeTarget::All => BTreeMap::new(),
        }
    }

    /// Tolerations needed to land on the target.
    ///
    /// A role matches a control-plane role exactly; a hostname matches when it
    /// contains the role name. This will miss clusters with other naming
    /// schemes or custom taints.
    pub fn tolerations(&self) -> Vec<Toleration> {
        let role = match self {
            NodeTarget::Role(role) => CONTROL_PLANE_ROLES.iter().find(|r| **r == role.as_str()),
            NodeTarget::Hostname(name) => {
                CONTROL_PLANE_ROLES.iter().find(|r| name.contains(**r))
            }
            NodeTarget::All => None,
        };

        role.map(|r| no_schedule_toleration(&format!("{ROLE_LABEL_PREFIX}{r}")))
            .into_iter()
            .collect()
    }
}

fn no_schedule_toleration(key: &str) -> Toleration {
    Toleration {
        key: Some(key.to_string()),
        effect: Some(NO_SCHEDULE.to_string()),
        ..Default::default()
    }
}

/* ============================= TESTS ============================= */
