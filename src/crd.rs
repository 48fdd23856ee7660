use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Toleration;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/* ============================= CONSTANTS ============================= */

pub const SOSREPORT_NAME_PREFIX: &str = "sosreport-cli";

/* ============================= SPEC ============================= */

/// Sosreport requests a diagnostic data collection on the selected nodes.
///
/// The sosreport operator watches these objects and schedules the
/// collection jobs. This client only creates them.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "support.openshift.io",
    version = "v1alpha1",
    kind = "Sosreport",
    plural = "sosreports",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SosreportSpec {
    /// Label criteria a node must match to be collected from. Empty means all nodes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    /// Tolerations for the collection pods.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
}

/// Name for a new Sosreport, unique per second of wall-clock time.
pub fn sosreport_name(unix_seconds: i64) -> String {
    format!("{SOSREPORT_NAME_PREFIX}-{unix_seconds}")
}

/* ============================= TESTS ============================= */

#[cfg(test)]
mod tests {
    use super::*;
    use kube::{CustomResourceExt, Resource};

    #[test]
    fn test_crd_api_group_and_version() {
        let crd = Sosreport::crd();
        assert_eq!(crd.spec.group, Sosreport::group(&()));
        assert_eq!(crd.spec.versions[0].name, Sosreport::version(&()));
        assert_eq!(Sosreport::group(&()), "support.openshift.io");
        assert_eq!(Sosreport::version(&()), "v1alpha1");
    }

    #[test]
    fn test_crd_kind_and_scope() {
        let crd = Sosreport::crd();
        assert_eq!(crd.spec.names.kind, "Sosreport");
        assert_eq!(crd.spec.names.plural, "sosreports");
        assert_eq!(crd.spec.scope, "Namespaced");
    }

    #[test]
    fn test_api_version_string() {
        assert_eq!(Sosreport::api_version(&()), "support.openshift.io/v1alpha1");
    }

    #[test]
    fn test_sosreport_name() {
        assert_eq!(sosreport_name(1_700_000_000), "sosreport-cli-1700000000");
    }

    #[test]
    fn test_empty_spec_omits_fields() {
        let json = serde_json::to_string(&SosreportSpec::default()).expect("should serialize");
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_spec_serializes_camel_case() {
        let spec = SosreportSpec {
            node_selector: BTreeMap::from([(
                "kubernetes.io/hostname".to_string(),
                "worker-0".to_string(),
            )]),
            tolerations: vec![Toleration {
                key: Some("node-role.kubernetes.io/master".to_string()),
                effect: Some("NoSchedule".to_string()),
                ..Default::default()
            }],
        };

        let json = serde_json::to_value(&spec).expect("should serialize");
        assert_eq!(json["nodeSelector"]["kubernetes.io/hostname"], "worker-0");
        assert_eq!(json["tolerations"][0]["effect"], "NoSchedule");
    }

    #[test]
    fn test_resource_carries_type_meta() {
        let sosreport = Sosreport::new("sosreport-cli-1", SosreportSpec::default());
        let json = serde_json::to_value(&sosreport).expect("should serialize");
        assert_eq!(json["apiVersion"], "support.openshift.io/v1alpha1");
        assert_eq!(json["kind"], "Sosreport");
        assert_eq!(json["metadata"]["name"], "sosreport-cli-1");
    }
}
