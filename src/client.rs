use std::fmt::Debug;
use std::path::PathBuf;

use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::{Api, PostParams};
use kube::{Client, Config, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, trace, warn};

use crate::cli::Cli;
use crate::crd::{Sosreport, SosreportSpec, sosreport_name};
use crate::manifest;
use crate::targeting::{self, Resolution};
use crate::upload::{
    MergeData, UPLOAD_CONFIG_MAP_NAME, UPLOAD_SECRET_NAME, UploadConfiguration,
    UploadCredentials, Upsert, plan_upsert,
};

const DEFAULT_NAMESPACE: &str = "default";

/* ============================= TYPES ============================= */

/// Where generated objects go.
pub enum Output {
    /// Submit to the API server.
    Cluster(Client),
    /// Write one YAML file per object; `None` means the current directory.
    Files(Option<PathBuf>),
}

pub struct SosreportClient {
    output: Output,
    namespace: String,
}

/* ============================= CONSTRUCTION ============================= */

impl SosreportClient {
    /// Build a client from kubeconfig (or the in-cluster environment).
    ///
    /// In dry-run mode no connection is made; the kubeconfig is only read for
    /// its namespace.
    pub async fn new(cli: &Cli) -> Result<Self> {
        if cli.dry_run {
            let namespace = match &cli.namespace {
                Some(ns) => ns.clone(),
                None => match Config::infer().await {
                    Ok(config) => config.default_namespace,
                    Err(e) => {
                        warn!(error = %e, namespace = DEFAULT_NAMESPACE, "kubeconfig_unavailable");
                        DEFAULT_NAMESPACE.to_string()
                    }
                },
            };
            return Ok(Self::dry_run(namespace, cli.yaml_dir.clone()));
        }

        let config = Config::infer()
            .await
            .context("Failed to load kubeconfig")?;
        let namespace = cli
            .namespace
            .clone()
            .unwrap_or_else(|| config.default_namespace.clone());
        let client = Client::try_from(config).context("Failed to build Kubernetes client")?;

        Ok(Self::with_client(client, namespace))
    }

    /// A client that submits through an already built kube `Client`.
    pub fn with_client(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            output: Output::Cluster(client),
            namespace: namespace.into(),
        }
    }

    /// A client that only writes YAML files.
    pub fn dry_run(namespace: impl Into<String>, yaml_dir: Option<PathBuf>) -> Self {
        Self {
            output: Output::Files(yaml_dir),
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self.output, Output::Files(_))
    }
}

/* ============================= UPLOAD OBJECTS ============================= */

impl SosreportClient {
    pub async fn write_upload_secret(&self, credentials: &UploadCredentials) -> Result<()> {
        let secret = credentials.to_secret(&self.namespace);
        match &self.output {
            Output::Files(dir) => {
                manifest::write_yaml(dir.as_deref(), UPLOAD_SECRET_NAME, &secret)?;
            }
            Output::Cluster(client) => {
                let api: Api<Secret> = Api::namespaced(client.clone(), &self.namespace);
                upsert(&api, UPLOAD_SECRET_NAME, secret).await?;
            }
        }
        Ok(())
    }

    pub async fn write_upload_config_map(&self, configuration: &UploadConfiguration) -> Result<()> {
        let config_map = configuration.to_config_map(&self.namespace);
        match &self.output {
            Output::Files(dir) => {
                manifest::write_yaml(dir.as_deref(), UPLOAD_CONFIG_MAP_NAME, &config_map)?;
            }
            Output::Cluster(client) => {
                let api: Api<ConfigMap> = Api::namespaced(client.clone(), &self.namespace);
                upsert(&api, UPLOAD_CONFIG_MAP_NAME, config_map).await?;
            }
        }
        Ok(())
    }
}

/// Get by name, then create or merge-and-replace. No retry on conflict.
async fn upsert<K>(api: &Api<K>, name: &str, desired: K) -> Result<()>
where
    K: Resource + MergeData + Clone + Debug + Serialize + DeserializeOwned,
{
    let existing = api
        .get_opt(name)
        .await
        .with_context(|| format!("Failed to get '{name}'"))?;

    match plan_upsert(existing, desired) {
        Upsert::Create(object) => {
            api.create(&PostParams::default(), &object)
                .await
                .with_context(|| format!("Failed to create '{name}'"))?;
            info!(name = %name, "object_created");
        }
        Upsert::Update(object) => {
            api.replace(name, &PostParams::default(), &object)
                .await
                .with_context(|| format!("Failed to update '{name}'"))?;
            info!(name = %name, "object_updated");
        }
    }
    Ok(())
}

/* ============================= SOSREPORT ============================= */

/// Assemble the Sosreport object for a resolved node target.
pub fn build_sosreport(name: &str, namespace: &str, resolution: &Resolution) -> Sosreport {
    let mut sosreport = Sosreport::new(
        name,
        SosreportSpec {
            node_selector: resolution.target.node_selector(),
            tolerations: resolution.target.tolerations(),
        },
    );
    sosreport.metadata.namespace = Some(namespace.to_string());
    sosreport
}

impl SosreportClient {
    /// Create the Sosreport (or write its YAML) and return its name.
    pub async fn create_sosreport(&self, cli: &Cli) -> Result<String> {
        let name = sosreport_name(chrono::Utc::now().timestamp());
        debug!(name = %name, namespace = %self.namespace, "sosreport_name_generated");

        let resolution = targeting::resolve_target(&cli.node_name, &cli.role);
        if let Some(role) = &resolution.ignored_role {
            warn!(node = %cli.node_name, role = %role, "role_ignored_node_name_wins");
        }

        let sosreport = build_sosreport(&name, &self.namespace, &resolution);
        debug!(
            node_target = ?resolution.target,
            node_selector = ?sosreport.spec.node_selector,
            tolerations = ?sosreport.spec.tolerations,
            "sosreport_spec_built"
        );

        match &self.output {
            Output::Files(dir) => {
                manifest::write_yaml(dir.as_deref(), &name, &sosreport)?;
            }
            Output::Cluster(client) => {
                let api: Api<Sosreport> = Api::namespaced(client.clone(), &self.namespace);
                let created = api
                    .create(&PostParams::default(), &sosreport)
                    .await
                    .with_context(|| format!("Failed to create Sosreport '{name}'"))?;

                match serde_json::to_string_pretty(&created) {
                    Ok(json) => trace!("Created Sosreport:\n{json}"),
                    Err(e) => warn!(error = %e, name = %name, "sosreport_dump_failed"),
                }
                info!(name = %name, namespace = %self.namespace, "sosreport_created");
            }
        }
        Ok(name)
    }

    /// Write all three objects in order. The first failure aborts.
    pub async fn run(&self, cli: &Cli) -> Result<String> {
        let configuration = UploadConfiguration::from_cli(cli);
        configuration.validate()?;
        let credentials = UploadCredentials::from_cli(cli);

        self.write_upload_secret(&credentials).await?;
        self.write_upload_config_map(&configuration).await?;
        self.create_sosreport(cli).await
    }
}

/* ============================= TESTS ============================= */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::resolve_target;

    #[test]
    fn test_build_sosreport_for_role() {
        let sosreport = build_sosreport("sosreport-cli-1", "support", &resolve_target("", "master"));

        assert_eq!(sosreport.metadata.name.as_deref(), Some("sosreport-cli-1"));
        assert_eq!(sosreport.metadata.namespace.as_deref(), Some("support"));
        assert_eq!(sosreport.spec.node_selector["node-role.kubernetes.io/master"], "");
        assert_eq!(sosreport.spec.tolerations.len(), 1);
    }

    #[test]
    fn test_build_sosreport_for_all_nodes() {
        let sosreport = build_sosreport("sosreport-cli-1", "default", &resolve_target("", ""));
        assert!(sosreport.spec.node_selector.is_empty());
        assert!(sosreport.spec.tolerations.is_empty());
    }

    #[test]
    fn test_dry_run_client() {
        let client = SosreportClient::dry_run("support", None);
        assert!(client.is_dry_run());
        assert_eq!(client.namespace(), "support");
    }
}
