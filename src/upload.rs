use std::collections::BTreeMap;

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::api::ObjectMeta;

use crate::cli::{Cli, UploadMethod};

/* ============================= CONSTANTS ============================= */

pub const UPLOAD_SECRET_NAME: &str = "sosreport-upload-secret";
pub const UPLOAD_CONFIG_MAP_NAME: &str = "sosreport-upload-configuration";

/* ============================= RECORDS ============================= */

/// Credentials for the support portal or FTP server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadCredentials {
    pub username: String,
    pub password: String,
}

/// Where and how the operator uploads finished Sosreports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadConfiguration {
    pub upload_method: UploadMethod,
    pub case_number: String,
    pub obfuscate: bool,
    pub nfs_share: String,
    pub nfs_options: String,
    pub ftp_server: String,
}

impl UploadCredentials {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            username: cli.username.clone(),
            password: cli.password.clone(),
        }
    }

    pub fn to_secret(&self, namespace: &str) -> Secret {
        Secret {
            metadata: object_meta(UPLOAD_SECRET_NAME, namespace),
            data: Some(BTreeMap::from([
                ("username".to_string(), ByteString(self.username.clone().into_bytes())),
                ("password".to_string(), ByteString(self.password.clone().into_bytes())),
            ])),
            ..Default::default()
        }
    }
}

impl UploadConfiguration {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            upload_method: cli.upload_method,
            case_number: cli.case_number.clone(),
            obfuscate: cli.obfuscate,
            nfs_share: cli.nfs_share.clone(),
            nfs_options: cli.nfs_options.clone(),
            ftp_server: cli.ftp_server.clone(),
        }
    }

    /// Reject an upload method whose destination is missing.
    pub fn validate(&self) -> anyhow::Result<()> {
        let (flag, value) = match self.upload_method {
            UploadMethod::None => return Ok(()),
            UploadMethod::Case => ("--case-number", &self.case_number),
            UploadMethod::Ftp => ("--ftp-server", &self.ftp_server),
            UploadMethod::Nfs => ("--nfs-share", &self.nfs_share),
        };
        if value.is_empty() {
            anyhow::bail!(
                "Upload method '{}' requires {} to be set",
                self.upload_method,
                flag
            );
        }
        Ok(())
    }

    pub fn to_config_map(&self, namespace: &str) -> ConfigMap {
        let data = [
            ("upload-method", self.upload_method.to_string()),
            ("case-number", self.case_number.clone()),
            ("obfuscate", self.obfuscate.to_string()),
            ("nfs-share", self.nfs_share.clone()),
            ("nfs-options", self.nfs_options.clone()),
            ("ftp-server", self.ftp_server.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        ConfigMap {
            metadata: object_meta(UPLOAD_CONFIG_MAP_NAME, namespace),
            data: Some(data),
            ..Default::default()
        }
    }
}

fn object_meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

/* ============================= UPSERT ============================= */

/// Objects whose `data` map can be merged key by key.
pub trait MergeData {
    /// Copy every key of `other` into `self`, overwriting on collision.
    fn merge_data(&mut self, other: &Self);
}

impl MergeData for ConfigMap {
    fn merge_data(&mut self, other: &Self) {
        merge_maps(&mut self.data, &other.data);
    }
}

impl MergeData for Secret {
    fn merge_data(&mut self, other: &Self) {
        merge_maps(&mut self.data, &other.data);
    }
}

fn merge_maps<V: Clone>(
    target: &mut Option<BTreeMap<String, V>>,
    source: &Option<BTreeMap<String, V>>,
) {
    if let Some(source) = source {
        let target = target.get_or_insert_with(BTreeMap::new);
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// What to send to the API server for a named object.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert<K> {
    Create(K),
    Update(K),
}

/// Decide between create and update. Only the existence of `existing` matters.
///
/// On update the existing object is kept, including its resource version,
/// and the desired data is merged on top.
pub fn plan_upsert<K: MergeData>(existing: Option<K>, desired: K) -> Upsert<K> {
    match existing {
        None => Upsert::Create(desired),
        Some(mut current) => {
            current.merge_data(&desired);
            Upsert::Update(current)
        }
    }
}

/* ============================= TESTS ============================= */
