use std::fs;
use std::path::Path;

use sosreport_cli::cli::{Cli, UploadMethod};

/// A command line with every upload flag filled in for the given method.
#[allow(dead_code)]
pub fn make_test_cli(node: &str, role: &str, upload_method: UploadMethod) -> Cli {
    Cli {
        node_name: node.to_string(),
        role: role.to_string(),
        upload_method,
        case_number: "01234567".to_string(),
        nfs_share: "nfs.example.com:/exports".to_string(),
        nfs_options: "vers=4".to_string(),
        ftp_server: "ftp.example.com".to_string(),
        username: "alice".to_string(),
        password: "s3cret".to_string(),
        dry_run: true,
        ..Default::default()
    }
}

/// Names of the `.yaml` files in `dir`, sorted.
#[allow(dead_code)]
pub fn yaml_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("directory should be readable")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml"))
        .collect();
    names.sort();
    names
}
