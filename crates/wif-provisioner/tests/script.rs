mod common;

use common::{PROJECT_NUMBER, sample_wif};
use wif_provisioner::script::{JWKS_FILE, SCRIPT_FILE, emit, emit_for, render, shell_quote};
use wif_provisioner::{ErrorKind, WifError};

#[test]
fn script_names_project_record_and_templates() {
    let wif = sample_wif(&["v4.15", "v4.16"]);
    let script = render(&wif, 123456789012).unwrap();

    assert!(script.starts_with("#!/bin/bash\n"));
    assert!(script.contains("set -euo pipefail"));
    assert!(script.contains("wif-config wif-1 (acme-wif)"));
    assert!(script.contains("acme-prod (123456789012)"));
    assert!(script.contains("Templates: v4.15, v4.16"));
}

#[test]
fn every_create_is_guarded_by_a_describe() {
    let script = render(&sample_wif(&[]), 123456789012).unwrap();

    for create in [
        "gcloud iam workload-identity-pools create",
        "gcloud iam workload-identity-pools providers create-oidc",
        "gcloud iam service-accounts create",
        "gcloud iam roles create",
    ] {
        let at = script.find(create).unwrap_or_else(|| panic!("missing {create}"));
        let before = &script[..at];
        assert!(
            before.rfind("describe").is_some(),
            "{create} is not preceded by a describe probe"
        );
    }
}

#[test]
fn bindings_cover_support_and_access_methods() {
    let script = render(&sample_wif(&[]), 123456789012).unwrap();

    assert!(script.contains("--member='group:sre-team@example.com'"));
    assert!(script.contains("--role='roles/editor'"));
    assert!(script.contains("--role='projects/acme-prod/roles/acme_deployer'"));
    assert!(script.contains("--role='roles/iam.serviceAccountTokenCreator'"));
    assert!(script.contains("--role='roles/iam.workloadIdentityUser'"));
    assert!(script.contains(
        "system:serviceaccount:openshift-cloud-credential-operator:cloud-credential-operator"
    ));
    assert!(script.contains("--permissions='compute.instances.create,compute.instances.delete'"));
}

#[test]
fn emitting_twice_is_byte_identical() {
    let wif = sample_wif(&["v4.15"]);
    let dir = tempfile::tempdir().unwrap();

    let first_paths = emit(&wif, 123456789012, dir.path()).unwrap();
    let first: Vec<Vec<u8>> = first_paths.iter().map(|p| std::fs::read(p).unwrap()).collect();
    let second_paths = emit(&wif, 123456789012, dir.path()).unwrap();
    let second: Vec<Vec<u8>> = second_paths.iter().map(|p| std::fs::read(p).unwrap()).collect();

    assert_eq!(first_paths, second_paths);
    assert_eq!(first, second);
}

#[test]
fn emit_writes_script_and_jwks() {
    let wif = sample_wif(&["v4.15"]);
    let dir = tempfile::tempdir().unwrap();

    let paths = emit_for(&wif, dir.path()).unwrap();

    assert_eq!(paths, vec![dir.path().join(SCRIPT_FILE), dir.path().join(JWKS_FILE)]);
    let jwks = std::fs::read_to_string(dir.path().join(JWKS_FILE)).unwrap();
    assert_eq!(jwks, wif.gcp.workload_identity_pool.identity_provider.jwks);
    let script = std::fs::read_to_string(dir.path().join(SCRIPT_FILE)).unwrap();
    assert!(script.contains(PROJECT_NUMBER));
    assert!(script.contains("--jwk-json-path=\"$SCRIPT_DIR/jwk.json\""));
}

#[test]
fn empty_jwks_is_not_written() {
    let mut wif = sample_wif(&[]);
    wif.gcp.workload_identity_pool.identity_provider.jwks.clear();
    let dir = tempfile::tempdir().unwrap();

    let paths = emit_for(&wif, dir.path()).unwrap();

    assert_eq!(paths, vec![dir.path().join(SCRIPT_FILE)]);
    let script = std::fs::read_to_string(&paths[0]).unwrap();
    assert!(!script.contains("jwk-json-path"));
}

#[cfg(unix)]
#[test]
fn script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let paths = emit_for(&sample_wif(&[]), dir.path()).unwrap();
    let mode = std::fs::metadata(&paths[0]).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn invalid_project_number_is_rejected_before_writing() {
    let mut wif = sample_wif(&[]);
    wif.gcp.project_number = "12-34".into();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let err = emit_for(&wif, &out).unwrap_err();

    assert!(matches!(err, WifError::InvalidProjectNumber(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!out.exists());
}

#[test]
fn unwritable_target_is_an_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let err = emit_for(&sample_wif(&[]), &blocker).unwrap_err();

    assert!(matches!(err, WifError::ScriptIo { .. }));
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}

#[test]
fn shell_quote_escapes_single_quotes() {
    assert_eq!(shell_quote("plain"), "'plain'");
    assert_eq!(shell_quote("it's"), r"'it'\''s'");
}

#[test]
fn hostile_values_stay_quoted() {
    let mut wif = sample_wif(&[]);
    wif.gcp.support.principal = "x@example.com'; rm -rf / #".into();
    let script = render(&wif, 123456789012).unwrap();
    assert!(script.contains(r"--member='group:x@example.com'\''; rm -rf / #'"));
}
