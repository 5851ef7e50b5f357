#![cfg(unix)]

mod common;

use common::{have_sh, Sandbox, COMPLETE_ENV};

#[test]
fn test_doctor_reports_configuration_and_never_launches() {
    if !have_sh() {
        eprintln!("skipping: sh not found in PATH");
        return;
    }
    let sb = Sandbox::new();
    sb.write_fake_bunx("exit 0");
    sb.write_env_file(COMPLETE_ENV);

    let out = sb
        .cmd(env!("CARGO_BIN_EXE_cms-dev"))
        .arg("--doctor")
        .output()
        .expect("run cms-dev --doctor");
    assert!(out.status.success());
    assert!(sb.read_log().is_empty(), "doctor must not invoke the task runner");

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("cms-dev doctor"), "{stderr}");
    assert!(stderr.contains("bunx on PATH: yes"), "{stderr}");
    assert!(stderr.contains("setup configuration: complete"), "{stderr}");
    assert!(stderr.contains("doctor: completed diagnostics."), "{stderr}");
}

#[test]
fn test_doctor_lists_problems_for_incomplete_configuration() {
    if !have_sh() {
        eprintln!("skipping: sh not found in PATH");
        return;
    }
    let sb = Sandbox::new();
    // no tools, no env file

    let out = sb
        .cmd(env!("CARGO_BIN_EXE_cms-dev"))
        .arg("--doctor")
        .output()
        .expect("run cms-dev --doctor");
    assert!(out.status.success(), "doctor succeeds even when everything is missing");

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("bun: not found"), "{stderr}");
    assert!(stderr.contains("bunx on PATH: no (a shim will be created)"), "{stderr}");
    assert!(stderr.contains("setup configuration: incomplete"), "{stderr}");
    assert!(stderr.contains("missing/invalid: DATABASE_URL"), "{stderr}");
}
