#![cfg(unix)]

mod common;

use common::{have_sh, Sandbox, COMPLETE_ENV};

#[test]
fn test_incomplete_configuration_launches_setup_wizard_with_failure_panel() {
    if !have_sh() {
        eprintln!("skipping: sh not found in PATH");
        return;
    }
    let sb = Sandbox::new();
    sb.write_fake_bunx("exit 0");
    sb.write_env_file(
        "SECRET_KEY=0123456789abcdef0123\nSERVER_URL=http://localhost:3000\n",
    );

    let out = sb
        .cmd(env!("CARGO_BIN_EXE_cms-dev"))
        .output()
        .expect("run cms-dev");
    assert!(out.status.success());

    let log = sb.read_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("argv=nx dev setup-wizard "), "{}", log[0]);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Setup required"), "{stdout}");
    assert!(stdout.contains("Reason: Missing database URL"), "{stdout}");
    assert!(stdout.contains("- DATABASE_URL"), "{stdout}");
}

#[test]
fn test_complete_configuration_launches_cms_with_success_panel() {
    if !have_sh() {
        eprintln!("skipping: sh not found in PATH");
        return;
    }
    let sb = Sandbox::new();
    sb.write_fake_bunx("exit 0");
    sb.write_env_file(COMPLETE_ENV);

    let out = sb
        .cmd(env!("CARGO_BIN_EXE_cms-dev"))
        .output()
        .expect("run cms-dev");
    assert!(out.status.success());

    let log = sb.read_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("argv=nx dev cms "), "{}", log[0]);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Setup configuration complete"), "{stdout}");
    assert!(!stdout.contains("Warnings:"), "no warnings expected: {stdout}");
}

#[test]
fn test_complete_configuration_with_warnings_lists_each_one() {
    if !have_sh() {
        eprintln!("skipping: sh not found in PATH");
        return;
    }
    let sb = Sandbox::new();
    sb.write_fake_bunx("exit 0");
    let mut env_file = COMPLETE_ENV.to_string();
    env_file.push_str("ADMIN_PASSWORD=admin\n");
    sb.write_env_file(&env_file);

    let out = sb
        .cmd(env!("CARGO_BIN_EXE_cms-dev"))
        .output()
        .expect("run cms-dev");
    assert!(out.status.success());

    let log = sb.read_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("argv=nx dev cms "), "warnings do not block: {}", log[0]);

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Setup configuration complete"), "{stdout}");
    assert!(stdout.contains("Using default admin password"), "{stdout}");
}

#[test]
fn test_process_environment_overrides_the_env_file() {
    if !have_sh() {
        eprintln!("skipping: sh not found in PATH");
        return;
    }
    let sb = Sandbox::new();
    sb.write_fake_bunx("exit 0");
    sb.write_env_file(COMPLETE_ENV);

    // live environment wins: blanking the database URL makes setup incomplete
    let out = sb
        .cmd(env!("CARGO_BIN_EXE_cms-dev"))
        .env("DATABASE_URL", "")
        .output()
        .expect("run cms-dev");
    assert!(out.status.success());

    let log = sb.read_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("argv=nx dev setup-wizard "), "{}", log[0]);
}
