#![allow(dead_code)]
//! Shared helpers: a sandbox whose PATH serves fake `bunx`/`bun` tools that
//! record their argv and interesting environment to a log file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A complete setup configuration as the shipped validator understands it.
pub const COMPLETE_ENV: &str = "DATABASE_URL=postgres://localhost:5432/app\n\
SECRET_KEY=0123456789abcdef0123\n\
SERVER_URL=http://localhost:3000\n";

pub fn have_sh() -> bool {
    Command::new("sh")
        .args(["-c", "exit 0"])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Sandbox {
        let dir = tempfile::tempdir().expect("tmpdir");
        fs::create_dir_all(dir.path().join("tools")).expect("tools dir");
        Sandbox { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn tools(&self) -> PathBuf {
        self.root().join("tools")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root().join("runner.log")
    }

    pub fn read_log(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn write_tool(&self, name: &str, script: &str) {
        let path = self.tools().join(name);
        fs::write(&path, script).expect("write tool");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod tool");
        }
    }

    fn recorder_script(&self, body: &str) -> String {
        format!(
            "#!/bin/sh\n\
             echo \"argv=$* FORCE_COLOR=${{FORCE_COLOR:-}} NX_TERMINAL_OUTPUT_FORMAT=${{NX_TERMINAL_OUTPUT_FORMAT:-}} NX_NATIVE_LOGGING=${{NX_NATIVE_LOGGING:-}} NODE_OPTIONS=${{NODE_OPTIONS:-}}\" >> \"{log}\"\n\
             {body}\n",
            log = self.log_path().display()
        )
    }

    /// Fake `bunx`: records one log line per invocation, then runs `body`.
    pub fn write_fake_bunx(&self, body: &str) {
        self.write_tool("bunx", &self.recorder_script(body));
    }

    /// Fake `bun` runtime only (no `bunx`), for exercising the shim path.
    pub fn write_fake_bun(&self, body: &str) {
        self.write_tool("bun", &self.recorder_script(body));
    }

    pub fn write_env_file(&self, contents: &str) {
        fs::write(self.root().join(".env"), contents).expect("write env file");
    }

    /// Launcher invocation with a fully controlled environment: PATH serves
    /// only the sandbox tools, the env file lives in the sandbox, and setup
    /// fields from the host environment are scrubbed.
    pub fn cmd(&self, bin: &str) -> Command {
        let mut cmd = Command::new(bin);
        cmd.current_dir(self.root());
        // Sandbox tools take precedence, but the real PATH is appended so the
        // fake scripts can still reach system coreutils (e.g. `sleep`).
        let tools = self.tools();
        let path = match std::env::var_os("PATH") {
            Some(existing) => {
                let mut dirs = vec![tools.clone()];
                dirs.extend(std::env::split_paths(&existing));
                std::env::join_paths(dirs).unwrap_or_else(|_| tools.clone().into_os_string())
            }
            None => tools.clone().into_os_string(),
        };
        cmd.env("PATH", path);
        cmd.env("CMS_LAUNCHER_ENV_FILE", self.root().join(".env"));
        cmd.env("NO_COLOR", "1");
        for key in [
            "DATABASE_URL",
            "SECRET_KEY",
            "SERVER_URL",
            "ADMIN_PASSWORD",
            "NODE_OPTIONS",
            "CMS_LAUNCHER_COLOR",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }
}
