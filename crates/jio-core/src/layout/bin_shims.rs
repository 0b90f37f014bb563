//! Binary launcher shims (spec §4.7 "Binary shims"): one Unix shell
//! launcher plus a Windows `.cmd` and PowerShell launcher per declared
//! `bin` entry, written alongside the package's placement.

use std::fs;
use std::path::Path;

use jio_error::{PackageManagerError, Result};
use jio_manifest::Bin;

/// Write launchers for every `bin` entry `package_dir`'s own `package.json`
/// declares. Reads the unpacked manifest rather than registry metadata, so
/// a patched/overridden `package.json` still produces the right shims. A
/// package without a `bin` field contributes nothing.
pub fn write_shims_for(package_name: &str, package_dir: &Path, bin_dir: &Path) -> Result<()> {
    let manifest_path = package_dir.join("package.json");
    if !manifest_path.is_file() {
        return Ok(());
    }
    let content = fs::read_to_string(&manifest_path).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| PackageManagerError::BadManifest(e.to_string()))?;
    let Some(bin_value) = value.get("bin") else {
        return Ok(());
    };
    let Ok(bin) = serde_json::from_value::<Bin>(bin_value.clone()) else {
        return Ok(());
    };

    let entries: Vec<(String, String)> = match bin {
        Bin::Single(path) => vec![(short_name(package_name), path)],
        Bin::Many(map) => map.into_iter().collect(),
    };
    if entries.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(bin_dir).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    for (command, rel_path) in entries {
        let script_path = package_dir.join(&rel_path);
        let rel = relative_target(bin_dir, &script_path);
        write_unix_shim(bin_dir, &command, &rel)?;
        write_windows_shims(bin_dir, &command, &rel)?;
    }
    Ok(())
}

fn short_name(package_name: &str) -> String {
    package_name.rsplit('/').next().unwrap_or(package_name).to_string()
}

fn write_unix_shim(bin_dir: &Path, command: &str, rel_target: &str) -> Result<()> {
    let shim_path = bin_dir.join(command);
    let content = format!("#!/bin/sh\nbasedir=$(dirname \"$0\")\nexec node \"$basedir/{rel_target}\" \"$@\"\n");
    fs::write(&shim_path, content).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    set_executable(&shim_path)
}

fn write_windows_shims(bin_dir: &Path, command: &str, rel_target: &str) -> Result<()> {
    let cmd_path = bin_dir.join(format!("{command}.cmd"));
    let cmd_content = format!("@ECHO off\r\nnode \"%~dp0\\{rel_target}\" %*\r\n");
    fs::write(&cmd_path, cmd_content).map_err(|e| PackageManagerError::Io(e.to_string()))?;

    let ps1_path = bin_dir.join(format!("{command}.ps1"));
    let ps1_content = format!(
        "#!/usr/bin/env pwsh\n$basedir = Split-Path $MyInvocation.MyCommand.Definition -Parent\n& node \"$basedir/{rel_target}\" @args\nexit $LASTEXITCODE\n"
    );
    fs::write(&ps1_path, ps1_content).map_err(|e| PackageManagerError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .map_err(|e| PackageManagerError::Io(e.to_string()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).map_err(|e| PackageManagerError::Io(e.to_string()))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Relative path from `from_dir` to `to`, assuming both share a common
/// ancestor (they always do here: both descend from the same project
/// directory's `node_modules`).
fn relative_target(from_dir: &Path, to: &Path) -> String {
    let from: Vec<_> = from_dir.components().collect();
    let target: Vec<_> = to.components().collect();
    let common = from.iter().zip(target.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &target[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    parts.join("/")
}
