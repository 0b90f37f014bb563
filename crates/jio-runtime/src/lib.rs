use std::path::PathBuf;
use std::process::Command;

use jio_manifest::read_package_json;

/// Shell out to the named `package.json` script via the platform shell
/// (spec §10 "Script execution (collaborator)"). This does not reproduce
/// npm's full lifecycle-script and `PATH`-prepending behaviour — out of
/// scope, same as the core resolver/store it sits beside.
pub fn run_script(project_dir: &str, script_name: &str) -> anyhow::Result<()> {
    let path = PathBuf::from(project_dir);
    let pkg = read_package_json(&path)?;

    let Some(scripts) = pkg.scripts else {
        jio_logger::error("No scripts defined in package.json");
        return Ok(());
    };
    let Some(script) = scripts.get(script_name) else {
        jio_logger::error(&format!("Script '{script_name}' not found in package.json"));
        return Ok(());
    };

    jio_logger::info(&format!("Running script '{script_name}'..."));

    let status = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", script]).current_dir(&path).status()?
    } else {
        Command::new("sh").arg("-c").arg(script).current_dir(&path).status()?
    };

    if status.success() {
        jio_logger::success(&format!("Script '{script_name}' executed successfully!"));
    } else {
        jio_logger::error(&format!(
            "Script '{script_name}' failed with exit code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    Ok(())
}

/// `jio start`: npm-convention shorthand for `run_script(dir, "start")`.
pub fn start_application(project_dir: &str) -> anyhow::Result<()> {
    run_script(project_dir, "start")
}
