use anyhow::Result;

pub struct RunHandler;

impl RunHandler {
    pub fn handle_run_script(script: &str) -> Result<()> {
        jio_runtime::run_script(".", script)
    }
}
