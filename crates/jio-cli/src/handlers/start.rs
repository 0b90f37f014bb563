use anyhow::Result;

pub struct StartHandler;

impl StartHandler {
    pub fn handle_start() -> Result<()> {
        jio_runtime::start_application(".")
    }
}
