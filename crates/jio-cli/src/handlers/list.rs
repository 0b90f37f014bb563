use anyhow::Result;

use jio_core::ListManager;

pub struct ListHandler;

impl ListHandler {
    pub fn handle_list_dependencies(tree: bool, depth: Option<u32>) -> Result<()> {
        ListManager.list_dependencies(".", tree, depth)?;
        Ok(())
    }
}
