use std::path::Path;

use indexmap::IndexMap;

use jio_error::{PackageManagerError, Result};
use jio_manifest::PackageJson;

pub struct InitManager;

impl InitManager {
    #[must_use]
    pub fn new() -> Self {
        InitManager
    }

    pub fn init_project(
        &self,
        project_dir: &str,
        name: &str,
        description: Option<&str>,
        version: Option<&str>,
        license: Option<&str>,
    ) -> Result<()> {
        let project_path = Path::new(project_dir);
        let package_json_path = project_path.join("package.json");

        if package_json_path.exists() {
            return Err(PackageManagerError::PackageJsonExists(
                package_json_path.to_string_lossy().into_owned(),
            ));
        }

        jio_logger::status("Initializing new package...");

        let mut scripts = IndexMap::new();
        scripts.insert(
            "test".to_string(),
            "echo \"Error: no test specified\" && exit 1".to_string(),
        );
        scripts.insert("start".to_string(), "node index.js".to_string());
        scripts.insert(
            "build".to_string(),
            "echo \"No build script specified\"".to_string(),
        );

        let mut other = IndexMap::new();
        other.insert("keywords".to_string(), serde_json::Value::Array(vec![]));
        other.insert("author".to_string(), serde_json::Value::String(String::new()));

        let package_json = PackageJson {
            name: Some(name.to_string()),
            version: Some(version.unwrap_or("1.0.0").to_string()),
            description: Some(description.unwrap_or_default().to_string()),
            license: Some(license.unwrap_or("ISC").to_string()),
            main: Some("index.js".to_string()),
            bin: None,
            scripts: Some(scripts),
            dependencies: Some(IndexMap::new()),
            dev_dependencies: Some(IndexMap::new()),
            peer_dependencies: None,
            optional_dependencies: None,
            workspaces: None,
            files: None,
            private: None,
            patched_dependencies: None,
            other,
        };

        package_json
            .save(&package_json_path)
            .map_err(|e| PackageManagerError::BadManifest(e.to_string()))?;

        self.create_basic_files(project_path)?;

        jio_logger::finish(&format!(
            "Initialized new package '{name}' in {project_dir}"
        ));
        self.show_next_steps();

        Ok(())
    }

    pub fn init_interactive(&self, project_dir: &str, yes: bool) -> Result<()> {
        let project_path = Path::new(project_dir);
        let dir_name = project_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("my-package");

        if !yes {
            jio_logger::info("Interactive initialization not implemented; using defaults.");
        }

        self.init_project(
            project_dir,
            dir_name,
            Some("A new package"),
            Some("1.0.0"),
            Some("ISC"),
        )
    }

    fn create_basic_files(&self, project_path: &Path) -> Result<()> {
        let index_js_path = project_path.join("index.js");
        if !index_js_path.exists() {
            std::fs::write(&index_js_path, "console.log('Hello, world!');\n")
                .map_err(|e| PackageManagerError::Io(format!("index.js: {e}")))?;
        }

        let readme_path = project_path.join("README.md");
        if !readme_path.exists() {
            let name = project_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("my-package");
            let readme_content = format!(
                "# {name}\n\nA new Node.js package.\n\n## Installation\n\n```bash\njio install\n```\n\n## Usage\n\n```bash\njio start\n```\n"
            );
            std::fs::write(&readme_path, readme_content)
                .map_err(|e| PackageManagerError::Io(format!("README.md: {e}")))?;
        }

        let gitignore_path = project_path.join(".gitignore");
        if !gitignore_path.exists() {
            std::fs::write(
                &gitignore_path,
                "node_modules/\n.env\n.DS_Store\ndist/\nbuild/\n*.log\n",
            )
            .map_err(|e| PackageManagerError::Io(format!(".gitignore: {e}")))?;
        }

        Ok(())
    }

    fn show_next_steps(&self) {
        jio_logger::info("Next steps:");
        jio_logger::info("  1. Install dependencies: jio install");
        jio_logger::info("  2. Start developing: code .");
        jio_logger::info("  3. Run your package: jio start");
    }
}

impl Default for InitManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_project(
    project_dir: &str,
    name: &str,
    description: Option<&str>,
    version: Option<&str>,
    license: Option<&str>,
) -> Result<()> {
    InitManager::new().init_project(project_dir, name, description, version, license)
}
