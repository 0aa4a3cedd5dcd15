use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use oxifix_core::{
    DEFAULT_EXTENSIONS, PROJECT_CONFIG_FILE, ProjectConfig, SOURCE_EXTENSION, load_project_config,
};
use path_clean::clean;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "postprocess")]
#[command(about = "Rewrite path-aliased imports in build output into relative paths")]
pub struct Config {
    /// Root directory of the project (defaults to git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Project configuration file (defaults to tsconfig.json under the root)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Build output directory, overriding compilerOptions.outDir
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// File extensions to process
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    )]
    pub extensions: Vec<String>,

    /// Extension appended to relative specifiers that lack one
    #[arg(long, default_value_t = SOURCE_EXTENSION.to_string())]
    pub source_extension: String,

    /// Report changes without writing files
    #[arg(long)]
    pub dry_run: bool,

    #[clap(skip)]
    pub project_config: Option<ProjectConfig>,
}

impl Config {
    /// Initialize the config by resolving the root directory and loading the project configuration
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().unwrap_or(r)
        } else {
            debug!("No root provided, searching for git root");
            oxifix_core::find_git_root()?
        };
        info!("Using root directory: {}", root.display());

        let config_path = match self.project.take() {
            Some(p) if p.is_absolute() => p,
            Some(p) => root.join(p),
            None => root.join(PROJECT_CONFIG_FILE),
        };
        let mut project = load_project_config(&config_path)?;

        if let Some(out_dir) = &self.out_dir {
            debug!("Overriding outDir with {:?}", out_dir);
            project.out_dir = clean(root.join(out_dir));
        }
        info!("Using output directory: {}", project.out_dir.display());

        self.root = Some(root);
        self.project = Some(config_path);
        self.project_config = Some(project);
        Ok(())
    }

    /// Get the loaded project configuration, returning an error if not initialized
    pub fn project_config(&self) -> Result<&ProjectConfig> {
        self.project_config
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
