//! External collaborators: key extraction and catalog compilation.
//!
//! Both run `pybabel` as a child process from the project directory.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::template::Template;
use super::types::SyncError;

/// Produces a key template from project sources.
pub trait Extractor {
    /// Extract keys below `project_dir`, write them to `template_path` and
    /// return the resulting template.
    fn extract(&self, project_dir: &Path, template_path: &Path) -> Result<Template, SyncError>;
}

/// Compiles catalogs into their runtime form.
pub trait CatalogCompiler {
    /// Compile every catalog of `domain` below `locales_dir`.
    fn compile(
        &self,
        project_dir: &Path,
        locales_dir: &Path,
        domain: &str,
    ) -> Result<(), SyncError>;
}

/// Directory the tools run from: the parent of the locales directory.
pub fn project_dir(locales_dir: &Path) -> PathBuf {
    locales_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf()
}

/// `pybabel` command-line wrapper.
#[derive(Debug, Clone)]
pub struct Pybabel {
    /// Executable name or path
    pub program: String,
    /// Value for `--input-dirs`
    pub input_dirs: String,
    /// Keyword markers for the second extraction pass (`-k`)
    pub keywords: Vec<String>,
}

impl Default for Pybabel {
    fn default() -> Self {
        Self {
            program: "pybabel".to_string(),
            input_dirs: ".".to_string(),
            keywords: vec!["_:1,1t".to_string(), "_:1,2".to_string(), "__".to_string()],
        }
    }
}

impl Pybabel {
    fn run(&self, project_dir: &Path, args: &[String]) -> Result<(), String> {
        tracing::debug!("Running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(project_dir)
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("{} exited with {}: {}", self.program, output.status, stderr.trim()))
        }
    }

    /// Argument lists of every extraction pass, writing to `output`.
    pub fn extraction_passes(&self, output: &Path) -> Vec<Vec<String>> {
        let base = vec![
            "extract".to_string(),
            format!("--input-dirs={}", self.input_dirs),
            "-o".to_string(),
            output.display().to_string(),
        ];

        let mut passes = vec![base.clone()];
        if !self.keywords.is_empty() {
            let mut keyed = vec!["extract".to_string()];
            for keyword in &self.keywords {
                keyed.push("-k".to_string());
                keyed.push(keyword.clone());
            }
            keyed.extend(base.into_iter().skip(1));
            passes.push(keyed);
        }
        passes
    }
}

impl Extractor for Pybabel {
    fn extract(&self, project_dir: &Path, template_path: &Path) -> Result<Template, SyncError> {
        let dir = template_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| SyncError::Extraction(e.to_string()))?;
        // pybabel runs from the project directory, so hand it absolute paths.
        let dir = dir
            .canonicalize()
            .map_err(|e| SyncError::Extraction(e.to_string()))?;
        let dir = dir.as_path();

        // Each pass writes its own scratch file; the results are merged so
        // every keyword set contributes to one template.
        let mut template = Template::default();
        let scratch = tempfile::Builder::new()
            .prefix(".extract")
            .suffix(".pot")
            .tempfile_in(dir)
            .map_err(|e| SyncError::Extraction(e.to_string()))?;

        for args in self.extraction_passes(scratch.path()) {
            self.run(project_dir, &args).map_err(SyncError::Extraction)?;
            let pass = Template::load(scratch.path()).map_err(SyncError::Template)?;
            template.union(pass);
        }

        let header = template.document().header.as_ref();
        let content = crate::catalog::write_po(header, template.entries());
        let mut out = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| SyncError::Extraction(e.to_string()))?;
        out.write_all(content.as_bytes())
            .map_err(|e| SyncError::Extraction(e.to_string()))?;
        out.persist(template_path)
            .map_err(|e| SyncError::Extraction(e.error.to_string()))?;

        tracing::info!(
            "Extracted {} keys into {}",
            template.len(),
            template_path.display()
        );
        Ok(template)
    }
}

impl CatalogCompiler for Pybabel {
    fn compile(
        &self,
        project_dir: &Path,
        locales_dir: &Path,
        domain: &str,
    ) -> Result<(), SyncError> {
        let locales_dir = locales_dir
            .canonicalize()
            .map_err(|e| SyncError::Compile(format!("{}: {}", locales_dir.display(), e)))?;
        let args = vec![
            "compile".to_string(),
            "-d".to_string(),
            locales_dir.display().to_string(),
            "-D".to_string(),
            domain.to_string(),
        ];
        self.run(project_dir, &args).map_err(SyncError::Compile)?;
        tracing::info!("Compiled catalogs in {}", locales_dir.display());
        Ok(())
    }
}
