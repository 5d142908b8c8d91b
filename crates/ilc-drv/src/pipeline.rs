//! Phase-by-phase orchestration: lex → parse → sem → (optional) opt →
//! codegen → assemble → archive, per spec.md §5. A failure in an
//! earlier phase aborts every later one; semantic analysis is the one
//! phase that collects every error across the whole program before the
//! pipeline decides to abort.

use std::path::Path;
use std::process::Command;

use ilc_opt::OptimizationReport;
use ilc_util::{Handler, SourceMap};

use crate::config;
use crate::error::{DriverError, Result};
use crate::manifest::Manifest;
use crate::output::OutputDir;

pub struct CompileOutcome {
    pub optimizer_report: Option<OptimizationReport>,
    pub archive_path: std::path::PathBuf,
}

pub struct Pipeline<'a> {
    pub optimize: bool,
    pub debug: bool,
    pub handler: &'a Handler,
}

impl<'a> Pipeline<'a> {
    fn trace(&self, phase: &str) {
        if self.debug {
            tracing::debug!(phase, "entering pipeline phase");
        }
    }

    /// Runs every phase for a single source file, writing the final
    /// archive into `out_dir` and returning its path.
    pub fn run(&self, source_path: &Path, out_dir: &OutputDir) -> Result<CompileOutcome> {
        let source = std::fs::read_to_string(source_path)?;
        let mut source_map = SourceMap::new();
        let file = source_map.add_file(source_path.display().to_string(), source.clone());

        self.trace("lex-parse");
        let program = match ilc_par::parse(&source, file, self.handler) {
            Some(program) => program,
            None => return Err(DriverError::HasDiagnostics(self.handler.error_count())),
        };

        self.trace("sem");
        let table = match ilc_sem::analyze(&program, self.handler) {
            Some(table) => table,
            None => return Err(DriverError::HasDiagnostics(self.handler.error_count())),
        };

        let (program, optimizer_report) = if self.optimize {
            self.trace("opt");
            let (program, report) = ilc_opt::optimize(program);
            (program, Some(report))
        } else {
            (program, None)
        };

        self.trace("codegen");
        let units = ilc_gen::generate(&program, &table)?;

        self.trace("write-units");
        for unit in units.records.iter().chain(std::iter::once(&units.main)) {
            let path = out_dir.path().join(format!("{}.j", unit.name));
            std::fs::write(&path, &unit.text)?;
        }

        self.trace("assemble");
        for unit in units.records.iter().chain(std::iter::once(&units.main)) {
            let path = out_dir.path().join(format!("{}.j", unit.name));
            assemble(out_dir.path(), &path)?;
        }

        self.trace("archive");
        let archive_path = archive(out_dir.path(), source_path)?;

        Ok(CompileOutcome { optimizer_report, archive_path })
    }
}

fn assemble(out_dir: &Path, unit_path: &Path) -> Result<()> {
    let assembler = config::assembler_path();
    if !assembler.exists() {
        return Err(DriverError::AssemblerMissing(assembler.display().to_string()));
    }
    let output = Command::new(&assembler)
        .arg("-d")
        .arg(out_dir)
        .arg(unit_path)
        .output()?;
    if !output.status.success() {
        return Err(DriverError::AssemblerFailed {
            file: unit_path.display().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

fn archive(out_dir: &Path, source_path: &Path) -> Result<std::path::PathBuf> {
    let archiver = config::archiver_path();
    if !archiver.exists() {
        return Err(DriverError::ArchiverMissing(archiver.display().to_string()));
    }

    let manifest = Manifest::new("Main");
    std::fs::write(out_dir.join("MANIFEST.json"), manifest.to_json()?)?;

    let basename = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let archive_path = out_dir.join(format!("{basename}.jar"));

    let output = Command::new(&archiver)
        .arg("-d")
        .arg(out_dir)
        .arg("-o")
        .arg(&archive_path)
        .output()?;
    if !output.status.success() {
        return Err(DriverError::ArchiverFailed(String::from_utf8_lossy(&output.stderr).into_owned()));
    }
    Ok(archive_path)
}
