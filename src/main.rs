//! Headless inspection of saved projects.
//!
//! ```text
//! annotate-ml <project.json> [labels|createml|turi] [--out-dir <dir>]
//! ```
//!
//! Without `--out-dir` the label index or manifest is printed. With it, the
//! project is exported there, copying photos from the `Photos/` folder next
//! to the project file.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::main()
}

// The inspector needs a filesystem and a terminal.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};
    use std::process::ExitCode;

    use clap::{Parser, ValueEnum};

    use annotate_ml::config::AppConfig;
    use annotate_ml::format::{ExportOptions, FormatError, FormatRegistry, PHOTOS_DIR, ProjectFile};
    use annotate_ml::labels::{index_labels, label_tally};

    #[derive(Parser, Debug)]
    #[command(
        name = "annotate-ml",
        version,
        about = "Inspect a saved annotation project or export it as a training manifest"
    )]
    struct Cli {
        /// Project file written by the editor.
        project: PathBuf,

        /// What to print or export.
        #[arg(value_enum, default_value_t = Output::Labels)]
        output: Output,

        /// Export into this directory instead of printing.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    }

    #[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
    enum Output {
        /// Label index with usage counts.
        Labels,
        /// Create ML JSON manifest.
        Createml,
        /// Turi Create CSV manifest.
        Turi,
    }

    impl Output {
        /// Registry id of the manifest format, `None` for the label index.
        fn format_id(self) -> Option<&'static str> {
            match self {
                Self::Labels => None,
                Self::Createml => Some("createml"),
                Self::Turi => Some("turi"),
            }
        }
    }

    fn print_labels(project_file: ProjectFile) {
        let mut project = project_file.into_project();
        project.labels = index_labels(&project.objects, &project.custom_labels);
        let tally = label_tally(&project.objects, &project.all_labels());

        for label in &project.labels {
            println!("{}\t{}", label, tally.get(label).copied().unwrap_or(0));
        }
        for label in &project.custom_labels {
            println!("{}\t{}\t(custom)", label, tally.get(label).copied().unwrap_or(0));
        }
    }

    fn run(registry: &FormatRegistry, cli: &Cli) -> Result<(), FormatError> {
        let project_file = ProjectFile::load(&cli.project)?;
        let Some(id) = cli.output.format_id() else {
            print_labels(project_file);
            return Ok(());
        };

        let format = registry.require(id)?;
        let project = project_file.into_project();
        match &cli.out_dir {
            None => println!("{}", format.render(&project)?),
            Some(dir) => {
                let photos = cli.project.parent().unwrap_or(Path::new(".")).join(PHOTOS_DIR);
                let options = ExportOptions::new().photos_source(photos);
                let result = format.export(&project, dir, &options)?;
                log::info!(
                    "Exported {} images and {} annotations as {}",
                    result.images_exported,
                    result.annotations_exported,
                    format.display_name()
                );
                for file in &result.files_created {
                    println!("{}", file.display());
                }
            }
        }
        Ok(())
    }

    pub fn main() -> ExitCode {
        let cli = Cli::parse();
        let config = AppConfig::load_from_default_path().unwrap_or_default();
        env_logger::Builder::new()
            .filter_level(config.preferences.log_level.into())
            .parse_default_env()
            .init();

        let registry = FormatRegistry::new();
        match run(&registry, &cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}: {}", cli.project.display(), e);
                ExitCode::FAILURE
            }
        }
    }

}
