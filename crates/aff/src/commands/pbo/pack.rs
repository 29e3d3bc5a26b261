use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::info;
use walkdir::WalkDir;

use aff_pbo::{PboFileOptions, PboWriter};

#[derive(Args)]
pub struct PackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target PBO file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Value of the archive's prefix product entry
    #[arg(short, long)]
    prefix: Option<String>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl PackArgs {
    pub fn handle(&self) -> Result<()> {
        info!("creating {}", self.file.display());

        let files = WalkDir::new(&self.directory)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .collect::<Vec<_>>();

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }

        let out = if !self.overwrite {
            File::create_new(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", self.file.display()))?
        } else {
            File::create(&self.file)
                .into_diagnostic()
                .context(format!("creating {}", self.file.display()))?
        };

        let mut pbo = PboWriter::new(out);
        if let Some(prefix) = &self.prefix {
            pbo.add_product_entry("prefix", prefix);
        }

        for file in files {
            let name = file
                .path()
                .strip_prefix(&self.directory)
                .into_diagnostic()?;
            info!("packing {}", name.display());

            let timestamp = file
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as u32)
                .unwrap_or_else(|| {
                    SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_secs() as u32)
                        .unwrap_or(0)
                });

            let data = std::fs::read(file.path())
                .into_diagnostic()
                .context(format!("reading {}", file.path().display()))?;

            pbo.add_file(
                name.to_str()
                    .ok_or(miette!("unable to convert {} to a string", name.display()))?,
                data,
                PboFileOptions::builder().timestamp(timestamp).build(),
            )?;
        }

        pbo.finish().context("finalizing pbo file")?;

        Ok(())
    }
}
