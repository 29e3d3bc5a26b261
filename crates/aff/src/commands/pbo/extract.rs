use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{PathBuf, MAIN_SEPARATOR_STR},
};
use tracing::info;

use aff_pbo::PboArchive;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input PBO file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut pbo = PboArchive::new(f)?;
        pbo.read_all()?;

        for i in 0..pbo.len() {
            let entry = pbo.entry_by_index(i).expect("index in bounds");
            let name = entry.filename.replace('\\', MAIN_SEPARATOR_STR);
            let data = entry.data().expect("payloads loaded").to_vec();

            let p = self.directory.join(name);
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let mut out = if !self.overwrite {
                File::create_new(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            } else {
                File::create(&p)
                    .into_diagnostic()
                    .context(format!("creating {}", &p.display()))?
            };

            out.write_all(&data).into_diagnostic()?;
        }

        Ok(())
    }
}
