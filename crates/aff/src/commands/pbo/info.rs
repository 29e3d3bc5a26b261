use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::PathBuf};

use aff_pbo::PboArchive;

#[derive(Args)]
pub struct InfoArgs {
    /// An input PBO file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Verify the SHA-1 trailer as well (reads the whole file)
    #[arg(long, default_value_t = false)]
    check_hash: bool,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut pbo = PboArchive::new(f)?;

        println!("{}", self.file.display());
        println!("* product entries:");
        for (key, value) in pbo.product_entries() {
            println!("\t* {key}: {value}");
        }

        println!("* {} entries:", pbo.len());
        for i in 0..pbo.len() {
            let entry = pbo.entry_by_index(i).expect("index in bounds");
            println!(
                "\t* {} ({} bytes{})",
                entry.filename,
                entry.data_size,
                if entry.is_packed() { ", packed" } else { "" }
            );
        }

        if self.check_hash {
            let ok = pbo.check_hash()?;
            println!("* hash: {}", if ok { "ok" } else { "MISMATCH" });
        }

        Ok(())
    }
}
