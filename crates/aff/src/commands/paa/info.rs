use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};

use aff_paa::Paa;

#[derive(Args)]
pub struct InfoArgs {
    /// An input PAA file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let paa = Paa::read(&mut BufReader::new(f))?;

        println!("{}", self.file.display());
        println!("* format: {:?}", paa.kind);
        if let Some(level0) = paa.mipmaps.first() {
            println!("* dimensions: {}x{}", level0.width, level0.height);
        }
        println!("* mipmap levels: {}", paa.mipmaps.len());
        println!(
            "* transparency: {}",
            if paa.has_transparency { "yes" } else { "no" }
        );
        println!("* taggs:");
        for tagg in &paa.taggs {
            println!(
                "\t* {} ({} bytes)",
                String::from_utf8_lossy(&tagg.signature),
                tagg.data.len()
            );
        }

        Ok(())
    }
}
