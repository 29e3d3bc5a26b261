use clap::Args;
use image::RgbaImage;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::PathBuf};
use tracing::info;

use aff_paa::{Paa, PaxKind};

#[derive(Args)]
pub struct ToPngArgs {
    /// An input PAA file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target PNG file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Mipmap level to export
    #[arg(short, long, default_value_t = 0)]
    level: usize,
}

impl ToPngArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let paa = Paa::read(&mut BufReader::new(f))?;

        if !matches!(paa.kind, PaxKind::Dxt1 | PaxKind::Dxt5) {
            return Err(miette!("only DXT1/DXT5 textures can be exported"));
        }

        let mipmap = paa
            .mipmaps
            .get(self.level)
            .ok_or(miette!(
                "level {} exceeds the mipmap count of {}",
                self.level,
                paa.mipmaps.len()
            ))?;

        let image = RgbaImage::from_raw(
            mipmap.width as u32,
            mipmap.height as u32,
            mipmap.data.clone(),
        )
        .ok_or(miette!("decoded mipmap does not match its dimensions"))?;

        info!("writing {}", self.output.display());
        image
            .save(&self.output)
            .into_diagnostic()
            .context(format!("saving {}", self.output.display()))?;

        Ok(())
    }
}
