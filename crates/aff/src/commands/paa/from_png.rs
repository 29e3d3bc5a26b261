use clap::{Args, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufWriter, path::PathBuf};
use tracing::info;

use aff_paa::{Paa, PaxKind};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TargetKind {
    /// Pick DXT5 for translucent images, DXT1 otherwise
    #[default]
    Auto,
    Dxt1,
    Dxt5,
}

#[derive(Args)]
pub struct FromPngArgs {
    /// An input PNG file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target PAA file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Target pixel format
    #[arg(short, long, value_enum, default_value_t = TargetKind::Auto)]
    kind: TargetKind,
}

impl FromPngArgs {
    pub fn handle(&self) -> Result<()> {
        let image = image::open(&self.file)
            .into_diagnostic()
            .context(format!("opening {}", self.file.display()))?
            .into_rgba8();

        let (width, height) = image.dimensions();
        let mut paa = Paa::from_rgba(width as u16, height as u16, image.into_raw())?;

        let kind = match self.kind {
            TargetKind::Auto => None,
            TargetKind::Dxt1 => Some(PaxKind::Dxt1),
            TargetKind::Dxt5 => Some(PaxKind::Dxt5),
        };

        info!("writing {}", self.output.display());
        let out = File::create(&self.output)
            .into_diagnostic()
            .context(format!("creating {}", self.output.display()))?;
        paa.write(&mut BufWriter::new(out), kind)?;

        Ok(())
    }
}
