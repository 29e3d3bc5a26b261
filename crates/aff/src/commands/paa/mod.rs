pub mod from_png;
pub mod info;
pub mod to_png;

#[derive(clap::Subcommand)]
pub enum PaaCommands {
    /// Show information about a PAA file
    Info(info::InfoArgs),
    /// Convert a PAA texture to a PNG image
    ToPng(to_png::ToPngArgs),
    /// Convert a PNG image to a PAA texture
    FromPng(from_png::FromPngArgs),
}

impl PaaCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            PaaCommands::Info(info) => info.handle(),
            PaaCommands::ToPng(to_png) => to_png.handle(),
            PaaCommands::FromPng(from_png) => from_png.handle(),
        }
    }
}
