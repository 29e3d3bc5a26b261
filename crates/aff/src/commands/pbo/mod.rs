pub mod extract;
pub mod info;
pub mod pack;

#[derive(clap::Subcommand)]
pub enum PboCommands {
    /// Show information about a PBO file
    Info(info::InfoArgs),
    /// Extract a PBO file into a directory
    Extract(extract::ExtractArgs),
    /// Pack a directory into a PBO file
    Pack(pack::PackArgs),
}

impl PboCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            PboCommands::Info(info) => info.handle(),
            PboCommands::Extract(extract) => extract.handle(),
            PboCommands::Pack(pack) => pack.handle(),
        }
    }
}
