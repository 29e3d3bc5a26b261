pub mod paa;
pub mod pbo;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle PBO archives
    Pbo {
        #[command(subcommand)]
        command: pbo::PboCommands,
    },
    /// Handle PAA textures
    Paa {
        #[command(subcommand)]
        command: paa::PaaCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Pbo { command } => command.handle(),
            Commands::Paa { command } => command.handle(),
        }
    }
}
