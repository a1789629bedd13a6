use anyhow::bail;
use clap::Parser;
use giftflake::GiftId;

/// Runtime configuration for the `giftflake-server` binary.
///
/// All values are parsed from CLI arguments or environment variables. The
/// workshop ID is the only contract-critical option: it must be unique per
/// running instance across the fleet, and invalid values abort startup
/// before the listener binds.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "giftflake-server",
    version,
    about = "An HTTP service for workshop-unique gift identifiers"
)]
pub struct CliArgs {
    /// Workshop instance identifier baked into every generated ID.
    ///
    /// Must fit the 10-bit field (0..=1023) and be unique across all
    /// running instances; no coordination happens at runtime.
    ///
    /// Environment variable: `WORKSHOP_ID`
    #[arg(long, env = "WORKSHOP_ID", default_value_t = 1)]
    pub workshop_id: u16,

    /// TCP port to listen on.
    ///
    /// Environment variable: `PORT`
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Bind address.
    ///
    /// Environment variable: `HOST`
    #[arg(long, env = "HOST", default_value_t = String::from("0.0.0.0"))]
    pub host: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub workshop_id: u16,
    pub port: u16,
    pub host: String,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let max_workshop_id = GiftId::max_workshop_id() as u16;

        if args.workshop_id > max_workshop_id {
            bail!(
                "WORKSHOP_ID ({}) exceeds the available workshop ID space (max = {})",
                args.workshop_id,
                max_workshop_id
            );
        }

        Ok(Self {
            workshop_id: args.workshop_id,
            port: args.port,
            host: args.host,
        })
    }
}
