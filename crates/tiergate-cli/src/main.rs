use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "tiergate", version, about = "Tiergate: role-tiered content behind delegated tokens")]
struct Cli {
    /// Configuration file
    #[arg(
        long,
        global = true,
        env = "TIERGATE_CONFIG",
        default_value = "tiergate.yaml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the auth server (login, role and chat endpoints).
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Start the MCP resource gateway.
    Gateway {
        /// Serve JSON-RPC over stdin/stdout; the bearer is read from TIERGATE_BEARER
        #[arg(long, default_value_t = false)]
        stdio: bool,

        /// Override `gateway.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Signing key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Hash a password for the `users` section of the configuration.
    HashPassword {
        /// Password to hash; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate the access and delegated signing keys.
    Generate {
        /// Directory to write access.key and delegated.key into
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Logs go to stderr when stdout carries the stdio transport.
fn init_tracing(to_stderr: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if to_stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(matches!(cli.cmd, Command::Gateway { stdio: true, .. }));

    match cli.cmd {
        Command::Serve { port } => commands::serve::run(&cli.config, port).await?,
        Command::Gateway { stdio, port } => commands::gateway::run(&cli.config, stdio, port).await?,
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output)?,
        },
        Command::HashPassword { password } => commands::hash_password::run(password)?,
    }

    Ok(())
}
