use clap::{Parser, Subcommand};

mod api;
mod server;

#[derive(Parser, Debug)]
#[command(name = "pools", about = "Append-only numeric pools with percentile queries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Server {
        #[arg(long = "host")]
        host: Option<String>,

        #[arg(long = "port")]
        port: Option<u16>,
    },
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server { host, port } => {
            let config = server::ServerConfig::from_env()?.with_overrides(host, port);

            server::run(config).await
        }
    }
}
