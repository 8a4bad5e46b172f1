use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "modelhub", about = "Backend for the AI models hub front-end")]
pub struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8001)]
    pub port: u16,

    /// Database DSN; empty means a sqlite file next to the executable.
    #[arg(long, env = "MODELHUB_DSN", default_value = "")]
    pub dsn: String,

    /// Comma-separated allowed CORS origins, `*` for any.
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,
}
