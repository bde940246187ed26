use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "photos-album-rs",
    about = "Collect every Google Photos item from a year into one album"
)]
pub struct Cli {
    /// Year for which to create the album
    #[arg(value_parser = clap::value_parser!(i32).range(1..=9999))]
    pub year: i32,

    /// Perform actual write operations (without it, album creation and
    /// item assignment are only simulated)
    #[arg(long)]
    pub no_dryrun: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Include archived media items
    #[arg(long)]
    pub include_archived: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress_bar: bool,

    /// OAuth client file downloaded from the Google Cloud console
    #[arg(long, env = "PHOTOS_CLIENT_SECRET", default_value = "client_secret.json")]
    pub client_secret: String,

    /// Where the access/refresh token is cached between runs
    #[arg(
        long,
        env = "PHOTOS_TOKEN_CACHE",
        default_value = "~/.photos-album-rs/token.json"
    )]
    pub token_cache: String,
}
