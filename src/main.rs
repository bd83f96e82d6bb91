use anyhow::{Context, Error};
use askama::Template;
use clap::{Parser, Subcommand};
use worth_it::{
    config::Config,
    init_tracing,
    sitemap::Sitemap,
    start_server,
    state::State,
    widget::{
        SearchBox,
        client::{HttpSuggestionClient, SuggestionClient},
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve,

    /// Print sitemap.xml to stdout
    Sitemap,

    /// Ask a running server for search suggestions
    Suggest {
        query: String,

        #[arg(long, default_value = "http://localhost:3000")]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => start_server(Config::load()?).await,
        Command::Sitemap => {
            let state = State::new(Config::load()?)?;
            let sitemap = Sitemap::build(&state.catalog, &state.config.site_url).await;

            println!("{}", sitemap.render().context("rendering sitemap")?);
            Ok(())
        }
        Command::Suggest { query, endpoint } => {
            let client = HttpSuggestionClient::new(&endpoint);

            for item in client.suggest(&query).await? {
                println!("{}", SearchBox::row_label(&item));
            }
            Ok(())
        }
    }
}
