use {
    crate::{
        config::{OutputFormat, Settings},
        db::{self, MongoStore, benchmark_filter},
        errors::Result,
        handlers::ViewerState,
        render::{decode_benchmarks, render_json, render_table},
        server,
    },
    clap::{Arg, ArgMatches, Command, value_parser},
    std::net::IpAddr,
};

pub const PING_MESSAGE: &str = "Pinged your deployment. You successfully connected to MongoDB!";

pub fn cli() -> Command {
    Command::new("taipan-viewer")
        .about("View CPU benchmark results stored in MongoDB")
        .arg(
            Arg::new("uri")
                .long("uri")
                .help("Connection string (defaults to MONGODB_URI)")
                .value_name("URI"),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .help("Database holding the results")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("collection")
                .long("collection")
                .help("Collection holding the results")
                .value_name("NAME"),
        )
        .subcommand(
            Command::new("show")
                .about("Ping the deployment and print every benchmark (default)")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: json or table")
                        .value_name("FORMAT"),
                )
                .arg(
                    Arg::new("cpu-model")
                        .long("cpu-model")
                        .help("Only show results for this exact CPU model")
                        .value_name("MODEL"),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the benchmarks as JSON over HTTP")
                .arg(
                    Arg::new("address")
                        .long("address")
                        .help("Address to bind (defaults to Rocket's configuration)")
                        .value_name("ADDR")
                        .value_parser(value_parser!(IpAddr)),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .short('p')
                        .help("Port to bind (defaults to Rocket's configuration)")
                        .value_name("PORT")
                        .value_parser(value_parser!(u16)),
                ),
        )
}

pub async fn handle_cli(matches: ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("serve", sub_matches)) => {
            let settings = Settings::from_matches(&matches, None)?;
            let figment = server::figment(
                sub_matches.get_one::<IpAddr>("address").copied(),
                sub_matches.get_one::<u16>("port").copied(),
            );

            let client = db::connect(&settings.uri).await?;
            let state = ViewerState::new(client, &settings.database, &settings.collection);
            server::serve(figment, state).await
        }
        // clap only lets `show` through here
        show_matches => {
            let settings = Settings::from_matches(&matches, show_matches.map(|(_, m)| m))?;
            show(&settings).await
        }
    }
}

/// Connect, ping, load the whole collection, print it. The documents are only
/// printed once the client has been closed.
pub async fn show(settings: &Settings) -> Result<()> {
    let client = db::connect(&settings.uri).await?;
    let store = MongoStore::new(client, &settings.database, &settings.collection);
    let filter = benchmark_filter(settings.cpu_model.as_deref());

    let documents = db::fetch_scoped(store, filter, || println!("{}", PING_MESSAGE)).await?;

    log::info!(
        "fetched {} documents from {}.{} at {}",
        documents.len(),
        settings.database,
        settings.collection,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    match settings.format {
        OutputFormat::Json => println!("{}", render_json(&documents)?),
        OutputFormat::Table => print!("{}", render_table(&decode_benchmarks(&documents))),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ViewerError;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn serve_parses_socket() {
        let matches = cli()
            .try_get_matches_from(["taipan-viewer", "serve", "--address", "127.0.0.1", "-p", "8080"])
            .unwrap();
        let serve = matches.subcommand_matches("serve").unwrap();

        assert_eq!(serve.get_one::<u16>("port"), Some(&8080));
        assert_eq!(
            serve.get_one::<IpAddr>("address").map(ToString::to_string),
            Some("127.0.0.1".to_string())
        );
    }

    #[test]
    fn serve_rejects_bad_port() {
        assert!(
            cli()
                .try_get_matches_from(["taipan-viewer", "serve", "--port", "70000"])
                .is_err()
        );
    }

    #[tokio::test]
    async fn unknown_format_fails_before_connecting() {
        let matches = cli()
            .try_get_matches_from([
                "taipan-viewer",
                "--uri",
                "mongodb://127.0.0.1:1",
                "show",
                "--format",
                "xml",
            ])
            .unwrap();

        assert!(matches!(
            handle_cli(matches).await,
            Err(ViewerError::UnknownFormat(f)) if f == "xml"
        ));
    }

    #[tokio::test]
    async fn no_subcommand_runs_show() {
        let matches = cli()
            .try_get_matches_from([
                "taipan-viewer",
                "--uri",
                "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200",
            ])
            .unwrap();

        assert!(matches.subcommand().is_none());
        assert!(matches!(
            handle_cli(matches).await,
            Err(ViewerError::Database(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_deployment_is_a_database_error() {
        let settings = Settings {
            uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200".to_string(),
            database: "taipan_benchmarks".to_string(),
            collection: "cpu_benchmarks".to_string(),
            cpu_model: None,
            format: OutputFormat::Json,
        };

        assert!(matches!(show(&settings).await, Err(ViewerError::Database(_))));
    }

    #[tokio::test]
    async fn malformed_uri_is_a_database_error() {
        let settings = Settings {
            uri: "postgres://localhost".to_string(),
            database: "taipan_benchmarks".to_string(),
            collection: "cpu_benchmarks".to_string(),
            cpu_model: None,
            format: OutputFormat::Table,
        };

        assert!(matches!(show(&settings).await, Err(ViewerError::Database(_))));
    }
}
