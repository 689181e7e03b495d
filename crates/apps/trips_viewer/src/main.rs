use std::env;

use clap::{Parser, Subcommand};
use layers::symbology::EncodingTable;
use runtime::{FilterUpdate, MapEvent, SyncOutcome, TripsMap};
use streaming::request::TileEndpoint;
use style::description::StyleDescription;
use style::options::MapOptions;
use style::renderer::{HeadlessRenderer, Renderer};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_STYLE_URL: &str = "mapbox://styles/mapbox/light-v10";

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the trips map style from filter changes")]
struct Args {
    /// Base style URL handed to the renderer (env: TRIPS_STYLE_URL)
    #[arg(long)]
    style_url: Option<String>,

    /// Renderer access token (env: TRIPS_ACCESS_TOKEN)
    #[arg(long)]
    access_token: Option<String>,

    /// Tile endpoint, a path or an http(s) URL (env: TRIPS_TILE_ENDPOINT)
    #[arg(long)]
    tile_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the style right after the initial load
    Style,

    /// Apply filter changes in order and print the resulting style
    Apply {
        /// Filter change as name=value, e.g. from=2017-01-01, to=2017-01-02, hour=9
        #[arg(long = "filter", value_name = "NAME=VALUE")]
        filters: Vec<String>,

        /// Print only the final trips source URL
        #[arg(long)]
        url_only: bool,
    },

    /// Print extrusion height and color for trip counts
    Encode {
        /// Trip counts to evaluate
        #[arg(required = true)]
        trips: Vec<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let style_url = args.style_url.unwrap_or_else(|| {
        env::var("TRIPS_STYLE_URL").unwrap_or_else(|_| DEFAULT_STYLE_URL.to_string())
    });
    let access_token = args
        .access_token
        .or_else(|| env::var("TRIPS_ACCESS_TOKEN").ok());
    let endpoint = match args
        .tile_endpoint
        .or_else(|| env::var("TRIPS_TILE_ENDPOINT").ok())
    {
        Some(base) => TileEndpoint::new(base)?,
        None => TileEndpoint::default(),
    };

    let mut options = MapOptions::new(style_url);
    if let Some(token) = access_token {
        options = options.with_access_token(token);
    }

    match args.command {
        Command::Style => {
            let map = loaded_map(options, endpoint)?;
            print_style(&map.renderer().style())?;
        }
        Command::Apply { filters, url_only } => {
            let mut map = loaded_map(options, endpoint)?;
            for raw in &filters {
                let update = parse_filter_arg(raw)?;
                match map.change_filter(update) {
                    SyncOutcome::Applied { url } => info!("{raw}: source -> {url}"),
                    other => info!("{raw}: {other:?}"),
                }
            }
            for event in map.drain_events() {
                info!(seq = event.seq, kind = event.kind, "{}", event.message);
            }
            for command in map.renderer_mut().drain_commands() {
                info!(?command, "renderer");
            }
            info!(filters = ?map.filters(), "final filters");
            if url_only {
                println!("{}", map.source_url().unwrap_or_default());
            } else {
                print_style(&map.renderer().style())?;
            }
        }
        Command::Encode { trips } => {
            let table = EncodingTable::trips()?;
            for t in trips {
                let t = finite_trips(t)?;
                println!(
                    "{t}\t{:.2}\t{}\t{}",
                    table.height_at(t),
                    table.color_at(t).to_hex(),
                    table.opacity()
                );
            }
        }
    }

    Ok(())
}

fn loaded_map(
    options: MapOptions,
    endpoint: TileEndpoint,
) -> Result<TripsMap<HeadlessRenderer>, Box<dyn std::error::Error>> {
    let mut renderer = HeadlessRenderer::new(options, StyleDescription::new());
    renderer.finish_loading();
    let mut map = TripsMap::new(renderer, endpoint)?;
    map.handle_event(MapEvent::Load)?;
    info!(style_url = %map.renderer().options().style_url, "renderer ready");
    Ok(map)
}

fn parse_filter_arg(raw: &str) -> Result<FilterUpdate, Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("filter must look like name=value, got {raw:?}"))?;
    Ok(FilterUpdate::parse(name.trim(), value)?)
}

fn finite_trips(t: f64) -> Result<f64, String> {
    if t.is_finite() && t >= 0.0 {
        Ok(t)
    } else {
        Err(format!("trip count must be a finite, non-negative number, got {t}"))
    }
}

fn print_style(style: &StyleDescription) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(style)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Args, Command, finite_trips, parse_filter_arg};
    use clap::Parser;
    use runtime::FilterUpdate;

    #[test]
    fn parses_filter_args() {
        assert_eq!(parse_filter_arg("hour=7").expect("parse"), FilterUpdate::Hour(7));
        assert_eq!(parse_filter_arg("to=").expect("parse"), FilterUpdate::To(None));
        assert!(parse_filter_arg("hour").is_err());
        assert!(parse_filter_arg("hour=99").is_err());
    }

    #[test]
    fn encode_rejects_non_finite_counts() {
        assert_eq!(finite_trips(1204.0), Ok(1204.0));
        assert!(finite_trips(f64::NAN).is_err());
        assert!(finite_trips(f64::INFINITY).is_err());
        assert!(finite_trips(-1.0).is_err());

        let args = Args::try_parse_from(["trips_viewer", "encode", "NaN"]).expect("args");
        match args.command {
            Command::Encode { trips } => assert!(finite_trips(trips[0]).is_err()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_apply_command() {
        let args = Args::try_parse_from([
            "trips_viewer",
            "--tile-endpoint",
            "/tiles/rpc/public.get_trips.json",
            "apply",
            "--filter",
            "from=2017-01-01",
            "--filter",
            "to=2017-01-02",
            "--url-only",
        ])
        .expect("args");
        match args.command {
            Command::Apply { filters, url_only } => {
                assert_eq!(filters.len(), 2);
                assert!(url_only);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
