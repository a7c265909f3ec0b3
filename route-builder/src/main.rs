use std::process::ExitCode;
use std::sync::Arc;

use chrono::DateTime;
use tracing_subscriber::EnvFilter;

use route_builder::availability::AvailabilityFilter;
use route_builder::domain::{InstantInterval, PointId, Timestamp};
use route_builder::network::NetworkFile;
use route_builder::planner::{
    DefaultHandler, PointTimeInterval, ResultPresentation, RouteBuilder, RouteBuilderConfig, RouteQuery,
    SortDirection, SortOrder,
};
use route_builder::store::InMemoryRepository;

const USAGE: &str = "usage: route-builder <network.json> <from> <to> [since RFC 3339] [transfers|duration|departure|arrival]";

/// Number of itineraries printed.
const RESULTS: i64 = 10;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let [file, from, to, rest @ ..] = args.as_slice() else {
        return Err(USAGE.to_string());
    };
    let since: Option<Timestamp> = rest
        .first()
        .map(|s| DateTime::parse_from_rfc3339(s).map(|t| t.to_utc()))
        .transpose()
        .map_err(|e| format!("invalid departure time: {e}"))?;
    let order: SortOrder = rest
        .get(1)
        .map(|s| s.parse::<SortOrder>())
        .transpose()
        .map_err(|e| format!("{e}"))?
        .unwrap_or_default();
    let from = PointId::new(from).map_err(|e| format!("{e}"))?;
    let to = PointId::new(to).map_err(|e| format!("{e}"))?;

    let (points, runs) = NetworkFile::from_path(file)
        .and_then(NetworkFile::into_parts)
        .map_err(|e| format!("{file}: {e}"))?;
    println!("Loaded {} points and {} runs", points.len(), runs.len());

    let mut builder = RouteBuilder::new(Arc::new(InMemoryRepository::new()), RouteBuilderConfig::default())
        .map_err(|e| format!("{e}"))?;
    if let Some(since) = since {
        builder = builder.with_clock(move || since);
    }
    builder.add_points(points);
    builder.add_runs(runs);

    let config = builder.config();
    let query = RouteQuery::new(
        PointTimeInterval::new(from, InstantInterval::unbounded()),
        PointTimeInterval::new(to, InstantInterval::unbounded()),
        AvailabilityFilter::unrestricted(config.max_transfers),
    )
    .with_presentation(ResultPresentation::new(order, SortDirection::Asc, RESULTS));

    let response = builder
        .find_routes(&query, &DefaultHandler)
        .map_err(|e| format!("{e}"))?;
    if response.offers.is_empty() {
        println!("No itineraries found");
    }
    for (i, path) in response.offers.iter().enumerate() {
        println!("{}. {path}", i + 1);
    }
    Ok(())
}
