use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_planner::airports::AirportDirectory;
use flight_planner::domain::{AirportCode, DateEvent, FlightRecord, TimeMode, TripType};
use flight_planner::links::{calendar_link, flight_deep_link};
use flight_planner::present::{FlightRow, TileView, flight_table};
use flight_planner::search::{Searcher, visible_flights};
use flight_planner::store::{FormState, JsonFileStore};
use flight_planner::timetable::{DEFAULT_BASE_URL, TimetableClient, TimetableConfig};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum View {
    Table,
    Tiles,
    Json,
}

/// Search for direct and one-stop flights between sets of airports.
///
/// Options left out are taken from the previous run's saved form.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Origin airport codes (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    origins: Vec<AirportCode>,

    /// Destination airport codes (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    destinations: Vec<AirportCode>,

    /// Exchange origins and destinations before searching
    #[arg(long)]
    swap: bool,

    /// First departure date (YYYY-MM-DD)
    #[arg(long)]
    depart_from: Option<NaiveDate>,

    /// Last departure date (YYYY-MM-DD)
    #[arg(long)]
    depart_to: Option<NaiveDate>,

    /// First return date (YYYY-MM-DD)
    #[arg(long)]
    return_from: Option<NaiveDate>,

    /// Last return date (YYYY-MM-DD)
    #[arg(long)]
    return_to: Option<NaiveDate>,

    /// Trip type: oneway or return
    #[arg(long)]
    trip_type: Option<TripType>,

    /// Minimum stopover in hours (0-12)
    #[arg(long)]
    layover_from: Option<u8>,

    /// Maximum stopover in hours (0-12)
    #[arg(long)]
    layover_to: Option<u8>,

    /// Time mode: LOCAL or UTC
    #[arg(long)]
    time_mode: Option<TimeMode>,

    /// Show only direct flights
    #[arg(long)]
    direct_only: bool,

    /// Result view
    #[arg(long, value_enum, default_value_t = View::Table)]
    view: View,

    /// Print booking and calendar links for each flight
    #[arg(long)]
    links: bool,

    /// List airports whose name or code matches, then exit
    #[arg(long, value_name = "QUERY")]
    find_airport: Option<String>,

    /// Where the search form is saved between runs
    #[arg(long, default_value = "flight_planner_state.json")]
    state_file: PathBuf,

    /// Timetable API base URL
    #[arg(long, env = "FLIGHT_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

impl Cli {
    /// Apply the options given on the command line on top of a saved form.
    fn apply_to(&self, mut form: FormState) -> FormState {
        if !self.origins.is_empty() {
            form.origins = self.origins.clone();
        }
        if !self.destinations.is_empty() {
            form.destinations = self.destinations.clone();
        }
        if self.swap {
            form.swap_airports();
        }

        let events = [
            self.trip_type.map(DateEvent::TripType),
            self.depart_from.map(|d| DateEvent::OutboundFrom(Some(d))),
            self.depart_to.map(|d| DateEvent::OutboundTo(Some(d))),
            self.return_from.map(|d| DateEvent::ReturnFrom(Some(d))),
            self.return_to.map(|d| DateEvent::ReturnTo(Some(d))),
        ];
        form.dates = events
            .into_iter()
            .flatten()
            .fold(form.dates, |dates, event| dates.apply(event));

        if let Some(hours) = self.layover_to {
            form.layover = form.layover.with_to(hours);
        }
        if let Some(hours) = self.layover_from {
            form.layover = form.layover.with_from(hours);
        }
        if let Some(mode) = self.time_mode {
            form.time_mode = mode;
        }

        form
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let client = TimetableClient::new(TimetableConfig::new().with_base_url(&cli.base_url))?;

    let directory = match client.fetch_airports().await {
        Ok(airports) => AirportDirectory::from_dtos(airports),
        Err(e) => {
            warn!(error = %e, "Failed to load airport list, showing codes only");
            AirportDirectory::default()
        }
    };
    info!(airports = directory.len(), "Loaded airport list");

    if let Some(query) = &cli.find_airport {
        for airport in directory.filter(query) {
            println!("{}  {}", airport.code, airport.name);
        }
        return Ok(());
    }

    let mut store = JsonFileStore::open(&cli.state_file)?;
    let form = cli.apply_to(FormState::load(&store));
    form.save(&mut store)?;
    store.save()?;

    let request = form.search_request();
    let searcher = Searcher::new(client);
    let results = searcher.search(&request).await?;

    let Some(results) = searcher.tracker().accept(results) else {
        return Ok(());
    };

    print_section(
        &request.outbound_title(),
        &visible_flights(&results.outbound, cli.direct_only),
        &directory,
        &cli,
    )?;

    if let (Some(title), Some(inbound)) = (request.return_title(), &results.inbound) {
        println!();
        print_section(
            &title,
            &visible_flights(inbound, cli.direct_only),
            &directory,
            &cli,
        )?;
    }

    Ok(())
}

fn print_section(
    title: &str,
    flights: &[FlightRecord],
    directory: &AirportDirectory,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== {} ===", title);

    if flights.is_empty() {
        println!("No flights found.");
        return Ok(());
    }

    match cli.view {
        View::Table => {
            let rows: Vec<FlightRow> = flights.iter().map(FlightRow::from_record).collect();
            flight_table(&rows).printstd();
        }
        View::Tiles => {
            for flight in flights {
                println!("{}", TileView::from_record(flight, directory));
                println!();
            }
        }
        View::Json => {
            let rows: Vec<FlightRow> = flights.iter().map(FlightRow::from_record).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    if cli.links {
        for (index, flight) in flights.iter().enumerate() {
            println!(
                "#{} {} -> {} {}",
                index + 1,
                flight.origin,
                flight.destination,
                FlightRow::from_record(flight).std
            );
            for (segment, link) in (0..2).filter_map(|i| flight_deep_link(flight, i).map(|l| (i, l))) {
                println!("  Flight {}: {}", segment + 1, link);
            }
            println!("  Calendar: {}", calendar_link(flight, directory)?);
        }
    }

    Ok(())
}
