use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand};
use kundali::chart::{HouseBasis, Layout};
use kundali::cities::Gazetteer;
use kundali::config::Config;
use kundali::form::{self, BirthDetails};
use kundali::render::{self, Format, RenderOptions};
use kundali::{parse_utc_offset, BirthInfo, ChartSettings, Location, Reference, Zodiac};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kundali", version, about = "Vedic birth chart generator")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "KUNDALI_CONFIG")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate a chart and render it
    Chart(ChartArgs),
    /// List the known countries and cities
    Cities,
    /// Ask for the birth details on the terminal, then render the chart
    Interactive(OutputArgs),
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    #[arg(long, value_enum)]
    format: Option<Format>,

    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// How signs are assigned to houses
    #[arg(long, value_enum)]
    houses: Option<HouseBasis>,

    #[arg(long, value_enum)]
    zodiac: Option<Zodiac>,

    /// Coordinate reduced to a sign
    #[arg(long, value_enum)]
    reference: Option<Reference>,

    /// Include the mean lunar nodes (Rahu and Ketu)
    #[arg(long)]
    nodes: bool,

    /// Use the geocentric Moon instead of the observer's
    #[arg(long)]
    no_topocentric: bool,

    /// Offset of the entered wall-clock time from UTC, e.g. +05:30
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<String>,

    /// Drawing size in pixels
    #[arg(long)]
    size: Option<u32>,

    /// Chart title (SVG only)
    #[arg(long)]
    title: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Birth moment as `YYYY-MM-DD HH:MM[:SS]`
    #[arg(long, conflicts_with_all = ["year", "month", "day", "hour", "minute"])]
    datetime: Option<String>,

    #[arg(long)]
    year: Option<i32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    day: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    hour: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=59))]
    minute: Option<u32>,

    #[arg(long, conflicts_with = "lat")]
    country: Option<String>,

    #[arg(long, conflicts_with = "lat")]
    city: Option<String>,

    /// Latitude in degrees, north positive
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in degrees, east positive
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Ask on the terminal for anything not given on the command line
    #[arg(long)]
    interactive: bool,

    #[command(flatten)]
    output: OutputArgs,
}

const DEFAULT_DETAILS: (i32, u32, u32, u32, u32) = (2024, 7, 14, 12, 0);

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .with_context(|| format!("cannot parse date/time '{value}', expected YYYY-MM-DD HH:MM"))
}

fn settings_for(args: &OutputArgs, config: &Config) -> ChartSettings {
    let base = config.settings();
    ChartSettings {
        zodiac: args.zodiac.unwrap_or(base.zodiac),
        reference: args.reference.unwrap_or(base.reference),
        include_nodes: args.nodes || base.include_nodes,
        topocentric: !args.no_topocentric && base.topocentric,
    }
}

fn render_options_for(args: &OutputArgs, config: &Config) -> RenderOptions {
    RenderOptions {
        layout: args.layout.unwrap_or(config.layout),
        basis: args.houses.unwrap_or(config.houses),
        size: args.size.unwrap_or(config.size),
        title: args.title.clone(),
    }
}

fn offset_for(args: &OutputArgs, config: &Config) -> Result<chrono::FixedOffset> {
    let offset = args
        .utc_offset
        .as_deref()
        .or(config.utc_offset.as_deref())
        .unwrap_or("+00:00");
    Ok(parse_utc_offset(offset)?)
}

fn ask(gazetteer: &Gazetteer) -> Result<BirthDetails> {
    // Prompts go to stderr so the rendered chart can be piped from stdout.
    Ok(form::run(gazetteer)?)
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn resolve_location(
    args: &ChartArgs,
    config: &Config,
    gazetteer: &Gazetteer,
    asked: Option<&BirthDetails>,
) -> Result<Location> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        return Ok(Location::new(lat, lon)?);
    }

    let country = args
        .country
        .clone()
        .or_else(|| asked.map(|d| d.country.clone()))
        .or_else(|| config.country.clone())
        .or_else(|| gazetteer.countries().first().map(|c| c.to_string()))
        .context("no countries are configured")?;
    // A remembered city only applies to the country it was chosen with.
    let city = match args
        .city
        .clone()
        .or_else(|| {
            asked
                .filter(|d| same_name(&d.country, &country))
                .map(|d| d.city.clone())
        })
        .or_else(|| {
            config.city.clone().filter(|_| {
                config
                    .country
                    .as_deref()
                    .is_some_and(|c| same_name(c, &country))
            })
        }) {
        Some(city) => city,
        None => gazetteer
            .cities(&country)?
            .first()
            .map(|c| c.to_string())
            .with_context(|| format!("no cities configured for {country}"))?,
    };
    info!(%country, %city, "resolved location");
    Ok(gazetteer.lookup(&country, &city)?)
}

fn resolve_birth(args: &ChartArgs, config: &Config, gazetteer: &Gazetteer) -> Result<BirthInfo> {
    let offset = offset_for(&args.output, config)?;

    let fields_missing = args.datetime.is_none()
        && (args.year.is_none()
            || args.month.is_none()
            || args.day.is_none()
            || args.hour.is_none()
            || args.minute.is_none());
    let place_missing = args.lat.is_none() && (args.country.is_none() || args.city.is_none());
    let asked = if args.interactive && (fields_missing || place_missing) {
        Some(ask(gazetteer)?)
    } else {
        None
    };

    let (year, month, day, hour, minute) = match &args.datetime {
        Some(value) => {
            let naive = parse_datetime(value)?;
            (
                naive.year(),
                naive.month(),
                naive.day(),
                naive.hour(),
                naive.minute(),
            )
        }
        None => {
            let (y, mo, d, h, mi) = asked
                .as_ref()
                .map(|a| (a.year, a.month, a.day, a.hour, a.minute))
                .unwrap_or(DEFAULT_DETAILS);
            (
                args.year.unwrap_or(y),
                args.month.unwrap_or(mo),
                args.day.unwrap_or(d),
                args.hour.unwrap_or(h),
                args.minute.unwrap_or(mi),
            )
        }
    };
    if !(1900..=2100).contains(&year) {
        warn!(year, "ephemeris accuracy degrades outside 1900-2100");
    }

    let location = resolve_location(args, config, gazetteer, asked.as_ref())?;
    Ok(BirthInfo::from_local(
        year, month, day, hour, minute, offset, location,
    )?)
}

fn emit(text: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn draw(birth: &BirthInfo, args: &OutputArgs, config: &Config) -> Result<()> {
    let settings = settings_for(args, config);
    let chart = birth.generate_chart(settings)?;
    let format = args.format.unwrap_or(config.format);
    let text = render::render(&chart, format, &render_options_for(args, config))?;
    emit(&text, args.output.as_ref())
}

fn list_cities(gazetteer: &Gazetteer) -> Result<()> {
    let mut out = String::new();
    for country in gazetteer.countries() {
        out.push_str(country);
        out.push('\n');
        for city in gazetteer.cities(country)? {
            let location = gazetteer.lookup(country, city)?;
            out.push_str(&format!(
                "  {:<14} {:>9.4} {:>10.4}\n",
                city, location.latitude, location.longitude
            ));
        }
    }
    emit(&out, None)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let gazetteer = config.gazetteer()?;

    match cli.command {
        Some(Commands::Chart(args)) => {
            let birth = resolve_birth(&args, &config, &gazetteer)?;
            draw(&birth, &args.output, &config)
        }
        Some(Commands::Cities) => list_cities(&gazetteer),
        Some(Commands::Interactive(output)) => {
            let details = ask(&gazetteer)?;
            let birth = details.to_birth_info(&gazetteer, offset_for(&output, &config)?)?;
            draw(&birth, &output, &config)
        }
        None => {
            let output = OutputArgs::default();
            let details = ask(&gazetteer)?;
            let birth = details.to_birth_info(&gazetteer, offset_for(&output, &config)?)?;
            draw(&birth, &output, &config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use clap::CommandFactory;

    fn chart_args(argv: &[&str]) -> ChartArgs {
        let mut full = vec!["kundali", "chart"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Some(Commands::Chart(args)) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn datetime_accepts_space_or_t() {
        let a = parse_datetime("2024-07-14 12:30").unwrap();
        let b = parse_datetime("2024-07-14T12:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("14/07/2024").is_err());
    }

    #[test]
    fn chart_fields_fill_from_defaults() {
        let args = chart_args(&["--year", "1991", "--country", "India", "--city", "Chennai"]);
        let birth = resolve_birth(&args, &Config::default(), &Gazetteer::builtin()).unwrap();
        assert_eq!(
            birth.date_time,
            Utc.with_ymd_and_hms(1991, 7, 14, 12, 0, 0).unwrap()
        );
        assert_eq!(birth.location.longitude, 80.2707);
    }

    #[test]
    fn offset_and_coordinates_from_flags() {
        let args = chart_args(&[
            "--datetime",
            "2024-07-14 12:00",
            "--utc-offset",
            "-04:00",
            "--lat",
            "40.7",
            "--lon",
            "-74.0",
        ]);
        let birth = resolve_birth(&args, &Config::default(), &Gazetteer::builtin()).unwrap();
        assert_eq!(
            birth.date_time,
            Utc.with_ymd_and_hms(2024, 7, 14, 16, 0, 0).unwrap()
        );
        assert_eq!(birth.location.longitude, -74.0);
    }

    #[test]
    fn config_supplies_place_and_flags_override_settings() {
        let config = Config {
            country: Some("India".into()),
            city: Some("Mumbai".into()),
            zodiac: Zodiac::Sidereal,
            ..Config::default()
        };
        let args = chart_args(&["--reference", "ecliptic", "--no-topocentric"]);
        let birth = resolve_birth(&args, &config, &Gazetteer::builtin()).unwrap();
        assert_eq!(birth.location.latitude, 19.0760);

        let settings = settings_for(&args.output, &config);
        assert_eq!(settings.zodiac, Zodiac::Sidereal);
        assert_eq!(settings.reference, Reference::Ecliptic);
        assert!(!settings.topocentric);
    }

    #[test]
    fn configured_city_stays_with_its_country() {
        let config = Config {
            country: Some("USA".into()),
            city: Some("Chicago".into()),
            ..Config::default()
        };
        let gazetteer = Gazetteer::builtin();

        let args = chart_args(&["--country", "India"]);
        let birth = resolve_birth(&args, &config, &gazetteer).unwrap();
        assert_eq!(birth.location, gazetteer.lookup("India", "Delhi").unwrap());

        let args = chart_args(&["--country", "usa"]);
        let birth = resolve_birth(&args, &config, &gazetteer).unwrap();
        assert_eq!(birth.location, gazetteer.lookup("USA", "Chicago").unwrap());
    }

    #[test]
    fn default_reference_is_right_ascension() {
        let args = chart_args(&[]);
        let settings = settings_for(&args.output, &Config::default());
        assert_eq!(settings.reference, Reference::RightAscension);
    }

    #[test]
    fn datetime_conflicts_with_fields() {
        let result = Cli::try_parse_from([
            "kundali",
            "chart",
            "--datetime",
            "2024-07-14 12:00",
            "--year",
            "2020",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn month_range_is_enforced() {
        assert!(Cli::try_parse_from(["kundali", "chart", "--month", "13"]).is_err());
    }
}
