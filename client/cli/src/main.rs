mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use geoframe_document::GeoPoint;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geoframe")]
#[command(about = "Project design nodes onto the map and move their footprints between files, the design tool and the web")]
struct Args {
	/// Preferences file in RON format
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Geographic anchor for pixel rectangles, as `lon,lat`
	#[arg(long, global = true, value_parser = parse_center, allow_hyphen_values = true)]
	center: Option<GeoPoint>,

	/// More output per occurrence
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Build the polygon for an exported selection (CSV or JSON) and print its ring
	Polygon {
		input: PathBuf,
		/// Move the selection to the first place matching this search before building
		#[arg(long)]
		search: Option<String>,
	},
	/// Write the nodes of an exported selection as CSV with their footprints
	ExportCsv {
		input: PathBuf,
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Write an exported selection as a `{parentNode, svgString}` JSON envelope with its polygon attached
	ExportJson {
		input: PathBuf,
		#[arg(short, long)]
		output: Option<PathBuf>,
		/// SVG snapshot to embed
		#[arg(long)]
		svg: Option<PathBuf>,
	},
	/// Look up a place and print its coordinates
	Search { query: String },
	/// Download node documents from the design-file API
	FetchNodes {
		#[arg(long)]
		file_key: String,
		/// Comma separated node ids
		#[arg(long, value_delimiter = ',', required = true)]
		ids: Vec<String>,
		/// Polygon WKT to store on every fetched document
		#[arg(long)]
		polygon: Option<String>,
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Print the `create-nodes` message that writes an exported selection back onto the canvas
	CreateNodes {
		input: PathBuf,
		#[arg(long)]
		svg: Option<PathBuf>,
	},
}

fn parse_center(text: &str) -> Result<GeoPoint, String> {
	let (lon, lat) = text.split_once(',').ok_or_else(|| format!("expected `lon,lat`, got `{text}`"))?;
	let coordinate = |value: &str| value.trim().parse::<f64>().map_err(|err| format!("`{value}`: {err}"));
	Ok(GeoPoint::new(coordinate(lon)?, coordinate(lat)?))
}

fn init_logging(verbose: u8) -> Result<()> {
	let colors = ColoredLevelConfig::new().debug(Color::Magenta).info(Color::Green).error(Color::Red);
	let level = match verbose {
		0 => log::LevelFilter::Warn,
		1 => log::LevelFilter::Info,
		2 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};

	// Standard output carries command results, so logs go to standard error
	fern::Dispatch::new()
		.chain(std::io::stderr())
		.level(level)
		.format(move |out, message, record| {
			out.finish(format_args!(
				"[{}]{} {}",
				// This will color the log level only, not the whole line. Just a touch.
				colors.color(record.level()),
				chrono::Utc::now().format("[%Y-%m-%d %H:%M:%S]"),
				message
			))
		})
		.apply()?;
	Ok(())
}

fn main() -> Result<()> {
	let args = Args::parse();
	init_logging(args.verbose)?;

	let context = commands::Context::load(args.config.as_deref(), args.center)?;
	let output = match args.command {
		Command::Polygon { input, search } => commands::polygon(&context, &input, search.as_deref())?,
		Command::ExportCsv { input, output } => commands::export_csv(&context, &input, output.as_deref())?,
		Command::ExportJson { input, output, svg } => commands::export_json(&context, &input, output.as_deref(), svg.as_deref())?,
		Command::Search { query } => commands::search(&context, &query)?,
		Command::FetchNodes { file_key, ids, polygon, output } => commands::fetch_nodes(&context, &file_key, &ids, polygon.as_deref(), output.as_deref())?,
		Command::CreateNodes { input, svg } => commands::create_nodes(&context, &input, svg.as_deref())?,
	};

	if let Some(output) = output {
		println!("{output}");
	}
	Ok(())
}
