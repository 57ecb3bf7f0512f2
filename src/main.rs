use std::path::PathBuf;

use clap::{Parser, Subcommand};
use talent_scout::commands::{self, browse, categories, serve, suggest};

#[derive(Parser, Debug)]
#[command(
	name = "talent-scout",
	about = "Candidate search filters backed by a LinkedIn lookup provider",
	long_about = "talent-scout runs a small proxy in front of a RapidAPI LinkedIn filter \
                  provider and a terminal panel that turns typed queries into include and \
                  exclude filters for job title, company, location, experience and education.",
	version
)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the filter proxy until Ctrl+C.
	///
	/// Requires RAPIDAPI_KEY and RAPIDAPI_HOST in the environment.
	Serve {
		/// JSON configuration file (defaults to ./talent-scout.json when present).
		#[arg(long)]
		config: Option<PathBuf>,
	},
	/// Build a search interactively and print the final filters.
	Browse {
		/// JSON configuration file (defaults to ./talent-scout.json when present).
		#[arg(long)]
		config: Option<PathBuf>,
		/// Write logs to this file; without it the panel logs nothing.
		#[arg(long)]
		log_file: Option<PathBuf>,
		/// Colour theme for the panel.
		#[arg(long, default_value = "slate")]
		theme: String,
		/// Print the selection as JSON.
		#[arg(long)]
		json: bool,
	},
	/// Look up suggestions for one query and print them.
	Suggest {
		/// Category key or route slug, e.g. `company` or `job-title`.
		category: String,
		/// Text to search for.
		query: String,
		/// JSON configuration file (defaults to ./talent-scout.json when present).
		#[arg(long)]
		config: Option<PathBuf>,
		/// Print suggestions as JSON.
		#[arg(long)]
		json: bool,
	},
	/// List the filter categories and their routes.
	Categories,
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	match cli.command {
		Command::Serve { config } => {
			commands::init_stderr_logging()?;
			serve::run(config.as_deref())
		}
		Command::Browse {
			config,
			log_file,
			theme,
			json,
		} => {
			if let Some(path) = &log_file {
				commands::init_file_logging(path)?;
			}
			browse::run(config.as_deref(), &theme, json)
		}
		Command::Suggest {
			category,
			query,
			config,
			json,
		} => {
			commands::init_stderr_logging()?;
			suggest::run(&category, &query, config.as_deref(), json)
		}
		Command::Categories => {
			categories::run();
			Ok(())
		}
	}
}
