// FILE: src/cli/mod.rs

mod config;

use crate::error::Result;
use crate::{generate_with_options, GenerationStats, GeneratorOptions};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub use config::ConfigFile;

pub struct Cli {
    config: ConfigFile,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let matches = Self::build_cli().get_matches();

        let config_path = self.load_config(&matches)?;
        let options = self.build_generator_options(&matches);
        Self::setup_logging(matches.get_count("verbose"), options.verbose);

        // Logged here since env_logger is only installed after the config is read
        if let Some(config_path) = config_path {
            log::info!("Loaded configuration from {}", config_path);
        }

        let stats = generate_with_options(options)?;

        if matches.get_flag("stats") {
            print_stats(&stats)?;
        }

        Ok(())
    }

    /// Read `--config` if given, returning the path that was loaded
    pub fn load_config(&mut self, matches: &ArgMatches) -> Result<Option<String>> {
        let Some(config_path) = matches.get_one::<String>("config") else {
            return Ok(None);
        };
        self.config = config::load(config_path)?;
        Ok(Some(config_path.clone()))
    }

    pub fn build_cli() -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("properties")
                    .long("properties")
                    .value_name("FILE")
                    .help("Property catalog to process (default: CSSProperties.json)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("defines")
                    .long("defines")
                    .value_name("FLAGS")
                    .help("Space separated list of active conditional flags")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("gperf-executable")
                    .long("gperf-executable")
                    .value_name("PATH")
                    .help("gperf binary to run (default: $GPERF, then gperf)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("output-dir")
                    .short('o')
                    .long("output-dir")
                    .value_name("DIR")
                    .help("Directory for generated files (default: current directory)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("skip-gperf")
                    .long("skip-gperf")
                    .help("Write CSSPropertyNames.gperf without running gperf")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("stats")
                    .long("stats")
                    .help("Print run statistics as JSON")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
    }

    fn setup_logging(verbose_count: u8, verbose: bool) {
        let log_level = match verbose_count {
            0 if verbose => log::LevelFilter::Info,
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
    }

    /// Command line values win over the config file, which wins over defaults
    pub fn build_generator_options(&self, matches: &ArgMatches) -> GeneratorOptions {
        let mut options = GeneratorOptions::default();

        if let Some(path) = matches
            .get_one::<String>("properties")
            .or(self.config.properties.as_ref())
        {
            options.properties_path = PathBuf::from(path);
        }

        options.defines = matches
            .get_one::<String>("defines")
            .or(self.config.defines.as_ref())
            .cloned();

        options.gperf_executable = matches
            .get_one::<String>("gperf-executable")
            .or(self.config.gperf_executable.as_ref())
            .map(PathBuf::from);

        if let Some(dir) = matches
            .get_one::<String>("output-dir")
            .or(self.config.output_directory.as_ref())
        {
            options.output_directory = PathBuf::from(dir);
        }

        options.skip_gperf = matches.get_flag("skip-gperf") || self.config.skip_gperf.unwrap_or(false);
        options.verbose = matches.get_count("verbose") > 0 || self.config.verbose.unwrap_or(false);

        options
    }
}

fn print_stats(stats: &GenerationStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).map_err(|e| crate::GeneratorError::InvalidFormat {
        message: format!("Failed to serialize statistics: {}", e),
    })?;
    println!("{}", json);
    Ok(())
}
