//! CSS Property Catalog Processor
//!
//! Reads the declarative `CSSProperties.json` catalog, validates every entity
//! against its schema, links cross references and derives the orders and
//! groupings the engine's generated sources are built from.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use csspropgen::{generate_with_options, GeneratorOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let stats = generate_with_options(GeneratorOptions::default())?;
//!     println!("{} properties", stats.property_count);
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! 1. **Parse**: each JSON node is shape checked and turned into a typed entity,
//!    dropping values and properties whose `enable-if` is not satisfied
//! 2. **Fixup**: longhands, related properties and logical property groups are
//!    linked by name and checked for consistency
//! 3. **Finalize**: sorted and filtered views are computed once
//! 4. **Generate**: `CSSPropertyNames.gperf` is written and handed to gperf

pub mod catalog;
pub mod cli;
pub mod codegen;
pub mod context;
pub mod error;
pub mod fixup;
pub mod model;
pub mod resolution;
pub mod schema;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub use catalog::{
    compare_by_descending_priority_and_name, compare_with_prefixed_properties_last,
    LogicalPropertyGroupEntry, Properties,
};
pub use codegen::GenerationContext;
pub use context::ParsingContext;
pub use error::{GeneratorError, Result};
pub use model::{
    convert_name_to_id, CodeGenAttributes, Kind, Logic, LogicalPropertyGroup, Property,
    PropertyIndex, PropertyRef, Specification, Status, Value,
};
pub use resolution::{DirectionMapping, DirectionMappingTable};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

pub const DEFAULT_PROPERTIES_FILE: &str = "CSSProperties.json";

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Path to the property catalog
    pub properties_path: PathBuf,

    /// Space separated list of active conditional flags
    pub defines: Option<String>,

    /// gperf binary to run instead of `$GPERF` or `gperf`
    pub gperf_executable: Option<PathBuf>,

    /// Directory generated files are written to
    pub output_directory: PathBuf,

    /// Log skipped properties and generation steps
    pub verbose: bool,

    /// Stop after writing `CSSPropertyNames.gperf`
    pub skip_gperf: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            properties_path: PathBuf::from(DEFAULT_PROPERTIES_FILE),
            defines: None,
            gperf_executable: None,
            output_directory: PathBuf::from("."),
            verbose: false,
            skip_gperf: false,
        }
    }
}

/// Statistics for a finished run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Properties active for code generation
    pub property_count: usize,

    /// Aliases across all active properties
    pub alias_count: usize,

    pub shorthand_count: usize,

    pub logical_property_group_count: usize,

    /// Distinct settings flags
    pub settings_flag_count: usize,

    /// Size of `CSSPropertyNames.gperf` in bytes
    pub gperf_size: u64,

    /// Whether gperf was run
    pub ran_gperf: bool,

    pub generate_time_ms: u64,
}

impl GenerationStats {
    pub fn for_catalog(catalog: &Properties) -> Self {
        Self {
            property_count: catalog.len(),
            alias_count: catalog.iter().map(|p| p.aliases().len()).sum(),
            shorthand_count: catalog.iter().filter(|p| p.codegen.is_shorthand()).count(),
            logical_property_group_count: catalog.logical_property_groups().len(),
            settings_flag_count: catalog.settings_flags().len(),
            ..Self::default()
        }
    }
}

/// Parse a catalog document held in memory
pub fn parse_properties_str(source: &str, context: &ParsingContext) -> Result<Properties> {
    let document: serde_json::Value =
        serde_json::from_str(source).map_err(|e| GeneratorError::InvalidFormat {
            message: format!("Invalid JSON in property catalog: {}", e),
        })?;
    Properties::from_json(context, &document)
}

/// Read and parse the catalog at `path`
pub fn load_properties(path: &Path, context: &ParsingContext) -> Result<Properties> {
    let source = fs::read_to_string(path).map_err(|e| GeneratorError::FileNotFound {
        path: format!("{}: {}", path.display(), e),
    })?;

    log::debug!("Read {} ({} bytes)", path.display(), source.len());
    parse_properties_str(&source, context)
}

/// Parse the catalog and emit every generated artifact
pub fn generate_with_options(options: GeneratorOptions) -> Result<GenerationStats> {
    let start_time = Instant::now();

    if options.verbose {
        log::info!("{} v{}", NAME, VERSION);
        log::info!(
            "Processing '{}' into '{}'",
            options.properties_path.display(),
            options.output_directory.display()
        );
        log::debug!("Generator options: {:?}", options);
    }

    let context = ParsingContext::new(options.defines.as_deref(), true, options.verbose);
    let catalog = load_properties(&options.properties_path, &context)?;
    let mut stats = GenerationStats::for_catalog(&catalog);

    if !options.output_directory.exists() {
        fs::create_dir_all(&options.output_directory)?;
    }

    let generation = GenerationContext::new(&catalog, options.verbose, options.gperf_executable.clone());
    let gperf_path = generation.write_css_property_names_gperf(&options.output_directory)?;
    stats.gperf_size = fs::metadata(&gperf_path)?.len();

    if !options.skip_gperf {
        generation.run_gperf(&options.output_directory)?;
        stats.ran_gperf = true;
    }

    stats.generate_time_ms = start_time.elapsed().as_millis() as u64;

    if options.verbose {
        log::info!("Generation successful!");
        log::info!("Properties: {}", stats.property_count);
        log::info!("Generate time: {}ms", stats.generate_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}
