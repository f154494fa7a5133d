// Error types for moddyno

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum ModdynoError {
    // Errors raised while building a modification catalog
    #[snafu(display("Duplicate modification key in catalog: {key}"))]
    DuplicateCatalogKey { key: String },
    #[snafu(display("Modification '{included_by}' includes unknown key '{key}'"))]
    UnknownIncludedKey { key: String, included_by: String },
    #[snafu(display("Modification '{key}' has an invalid gain range"))]
    InvalidGainRange { key: String },
    #[snafu(display("Error reading catalog file"))]
    CatalogIOError { source: io::Error },
    #[snafu(display("Error parsing catalog file"))]
    CatalogParseError { source: serde_json::Error },

    // Tuning config management errors
    #[snafu(display("Could not find application data directory to save tuning file"))]
    NoConfigDir,
    #[snafu(display("Error writing tuning file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing tuning file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Errors while loading caller-supplied data files
    #[snafu(display("Error reading car profile file"))]
    ProfileIOError { source: io::Error },
    #[snafu(display("Error parsing car profile file"))]
    ProfileParseError { source: serde_json::Error },
    #[snafu(display("Error reading lap data file"))]
    LapDataIOError { source: io::Error },

    // Errors while writing computation output
    #[snafu(display("Error writing output file"))]
    OutputIOError { source: io::Error },
    #[snafu(display("Error serializing computation output"))]
    OutputSerializeError { source: serde_json::Error },
}
