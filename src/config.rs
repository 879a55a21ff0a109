use crate::error::{Error, Result};
use crate::points::InputSource;

use clap::{arg, value_parser, ArgGroup, ArgMatches};
use clap::error::ErrorKind;
use config::{*, ext::*};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug)]
pub struct Config {
    pub csv_path: String,
    pub geojson_path: String,
    pub radius: u32,
    pub html_output_path: String,
    pub segments: usize,
    pub delimiter: String,
    pub zoom: u8,
    pub no_browser: bool,
}

lazy_static! {
    pub static ref CONFIG: Config = Config::new();
}

pub const CLAP_STYLING: clap::builder::styling::Styles =
    clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

const DEFAULTS: &[(&str, &str)] = &[
    ("csv_path", ""),
    ("geojson_path", ""),
    ("radius", "1000"),
    ("html_output_path", "savedhtml_files/map.html"),
    ("segments", "64"),
    ("delimiter", "tab"),
    ("zoom", "3"),
    ("no_browser", "false"),
];

impl Config {
    // Parse the process command line. Usage errors terminate the process
    // with clap's exit code.
    pub fn new() -> Self {
        let matches = Config::command().get_matches();

        match Config::from_matches(&matches) {
            Ok(config) => config,
            Err(e) => {
                Config::command()
                    .error(ErrorKind::InvalidValue, e.to_string())
                    .exit()
            },
        }
    }

    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Config::command()
            .try_get_matches_from(args)
            .map_err(|e| Error::Config(e.to_string()))?;

        Config::from_matches(&matches)
    }

    pub fn command() -> clap::Command {
        clap::Command::new("coverage")
            .bin_name("coverage")
            .about("Calculate areas of circles and generate an interactive map.")
            .styles(CLAP_STYLING)
            .args([
                arg!(--geojson_path <FILE>
                     "GeoJSON file with point features"),
                arg!(--csv_path <FILE>
                     "Delimited table with lat and lon columns"),
                arg!(--radius <METERS> "Radius of the circles in meters")
                    .value_parser(value_parser!(u32)),
                arg!(--html_output_path <FILE>
                     "Path to save the generated HTML map"),
                arg!(--segments <N> "Number of vertices per circle")
                    .value_parser(value_parser!(usize)),
                arg!(--delimiter <CHAR>
                     "Column delimiter of the table (a character or 'tab')"),
                arg!(--zoom <LEVEL> "Initial zoom level of the map")
                    .value_parser(value_parser!(u8)),
                arg!(--no_browser "Don't open the map in a browser"),
            ])
            .group(ArgGroup::new("input")
                   .args(["geojson_path", "csv_path"])
                   .required(true))
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut given: Vec<(String, String)> = vec![];

        for key in ["geojson_path", "csv_path", "html_output_path",
                    "delimiter"] {
            if let Some(v) = matches.get_one::<String>(key) {
                given.push((key.to_string(), v.clone()));
            }
        }

        if let Some(r) = matches.get_one::<u32>("radius") {
            given.push(("radius".to_string(), r.to_string()));
        }
        if let Some(s) = matches.get_one::<usize>("segments") {
            given.push(("segments".to_string(), s.to_string()));
        }
        if let Some(z) = matches.get_one::<u8>("zoom") {
            given.push(("zoom".to_string(), z.to_string()));
        }
        if matches.get_flag("no_browser") {
            given.push(("no_browser".to_string(), "true".to_string()));
        }

        // Command line values override the in-memory defaults
        let config = DefaultConfigurationBuilder::new()
            .add_in_memory(DEFAULTS)
            .add_in_memory(&given)
            .build()
            .map_err(|e| Error::Config(format!("{:?}", e)))?;

        let config: Config = config.reify();
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.input()?;
        self.delimiter_byte()?;

        if self.radius == 0 {
            return Err(Error::Config("radius must be positive".to_string()));
        }

        Ok(())
    }

    pub fn input(&self) -> Result<InputSource> {
        match (self.csv_path.as_str(), self.geojson_path.as_str()) {
            ("", "") => Err(Error::MissingInput),
            (csv, "") => Ok(InputSource::Table(PathBuf::from(csv))),
            ("", geojson) => Ok(InputSource::GeoJson(PathBuf::from(geojson))),
            _ => Err(Error::ConflictingInput),
        }
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_str() {
            "tab" | "\\t" | "\t" => Ok(b'\t'),
            s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
            s => Err(Error::Config(format!("Invalid delimiter '{}'", s))),
        }
    }

    pub fn output_base(&self) -> PathBuf {
        PathBuf::from(&self.html_output_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: "".to_string(),
            geojson_path: "".to_string(),
            radius: 1000,
            html_output_path: "savedhtml_files/map.html".to_string(),
            segments: 64,
            delimiter: "tab".to_string(),
            zoom: 3,
            no_browser: false,
        }
    }
}
