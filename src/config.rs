// config.rs
use crate::error::{BroError, Result};
use crate::selection_set::{normalize, DEFAULT_CITIES};
use crate::user_interaction::{get_edited_user_config_input, print_insight_level_2};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "bro.config";

const CONFIG_SYNTAX: &str = r#"SYNTAX
======

{
  "data_dir": ".",           // folder holding the city files
  "cities": [                // order here is the order cities are loaded in
    { "name": "chicago", "file": "chicago.csv" }
  ],
  "sample_size": 5           // rows shown per raw data request
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityFile {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_cities")]
    pub cities: Vec<CityFile>,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_cities() -> Vec<CityFile> {
    DEFAULT_CITIES
        .iter()
        .map(|name| CityFile {
            name: name.to_string(),
            file: format!("{}.csv", name.replace(' ', "_")),
        })
        .collect()
}

fn default_sample_size() -> usize {
    5
}

impl Default for BroConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cities: default_cities(),
            sample_size: default_sample_size(),
        }
    }
}

impl BroConfig {
    /// City names in declared order; this is the city universe.
    pub fn city_names(&self) -> Vec<String> {
        self.cities.iter().map(|city| normalize(&city.name)).collect()
    }

    fn validate(self) -> Result<Self> {
        if self.cities.is_empty() {
            return Err(BroError::InvalidConfig(
                "at least one city has to be configured".to_string(),
            ));
        }
        if let Some(city) = self.cities.iter().find(|city| city.name.trim().is_empty()) {
            return Err(BroError::InvalidConfig(format!(
                "city with file '{}' has no name",
                city.file
            )));
        }
        let names = self.city_names();
        for (index, name) in names.iter().enumerate() {
            if names[..index].contains(name) {
                return Err(BroError::InvalidConfig(format!(
                    "city '{}' is configured more than once",
                    name
                )));
            }
        }
        Ok(self)
    }
}

/// Everything before the SYNTAX block is the JSON config.
pub fn parse_config(text: &str) -> Result<BroConfig> {
    let json_part = text.split("SYNTAX").next().unwrap_or_default();
    let config: BroConfig = serde_json::from_str(json_part)?;
    config.validate()
}

fn render_config(config: &BroConfig) -> Result<String> {
    Ok(format!(
        "{}\n\n{}",
        serde_json::to_string_pretty(config)?,
        CONFIG_SYNTAX
    ))
}

/// Reads the config at `config_path`, writing the defaults there first if
/// the file does not exist yet.
pub fn load_config(config_path: &Path) -> Result<BroConfig> {
    if !config_path.exists() {
        let mut file = File::create(config_path)?;
        file.write_all(render_config(&BroConfig::default())?.as_bytes())?;
        info!(path = %config_path.display(), "wrote default config");
    }

    let mut text = String::new();
    File::open(config_path)?.read_to_string(&mut text)?;
    parse_config(&text)
}

/// Opens the config in vim. The edit is only saved if it still parses.
pub fn edit_config(config_path: &Path) -> Result<BroConfig> {
    let current = load_config(config_path)?;
    let current_text = fs::read_to_string(config_path)?;

    let edited_text = get_edited_user_config_input(current_text);
    let edited = match parse_config(&edited_text) {
        Ok(config) => {
            print_insight_level_2("Config's all good, bro!");
            config
        }
        Err(e) => {
            print_insight_level_2(&format!(
                "Whoops, hit a snag with that config: {}. Keeping the old one.",
                e
            ));
            return Ok(current);
        }
    };

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(config_path)?;
    file.write_all(render_config(&edited)?.as_bytes())?;
    Ok(edited)
}
