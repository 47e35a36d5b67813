//! Text and config loading with log-and-continue failure handling.
//!
//! None of these functions propagate errors. A read failure logs the cause
//! and returns whatever was read before it (or nothing). Callers that need a
//! hard failure, such as level construction, check for an empty result.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::config::GameInfo;

pub fn read_all_text(reader: &mut dyn Read) -> String {
    let mut result = String::new();
    if let Err(err) = reader.read_to_string(&mut result) {
        log::error!("Text stream could not be read: {err}");
    }
    result
}

pub fn read_lines(reader: &mut dyn Read) -> Vec<String> {
    let mut lines = Vec::new();
    for line in BufReader::new(reader).lines() {
        match line {
            Ok(line) => lines.push(line),
            Err(err) => {
                log::error!("Text stream could not be read: {err}");
                break;
            }
        }
    }
    lines
}

pub fn deserialize_config(path: &Path) -> Option<GameInfo> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("Config {} could not be read: {err}", path.display());
            return None;
        }
    };
    match serde_json::from_str::<GameInfo>(&raw) {
        Ok(info) => {
            log::info!("Loaded tuning config {}", path.display());
            Some(info)
        }
        Err(err) => {
            log::error!("Config {} could not be deserialized: {err}", path.display());
            None
        }
    }
}
