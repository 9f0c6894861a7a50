//! Generated list headers.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::profile::TargetProfile;

/// Run-wide values shared by every generated header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    pub version: String,
    pub homepage: String,
    /// Update frequency in days.
    pub expires: String,
    pub maintainer: String,
}

impl HeaderConfig {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.version.trim().is_empty() {
            return Err(GeneratorError::configuration("version is required"));
        }
        if self.homepage.trim().is_empty() {
            return Err(GeneratorError::configuration("homepage is required"));
        }
        Ok(())
    }
}

/// `DDMMYYYY`
pub fn version_stamp(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

/// `DD-MM-YYYY`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn list_header(profile: &TargetProfile, config: &HeaderConfig, date: NaiveDate) -> String {
    let homepage = config.homepage.trim_end_matches('/');
    let mut out = String::with_capacity(1024);

    // writing to a String cannot fail
    let _ = writeln!(out, "[{}]", profile.extension_name);
    let _ = writeln!(out, "! Version: {}-{}", config.version, version_stamp(date));
    let _ = writeln!(out, "! Title: {}", profile.title);
    let _ = writeln!(out, "! Last modified: {}", display_date(date));
    let _ = writeln!(out, "! Expires: {} day (update frequency)", config.expires);
    let _ = writeln!(out, "! Homepage: {homepage}");
    let _ = writeln!(out, "! Description: {}", profile.description);
    out.push_str("!\n");
    out.push_str("! This is a list of adservers and trackers that are blocked by default.\n");
    out.push_str("! You can add your own filters here. Just make sure to use the $badfilter\n");
    out.push_str("! option, otherwise your filter will be ignored.\n");
    out.push_str("!\n");
    let _ = writeln!(out, "! This list is maintained by {}.", config.maintainer);
    let _ = writeln!(
        out,
        "! Please report unblocked adservers or other issues here: {homepage}/issues"
    );
    out.push_str("!\n");
    if let Some(extra) = &profile.additional_header {
        out.push_str(extra.trim_end_matches('\n'));
    }
    out.push('\n');
    out.push_str("!\n");
    out
}

pub fn domain_header(config: &HeaderConfig, domain_count: usize, date: NaiveDate) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("[Domain List]\n");
    let _ = writeln!(out, "! Created: {}", display_date(date));
    let _ = writeln!(out, "! Homepage: {}", config.homepage.trim_end_matches('/'));
    let _ = writeln!(out, "! Total domains: {domain_count}");
    out.push_str("!\n");
    out.push_str("! This list contains the unique domains from the adblock rules.\n");
    out.push_str("!\n");
    out.push_str("!\n");
    out
}
