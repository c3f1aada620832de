// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Roster TOML parsing

use crate::types::{
    OrgSettings, Role, Roster, WorkerEntry, DEFAULT_GEOFENCE_RADIUS_M,
    DEFAULT_MAX_OVERTIME_MINUTES,
};
use chrono::NaiveTime;
use onsite_core::{GeoPoint, Site, SiteId, Worker, WorkSchedule, WorkerId};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during roster parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("unknown reference: {0}")]
    UnknownReference(String),
    #[error("duplicate token: {0}")]
    DuplicateToken(String),
}

/// Read and parse a roster file
pub fn load_roster(path: &Path) -> Result<Roster, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_roster(&content)
}

/// Parse a roster from TOML content
pub fn parse_roster(content: &str) -> Result<Roster, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let mut roster = Roster::default();

    if let Some(org) = table.get("org") {
        roster.org = parse_org(org)?;
    }

    if let Some(roles) = table.get("role").and_then(|v| v.as_table()) {
        for (name, value) in roles {
            let role = parse_role(name, value)?;
            roster.roles.insert(name.clone(), role);
        }
    }

    if let Some(sites) = table.get("site").and_then(|v| v.as_table()) {
        for (name, value) in sites {
            let site = parse_site(name, value)?;
            roster.sites.insert(name.clone(), site);
        }
    }

    if let Some(workers) = table.get("worker").and_then(|v| v.as_table()) {
        for (name, value) in workers {
            let entry = parse_worker(name, value, &roster)?;
            roster.workers.insert(name.clone(), entry);
        }
    }

    check_tokens(&roster)?;
    Ok(roster)
}

fn parse_org(value: &toml::Value) -> Result<OrgSettings, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("org must be a table".to_string()))?;

    let mut org = OrgSettings {
        name: table
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        ..OrgSettings::default()
    };

    if let Some(offset) = table.get("utc_offset_minutes") {
        let minutes = offset.as_integer().ok_or_else(|| {
            ParseError::InvalidFormat("org.utc_offset_minutes must be an integer".to_string())
        })?;
        if minutes.abs() > 14 * 60 {
            return Err(ParseError::InvalidFormat(format!(
                "org.utc_offset_minutes out of range: {minutes}"
            )));
        }
        org.utc_offset_minutes = Some(minutes as i32);
    }

    if let Some(hour) = table.get("seed_hour") {
        let hour = hour.as_integer().ok_or_else(|| {
            ParseError::InvalidFormat("org.seed_hour must be an integer".to_string())
        })?;
        if !(0..=23).contains(&hour) {
            return Err(ParseError::InvalidFormat(format!(
                "org.seed_hour must be 0-23, got {hour}"
            )));
        }
        org.seed_hour = hour as u32;
    }

    Ok(org)
}

fn parse_role(name: &str, value: &toml::Value) -> Result<Role, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("role.{name} must be a table")))?;

    Ok(Role {
        name: table
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(name)
            .to_string(),
        geofence_enforced: table
            .get("geofence_enforced")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    })
}

fn parse_site(name: &str, value: &toml::Value) -> Result<Site, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("site.{name} must be a table")))?;

    let location = match (
        get_f64(table, "latitude"),
        get_f64(table, "longitude"),
    ) {
        (Some(lat), Some(lon)) => Some(
            GeoPoint::new(lat, lon)
                .map_err(|e| ParseError::InvalidFormat(format!("site.{name}: {e}")))?,
        ),
        (None, None) => None,
        _ => {
            return Err(ParseError::InvalidFormat(format!(
                "site.{name}: latitude and longitude must be set together"
            )))
        }
    };

    let geofence_radius_m = get_f64(table, "geofence_radius_m").unwrap_or(DEFAULT_GEOFENCE_RADIUS_M);
    if !geofence_radius_m.is_finite() || geofence_radius_m <= 0.0 {
        return Err(ParseError::InvalidFormat(format!(
            "site.{name}.geofence_radius_m must be positive, got {geofence_radius_m}"
        )));
    }

    let schedule = match (table.get("work_start"), table.get("work_end")) {
        (Some(start), Some(end)) => {
            let work_start = parse_time(name, "work_start", start)?;
            let work_end = parse_time(name, "work_end", end)?;
            if work_start >= work_end {
                return Err(ParseError::InvalidFormat(format!(
                    "site.{name}: work_start must be before work_end (overnight windows are not supported)"
                )));
            }
            let max_overtime_minutes = table
                .get("max_overtime_minutes")
                .and_then(|v| v.as_integer())
                .unwrap_or(DEFAULT_MAX_OVERTIME_MINUTES);
            if max_overtime_minutes < 0 {
                return Err(ParseError::InvalidFormat(format!(
                    "site.{name}.max_overtime_minutes must not be negative"
                )));
            }
            Some(WorkSchedule {
                work_start,
                work_end,
                max_overtime_minutes,
            })
        }
        (None, None) => None,
        _ => {
            return Err(ParseError::InvalidFormat(format!(
                "site.{name}: work_start and work_end must be set together"
            )))
        }
    };

    Ok(Site {
        id: SiteId(name.to_string()),
        name: table
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(name)
            .to_string(),
        location,
        geofence_radius_m,
        schedule,
    })
}

fn parse_worker(name: &str, value: &toml::Value, roster: &Roster) -> Result<WorkerEntry, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("worker.{name} must be a table")))?;

    let token = table
        .get("token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ParseError::MissingField(format!("worker.{name}.token")))?;
    if token.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "worker.{name}.token must not be empty"
        )));
    }

    let role_name = table
        .get("role")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ParseError::MissingField(format!("worker.{name}.role")))?;
    let role = roster
        .roles
        .get(role_name)
        .ok_or_else(|| ParseError::UnknownReference(format!("worker.{name}.role = {role_name}")))?;

    let default_site = match table.get("site").and_then(|v| v.as_str()) {
        Some(site) => {
            if !roster.sites.contains_key(site) {
                return Err(ParseError::UnknownReference(format!(
                    "worker.{name}.site = {site}"
                )));
            }
            Some(SiteId(site.to_string()))
        }
        None => None,
    };

    let synthetic = table
        .get("synthetic")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if synthetic && default_site.is_none() {
        return Err(ParseError::InvalidFormat(format!(
            "worker.{name}: synthetic workers must set a default site"
        )));
    }

    Ok(WorkerEntry {
        worker: Worker {
            id: WorkerId(name.to_string()),
            name: table
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string(),
            geofence_enforced: role.geofence_enforced,
            synthetic,
            default_site,
        },
        token: token.to_string(),
        role: role_name.to_string(),
    })
}

fn parse_time(site: &str, field: &str, value: &toml::Value) -> Result<NaiveTime, ParseError> {
    let text = value.as_str().ok_or_else(|| {
        ParseError::InvalidFormat(format!("site.{site}.{field} must be a \"HH:MM\" string"))
    })?;
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| {
        ParseError::InvalidFormat(format!("site.{site}.{field}: {text:?} is not HH:MM"))
    })
}

fn get_f64(table: &toml::value::Table, key: &str) -> Option<f64> {
    match table.get(key) {
        Some(toml::Value::Float(f)) => Some(*f),
        Some(toml::Value::Integer(i)) => Some(*i as f64),
        _ => None,
    }
}

fn check_tokens(roster: &Roster) -> Result<(), ParseError> {
    let mut seen: Vec<(&str, &str)> = Vec::new();
    let mut ids: Vec<&String> = roster.workers.keys().collect();
    ids.sort();
    for id in ids {
        let entry = &roster.workers[id];
        if let Some((other, _)) = seen.iter().find(|(_, t)| *t == entry.token) {
            return Err(ParseError::DuplicateToken(format!(
                "workers {other} and {id} share a token"
            )));
        }
        seen.push((id, &entry.token));
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
