//! Field-keyed input bags and the validated inputs built from them.
//!
//! Browsers submit urlencoded pairs where list fields (`genres`) repeat their
//! key. The JSON API submits an object. Both are normalized into a [`FormBag`]
//! before validation so the mutation layer only ever sees typed inputs.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Accepted format for show start times.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FALSE_VALUES: [&str; 5] = ["false", "0", "off", "n", "no"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBag {
    fields: Vec<(String, String)>,
}

impl FormBag {
    pub fn from_pairs(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Flattens a JSON object into pairs. Arrays become repeated keys,
    /// `true` becomes a present flag, `false` and `null` are left out.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(AppError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        };

        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        let item = json_scalar(&key, item)?;
                        if let Some(item) = item {
                            fields.push((key.clone(), item));
                        }
                    }
                }
                other => {
                    if let Some(item) = json_scalar(&key, other)? {
                        fields.push((key, item));
                    }
                }
            }
        }

        Ok(Self { fields })
    }

    pub fn values(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Single value for `key`; repeated values are rejected.
    pub fn scalar(&self, key: &str) -> Result<Option<&str>> {
        match self.values(key).as_slice() {
            [] => Ok(None),
            [value] => Ok(Some(*value)),
            _ => Err(AppError::Validation(format!(
                "{key} must be a single value"
            ))),
        }
    }

    /// Trimmed, non-blank scalar or `None`.
    fn present(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .scalar(key)?
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string))
    }

    /// All non-blank values for `key`, in submission order.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.values(key)
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn flag(&self, key: &str) -> Result<bool> {
        Ok(match self.scalar(key)? {
            None => false,
            Some(v) => !FALSE_VALUES.contains(&v.trim().to_ascii_lowercase().as_str()),
        })
    }
}

fn json_scalar(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Bool(true) => Ok(Some("y".to_string())),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(AppError::Validation(format!(
            "{key} must be a string or a list of strings"
        ))),
    }
}

/// Collects required fields so every missing one is reported at once.
struct Required<'a> {
    form: &'a FormBag,
    missing: Vec<&'static str>,
}

impl<'a> Required<'a> {
    fn new(form: &'a FormBag) -> Self {
        Self {
            form,
            missing: Vec::new(),
        }
    }

    fn take(&mut self, key: &'static str) -> Result<String> {
        self.take_any(key, &[key])
    }

    /// First present key among `keys`, reported under `name` when missing.
    fn take_any(&mut self, name: &'static str, keys: &[&str]) -> Result<String> {
        for key in keys {
            if let Some(value) = self.form.present(key)? {
                return Ok(value);
            }
        }
        self.missing.push(name);
        Ok(String::new())
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "missing required fields: {}",
                self.missing.join(", ")
            )))
        }
    }
}

fn optional(form: &FormBag, key: &str) -> Result<String> {
    Ok(form.present(key)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub website: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub facebook_link: String,
}

impl VenueInput {
    pub fn from_form(form: &FormBag) -> Result<Self> {
        let mut required = Required::new(form);
        let name = required.take("name")?;
        let city = required.take("city")?;
        let state = required.take("state")?;
        let phone = required.take("phone")?;
        let image_link = required.take("image_link")?;
        let facebook_link = required.take("facebook_link")?;
        let website = required.take_any("website", &["website", "website_link"])?;
        required.finish()?;

        Ok(Self {
            name,
            city,
            state,
            address: optional(form, "address")?,
            phone,
            genres: form.list("genres"),
            website,
            seeking_talent: form.flag("seeking_talent")?,
            seeking_description: optional(form, "seeking_description")?,
            image_link,
            facebook_link,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub website: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub facebook_link: String,
}

impl ArtistInput {
    pub fn from_form(form: &FormBag) -> Result<Self> {
        let mut required = Required::new(form);
        let name = required.take("name")?;
        let city = required.take("city")?;
        let state = required.take("state")?;
        let phone = required.take("phone")?;
        let image_link = required.take("image_link")?;
        let facebook_link = required.take("facebook_link")?;
        let website = required.take_any("website", &["website", "website_link"])?;
        required.finish()?;

        Ok(Self {
            name,
            city,
            state,
            phone,
            genres: form.list("genres"),
            website,
            seeking_venue: form.flag("seeking_venue")?,
            seeking_description: optional(form, "seeking_description")?,
            image_link,
            facebook_link,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInput {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: NaiveDateTime,
}

impl ShowInput {
    pub fn from_form(form: &FormBag) -> Result<Self> {
        let mut required = Required::new(form);
        let venue_id = required.take("venue_id")?;
        let artist_id = required.take("artist_id")?;
        let start_time = required.take("start_time")?;
        required.finish()?;

        Ok(Self {
            venue_id: parse_id("venue_id", &venue_id)?,
            artist_id: parse_id("artist_id", &artist_id)?,
            start_time: parse_start_time(&start_time)?,
        })
    }
}

fn parse_id(key: &str, value: &str) -> Result<i32> {
    value
        .parse()
        .map_err(|_| AppError::Validation(format!("{key} must be an integer id")))
}

pub fn parse_start_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, START_TIME_FORMAT).map_err(|_| {
        AppError::Validation("start_time must be formatted as YYYY-MM-DD HH:MM:SS".to_string())
    })
}
