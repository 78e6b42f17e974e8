//! Conversion settings and validated updates.
//!
//! Typed callers build [`Setting`] values directly. Untyped input (JSON files,
//! form fields, the WASM binding) goes through [`Settings::apply_json`], which
//! resolves each key to a [`Setting`] first. In both cases a batch is
//! validated in full before anything is written, so a failed update leaves
//! the settings untouched.

use crate::glyph::Charset;
use crate::resize::{Interpolation, Rounding};
use crate::{AsciifyError, Result};
use log::trace;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    width: u32,
    height_ratio: f64,
    charset: Charset,
    detail: f64,
    filter: Interpolation,
    rounding: Rounding,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 100,
            // monospace cells are roughly twice as tall as wide
            height_ratio: 0.55,
            charset: Charset::default(),
            detail: 1.0,
            filter: Interpolation::default(),
            rounding: Rounding::default(),
        }
    }
}

impl Settings {
    /// Base column count, before `detail` is applied.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height_ratio(&self) -> f64 {
        self.height_ratio
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn detail(&self) -> f64 {
        self.detail
    }

    pub fn filter(&self) -> Interpolation {
        self.filter
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Applies `updates` in order, or none of them if any is invalid.
    pub fn apply<I>(&mut self, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = Setting>,
    {
        let updates: Vec<Setting> = updates.into_iter().collect();
        for update in &updates {
            update.validate()?;
        }
        for update in updates {
            trace!("setting {} = {}", update.key(), update.value_string());
            self.set(update);
        }
        Ok(())
    }

    /// Applies updates keyed by name. Unknown keys fail with
    /// [`AsciifyError::UnknownSetting`] and nothing is applied.
    pub fn apply_json(&mut self, values: &Map<String, Value>) -> Result<()> {
        let updates = values
            .iter()
            .map(|(key, value)| Setting::from_json(key, value))
            .collect::<Result<Vec<_>>>()?;
        self.apply(updates)
    }

    /// Parses `text` as a flat JSON object and applies it.
    pub fn apply_json_str(&mut self, text: &str) -> Result<()> {
        let values: Map<String, Value> = serde_json::from_str(text)?;
        self.apply_json(&values)
    }

    fn set(&mut self, update: Setting) {
        match update {
            Setting::Width(width) => self.width = width,
            Setting::HeightRatio(ratio) => self.height_ratio = ratio,
            Setting::Charset(charset) => self.charset = charset,
            Setting::Detail(detail) => self.detail = detail,
            Setting::Filter(filter) => self.filter = filter,
            Setting::Rounding(rounding) => self.rounding = rounding,
        }
    }
}

/// A single settings change.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Width(u32),
    HeightRatio(f64),
    Charset(Charset),
    Detail(f64),
    Filter(Interpolation),
    Rounding(Rounding),
}

impl Setting {
    /// Recognized keys for [`Setting::from_json`].
    pub const KEYS: [&'static str; 6] = ["width", "height_ratio", "charset", "detail", "filter", "rounding"];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Width(_) => "width",
            Self::HeightRatio(_) => "height_ratio",
            Self::Charset(_) => "charset",
            Self::Detail(_) => "detail",
            Self::Filter(_) => "filter",
            Self::Rounding(_) => "rounding",
        }
    }

    fn value_string(&self) -> String {
        match self {
            Self::Width(v) => v.to_string(),
            Self::HeightRatio(v) | Self::Detail(v) => v.to_string(),
            Self::Charset(v) => format!("{v:?}"),
            Self::Filter(v) => v.to_string(),
            Self::Rounding(v) => v.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Width(0) => Err(invalid("width", "must be a positive integer, got 0")),
            Self::HeightRatio(v) | Self::Detail(v) if !(v.is_finite() && *v > 0.0) => {
                Err(invalid(self.key(), format!("must be a positive number, got {v}")))
            }
            Self::Charset(charset) if charset.is_empty() => {
                Err(invalid("charset", "must contain at least one character"))
            }
            _ => Ok(()),
        }
    }

    /// Resolves an untyped key/value pair. `heightRatio` is accepted as an
    /// alias of `height_ratio`.
    pub fn from_json(key: &str, value: &Value) -> Result<Self> {
        let setting = match key {
            "width" => Self::Width(parse_width(value)?),
            "height_ratio" | "heightRatio" => Self::HeightRatio(parse_number("height_ratio", value)?),
            "detail" => Self::Detail(parse_number("detail", value)?),
            "charset" => Self::Charset(Charset::new(parse_str("charset", value)?)?),
            "filter" => Self::Filter(
                parse_str("filter", value)?
                    .parse()
                    .map_err(|reason| invalid("filter", reason))?,
            ),
            "rounding" => Self::Rounding(
                parse_str("rounding", value)?
                    .parse()
                    .map_err(|reason| invalid("rounding", reason))?,
            ),
            other => return Err(AsciifyError::UnknownSetting(other.to_string())),
        };
        setting.validate()?;
        Ok(setting)
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> AsciifyError {
    AsciifyError::InvalidSettingValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_width(value: &Value) -> Result<u32> {
    if let Some(width) = value.as_i64() {
        return u32::try_from(width)
            .ok()
            .filter(|w| *w > 0)
            .ok_or_else(|| invalid("width", format!("must be a positive integer, got {width}")));
    }
    if value.is_u64() {
        return Err(invalid("width", format!("{value} is too large")));
    }
    Err(invalid("width", format!("expected an integer, got {value}")))
}

fn parse_number(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(key, format!("expected a number, got {value}")))
}

fn parse_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| invalid(key, format!("expected a string, got {value}")))
}
