//! Persisted user profile and display preferences.
//!
//! Only two values are ever written to disk: the signed-in user's profile
//! record (`user.json`) and the font-size preference (`font_size.json`).
//! Weather snapshots, journal entries and tasks stay in memory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::i18n::Language;

const USER_FILE: &str = "user.json";
const FONT_SIZE_FILE: &str = "font_size.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Default,
    Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: String,
    pub name: String,
    pub soil_type: String,
    pub rice_variety: String,
    pub sowing_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub irrigation: String,
    pub area: f64,
    pub area_unit: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub plots: Vec<Plot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default)]
    pub farms: Vec<Farm>,
}

/// Partial update to the profile's own fields.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub language: Option<Language>,
    pub font_size: Option<FontSize>,
}

#[derive(Debug, Clone, Default)]
pub struct FarmUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PlotUpdate {
    pub name: Option<String>,
    pub soil_type: Option<String>,
    pub rice_variety: Option<String>,
    pub sowing_date: Option<NaiveDate>,
    pub harvest_date: Option<NaiveDate>,
    pub irrigation: Option<String>,
    pub area: Option<f64>,
    pub area_unit: Option<String>,
}

/// Owner of the persisted profile and font size.
///
/// Every mutation writes through to disk before returning.
#[derive(Debug)]
pub struct ProfileStore {
    dir: PathBuf,
    user: Option<UserProfile>,
    language: Language,
    font_size: FontSize,
}

impl ProfileStore {
    /// Open the store in `dir`, loading whatever was saved there.
    ///
    /// Missing files mean "nothing saved yet"; unreadable or corrupt files are errors.
    pub fn open(dir: &Path) -> Result<Self> {
        let user: Option<UserProfile> = read_json(&dir.join(USER_FILE))?;
        let saved_font_size: Option<FontSize> = read_json(&dir.join(FONT_SIZE_FILE))?;

        let language = user.as_ref().map(|u| u.language).unwrap_or_default();
        // The standalone preference wins over the copy on the profile
        let font_size = saved_font_size
            .or_else(|| user.as_ref().and_then(|u| u.font_size))
            .unwrap_or_default();

        tracing::debug!(
            "Opened profile store at {} (user: {}, language: {}, font size: {:?})",
            dir.display(),
            user.is_some(),
            language,
            font_size
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            user,
            language,
            font_size,
        })
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    /// Install a freshly signed-in user.
    pub fn set_user(&mut self, user: UserProfile) -> Result<()> {
        self.language = user.language;
        if let Some(size) = user.font_size {
            self.font_size = size;
        }
        self.user = Some(user);
        self.save_user()
    }

    /// Merge a partial update into the current user. No user, no change.
    pub fn update_user(&mut self, update: UserUpdate) -> Result<()> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(language) = update.language {
            user.language = language;
            self.language = language;
        }
        self.save_user()?;

        if let Some(size) = update.font_size {
            self.set_font_size(size)?;
        }
        Ok(())
    }

    /// Change the font size preference and the signed-in user's copy of it.
    pub fn set_font_size(&mut self, size: FontSize) -> Result<()> {
        self.font_size = size;
        write_json(&self.dir.join(FONT_SIZE_FILE), &size)?;

        if let Some(user) = self.user.as_mut() {
            user.font_size = Some(size);
            self.save_user()?;
        }
        Ok(())
    }

    /// Flip between English and Vietnamese, returning the new language.
    pub fn toggle_language(&mut self) -> Result<Language> {
        let language = self.language.toggle();
        self.language = language;
        if let Some(user) = self.user.as_mut() {
            user.language = language;
            self.save_user()?;
        }
        Ok(language)
    }

    pub fn update_farm(&mut self, farm_id: &str, update: FarmUpdate) -> Result<()> {
        let Some(farm) = self.farm_mut(farm_id) else {
            tracing::debug!("update_farm: no farm {}", farm_id);
            return Ok(());
        };

        if let Some(name) = update.name {
            farm.name = name;
        }
        if let Some(location) = update.location {
            farm.location = location;
        }
        self.save_user()
    }

    pub fn update_plot(&mut self, farm_id: &str, plot_id: &str, update: PlotUpdate) -> Result<()> {
        let Some(plot) = self
            .farm_mut(farm_id)
            .and_then(|farm| farm.plots.iter_mut().find(|p| p.id == plot_id))
        else {
            tracing::debug!("update_plot: no plot {}/{}", farm_id, plot_id);
            return Ok(());
        };

        if let Some(name) = update.name {
            plot.name = name;
        }
        if let Some(soil_type) = update.soil_type {
            plot.soil_type = soil_type;
        }
        if let Some(rice_variety) = update.rice_variety {
            plot.rice_variety = rice_variety;
        }
        if let Some(sowing_date) = update.sowing_date {
            plot.sowing_date = sowing_date;
        }
        if let Some(harvest_date) = update.harvest_date {
            plot.harvest_date = harvest_date;
        }
        if let Some(irrigation) = update.irrigation {
            plot.irrigation = irrigation;
        }
        if let Some(area) = update.area {
            plot.area = area;
        }
        if let Some(area_unit) = update.area_unit {
            plot.area_unit = area_unit;
        }
        self.save_user()
    }

    /// Sign out: forget the user and remove the stored profile.
    ///
    /// The font-size preference and current language outlive the session.
    pub fn clear_user(&mut self) -> Result<()> {
        self.user = None;
        let path = self.dir.join(USER_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove {}", path.display()))
            }
        }
    }

    fn farm_mut(&mut self, farm_id: &str) -> Option<&mut Farm> {
        self.user
            .as_mut()
            .and_then(|user| user.farms.iter_mut().find(|f| f.id == farm_id))
    }

    fn save_user(&self) -> Result<()> {
        match &self.user {
            Some(user) => write_json(&self.dir.join(USER_FILE), user),
            None => Ok(()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create preferences directory")?;
    }
    let contents = serde_json::to_string_pretty(value).context("Failed to serialize preferences")?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
