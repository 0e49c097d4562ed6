use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    entities::site_setting,
    errors::ServiceError,
    events::{Event, EventSender},
};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Typed view over the flat key→string settings rows. Parsed once at the
/// boundary so the rest of the code never touches stringly-typed values:
/// booleans must be the literal strings "true"/"false", numbers decimal text.
/// Missing or unparseable values fall back to defaults with a warning.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteSettings {
    pub site_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub free_delivery_threshold: Option<i64>,
    pub low_stock_threshold: i32,
    pub enable_countdown_timer: bool,
    pub limited_stock_message: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            free_delivery_threshold: None,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            enable_countdown_timer: false,
            limited_stock_message: String::new(),
        }
    }
}

impl SiteSettings {
    /// Parses the typed settings from a flat key→value map.
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        Self {
            site_name: map.get("site_name").cloned().unwrap_or(defaults.site_name),
            contact_phone: map
                .get("contact_phone")
                .cloned()
                .unwrap_or(defaults.contact_phone),
            contact_email: map
                .get("contact_email")
                .cloned()
                .unwrap_or(defaults.contact_email),
            free_delivery_threshold: map
                .get("free_delivery_threshold")
                .and_then(|raw| parse_number("free_delivery_threshold", raw)),
            low_stock_threshold: map
                .get("low_stock_threshold")
                .and_then(|raw| parse_number("low_stock_threshold", raw))
                .and_then(|n| i32::try_from(n).ok())
                .unwrap_or(defaults.low_stock_threshold),
            enable_countdown_timer: map
                .get("enable_countdown_timer")
                .and_then(|raw| parse_bool("enable_countdown_timer", raw))
                .unwrap_or(defaults.enable_countdown_timer),
            limited_stock_message: map
                .get("limited_stock_message")
                .cloned()
                .unwrap_or(defaults.limited_stock_message),
        }
    }
}

fn parse_number(key: &str, raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key = key, value = raw, "Setting is not decimal text; using default");
            None
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Option<bool> {
    // Only the literal strings count; anything else is a misconfiguration.
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            warn!(key = key, value = raw, "Setting is not 'true'/'false'; using default");
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SettingUpdate {
    pub key: String,
    pub value: String,
}

/// Process-wide configuration rows read by the landing page at render time
/// and mutated only through the admin settings screen.
#[derive(Clone)]
pub struct SiteSettingsService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl SiteSettingsService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<site_setting::Model>, ServiceError> {
        site_setting::Entity::find()
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// The flat key→value mapping consumed by the landing page.
    #[instrument(skip(self))]
    pub async fn as_map(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        let rows = self.list().await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.setting_key, row.setting_value.unwrap_or_default()))
            .collect())
    }

    /// Typed settings with defaults applied at the parse boundary.
    #[instrument(skip(self))]
    pub async fn typed(&self) -> Result<SiteSettings, ServiceError> {
        Ok(SiteSettings::from_map(&self.as_map().await?))
    }

    /// Applies a batch of key/value updates from the admin settings screen.
    /// Existing rows are updated in place; unknown keys are created as plain
    /// text rows.
    #[instrument(skip(self, updates), fields(count = updates.len()))]
    pub async fn update_many(&self, updates: Vec<SettingUpdate>) -> Result<(), ServiceError> {
        let now = Utc::now();
        let mut keys = Vec::with_capacity(updates.len());

        for update in updates {
            let existing = site_setting::Entity::find_by_id(update.key.clone())
                .one(&*self.db)
                .await?;

            match existing {
                Some(row) => {
                    let mut active: site_setting::ActiveModel = row.into();
                    active.setting_value = Set(Some(update.value));
                    active.updated_at = Set(now);
                    active.update(&*self.db).await?;
                }
                None => {
                    site_setting::ActiveModel {
                        setting_key: Set(update.key.clone()),
                        setting_value: Set(Some(update.value)),
                        setting_type: Set(Some("text".to_string())),
                        description: Set(None),
                        updated_at: Set(now),
                    }
                    .insert(&*self.db)
                    .await?;
                }
            }
            keys.push(update.key);
        }

        info!(updated_keys = ?keys, "Site settings updated");
        self.event_sender
            .send_or_log(Event::SettingsUpdated { keys })
            .await;
        Ok(())
    }
}
