use serde::{Deserialize, Serialize};

use crate::constants::preferences::DEFAULT_MAX_PRICE;
use crate::entities::user_preferences;
use crate::inventory::shape::decode_list;

/// Notification, search and privacy preferences of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub price_alerts: bool,
    pub new_arrivals: bool,
    pub marketing_notifications: bool,
    pub max_price: Option<i64>,
    pub preferred_makes: Vec<String>,
    pub preferred_fuel_types: Vec<String>,
    pub preferred_body_types: Vec<String>,
    pub profile_visible: bool,
    pub show_email: bool,
    pub show_phone: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            price_alerts: true,
            new_arrivals: true,
            marketing_notifications: false,
            max_price: Some(DEFAULT_MAX_PRICE),
            preferred_makes: Vec::new(),
            preferred_fuel_types: Vec::new(),
            preferred_body_types: Vec::new(),
            profile_visible: true,
            show_email: false,
            show_phone: false,
        }
    }
}

impl From<user_preferences::Model> for Preferences {
    fn from(model: user_preferences::Model) -> Self {
        Self {
            email_notifications: model.email_notifications,
            sms_notifications: model.sms_notifications,
            price_alerts: model.price_alerts,
            new_arrivals: model.new_arrivals,
            marketing_notifications: model.marketing_notifications,
            max_price: model.max_price,
            preferred_makes: decode_list(&model.preferred_makes),
            preferred_fuel_types: decode_list(&model.preferred_fuel_types),
            preferred_body_types: decode_list(&model.preferred_body_types),
            profile_visible: model.profile_visible,
            show_email: model.show_email,
            show_phone: model.show_phone,
        }
    }
}

/// Partial preferences update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub price_alerts: Option<bool>,
    pub new_arrivals: Option<bool>,
    pub marketing_notifications: Option<bool>,
    pub max_price: Option<i64>,
    pub preferred_makes: Option<Vec<String>>,
    pub preferred_fuel_types: Option<Vec<String>>,
    pub preferred_body_types: Option<Vec<String>>,
    pub profile_visible: Option<bool>,
    pub show_email: Option<bool>,
    pub show_phone: Option<bool>,
}

impl Preferences {
    pub fn apply(&mut self, patch: PreferencesPatch) {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        merge(&mut self.email_notifications, patch.email_notifications);
        merge(&mut self.sms_notifications, patch.sms_notifications);
        merge(&mut self.price_alerts, patch.price_alerts);
        merge(&mut self.new_arrivals, patch.new_arrivals);
        merge(
            &mut self.marketing_notifications,
            patch.marketing_notifications,
        );
        if patch.max_price.is_some() {
            self.max_price = patch.max_price;
        }
        merge(&mut self.preferred_makes, patch.preferred_makes);
        merge(&mut self.preferred_fuel_types, patch.preferred_fuel_types);
        merge(&mut self.preferred_body_types, patch.preferred_body_types);
        merge(&mut self.profile_visible, patch.profile_visible);
        merge(&mut self.show_email, patch.show_email);
        merge(&mut self.show_phone, patch.show_phone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_account_settings() {
        let prefs = Preferences::default();
        assert!(prefs.email_notifications);
        assert!(!prefs.sms_notifications);
        assert!(prefs.price_alerts);
        assert!(prefs.new_arrivals);
        assert!(!prefs.marketing_notifications);
        assert_eq!(prefs.max_price, Some(50_000));
        assert!(prefs.profile_visible);
        assert!(!prefs.show_email);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut prefs = Preferences::default();
        let patch: PreferencesPatch = serde_json::from_str(
            r#"{"smsNotifications": true, "preferredMakes": ["Toyota", "Honda"]}"#,
        )
        .unwrap();

        prefs.apply(patch);

        assert!(prefs.sms_notifications);
        assert_eq!(prefs.preferred_makes, vec!["Toyota", "Honda"]);
        assert!(prefs.email_notifications);
        assert_eq!(prefs.max_price, Some(50_000));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(json["emailNotifications"], true);
        assert_eq!(json["maxPrice"], 50_000);
        assert!(json["preferredBodyTypes"].as_array().unwrap().is_empty());
    }
}
