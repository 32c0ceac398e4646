//! Identifier conventions shared by the collector and the emitter.
use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("static regex"));
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("static regex"));

/// `UserProfiles` → `user_profiles`, `Admin::APIKeys` → `admin/api_keys`.
pub fn underscore(s: &str) -> String {
    let s = s.replace("::", "/");
    let s = ACRONYM_BOUNDARY.replace_all(&s, "${1}_${2}");
    let s = WORD_BOUNDARY.replace_all(&s, "${1}_${2}");
    s.replace('-', "_").to_lowercase()
}

/// `Admin::WidgetsController` → `admin/widgets`, the form routes refer to.
pub fn controller_key(class_name: &str) -> String {
    let class_name = class_name.trim_start_matches("::");
    underscore(class_name.strip_suffix("Controller").unwrap_or(class_name))
}

/// `admin/user_profiles` → `AdminUserProfiles`.
pub fn camelize(s: &str) -> String {
    s.split(['/', '_'])
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `new_widget` → `newWidget`.
pub fn camelize_lower(s: &str) -> String {
    let camel = camelize(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub fn params_type_name(controller: &str, action: &str) -> String {
    format!("{}{}Params", camelize(controller), camelize(action))
}

pub fn return_type_name(controller: &str, action: &str) -> String {
    format!("{}{}Return", camelize(controller), camelize(action))
}
