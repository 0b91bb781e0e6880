//! Localized message templates with `{placeholder}` substitution.
//!
//! Every template carries a French default plus optional variants in the
//! local languages spoken by the platform's farmers (Baoulé and Dioula).
//! Rendering is pure: no I/O, no clock, the same inputs always produce the
//! same output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Languages the built-in catalog can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// French, the default for every template.
    #[default]
    Fr,
    /// Baoulé.
    Bci,
    /// Dioula.
    Dyu,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Fr, Language::Bci, Language::Dyu];

    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Bci => "bci",
            Language::Dyu => "dyu",
        }
    }

    /// Parse a language code; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::Fr),
            "bci" => Some(Language::Bci),
            "dyu" => Some(Language::Dyu),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A single message template: a French pattern plus per-language variants.
#[derive(Debug, Clone)]
pub struct Template {
    default: String,
    variants: HashMap<Language, String>,
}

impl Template {
    /// Create a template from its French pattern.
    pub fn new(french: impl Into<String>) -> Self {
        Self {
            default: french.into(),
            variants: HashMap::new(),
        }
    }

    /// Add a language variant.
    pub fn variant(mut self, language: Language, pattern: impl Into<String>) -> Self {
        self.variants.insert(language, pattern.into());
        self
    }

    /// Pattern for `language`, falling back to the French default.
    pub fn pattern(&self, language: Language) -> &str {
        self.variants
            .get(&language)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

/// Process-wide registry of message templates, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: HashMap<String, Template>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a template under `key`.
    pub fn with(mut self, key: impl Into<String>, template: Template) -> Self {
        self.templates.insert(key.into(), template);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Template> {
        self.templates.get(key)
    }

    /// Keys of every registered template, sorted for stable output.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Render `key` in `language`, substituting `vars`.
    ///
    /// Returns `None` for an unknown key. A missing language variant falls
    /// back to French; placeholders with no matching variable are left
    /// verbatim.
    pub fn render(
        &self,
        key: &str,
        language: Language,
        vars: &HashMap<String, String>,
    ) -> Option<String> {
        let template = self.templates.get(key)?;
        Some(render_pattern(template.pattern(language), vars))
    }

    /// The message families shipped with the platform.
    pub fn builtin() -> Self {
        Self::new()
            .with(
                "weather_alert",
                Template::new("⚠️ ALERTE METEO FarmSMS: {message}. Parcelle: {parcelle}. Protégez vos cultures!")
                    .variant(Language::Bci, "⚠️ ALERTE: {message}. {parcelle} su. Aw nian aw djué!")
                    .variant(Language::Dyu, "⚠️ ALERTE: {message}. {parcelle} kɔnɔ. Aw ka sɛnɛ tanga!"),
            )
            .with(
                "disease_alert",
                Template::new("🦠 ALERTE MALADIE: {disease} détectée sur {parcelle}. Traitez avec: {treatment}")
                    .variant(Language::Bci, "🦠 MALADIE: {disease} {parcelle} su. Drogue: {treatment}")
                    .variant(Language::Dyu, "🦠 BANA: {disease} {parcelle} la. Fura: {treatment}"),
            )
            .with(
                "irrigation_alert",
                Template::new("💧 IRRIGATION: {parcelle} nécessite arrosage. Humidité sol: {humidity}%")
                    .variant(Language::Bci, "💧 ARROSAGE: {parcelle} klo su. Ji: {humidity}%")
                    .variant(Language::Dyu, "💧 JI: {parcelle} bɛ ji fɛ. Dugukolo jiidiya: {humidity}%"),
            )
            .with(
                "harvest_reminder",
                Template::new("🌾 RECOLTE: {culture} sur {parcelle} prête à récolter dans {days} jours")
                    .variant(Language::Bci, "🌾 RECOLTE: {culture} {parcelle} su ti {days} lé nun")
                    .variant(Language::Dyu, "🌾 SUMAN: {culture} {parcelle} kɔnɔ ka kan ka tigɛ tile {days} kɔnɔ"),
            )
            .with(
                "market_price",
                Template::new("💰 PRIX: {product} à {price} FCFA/{unit} au marché de {market}")
                    .variant(Language::Bci, "💰 SAN: {product} ti {price} FCFA/{unit} {market} su")
                    .variant(Language::Dyu, "💰 SƆNGƆ: {product} ye {price} FCFA/{unit} ye {market} la"),
            )
            .with(
                "welcome",
                Template::new("Bienvenue sur FarmSMS! Votre compte agriculteur est activé. Appelez le 1234 pour aide.")
                    .variant(Language::Bci, "Akwaba FarmSMS su! Aw compte ti kpa. Frapper 1234 aide ti.")
                    .variant(Language::Dyu, "Aw ni sɔgɔma FarmSMS! Aw ka jatebila dabɔra. 1234 wele dɛmɛ fɛ."),
            )
            .with(
                "otp",
                Template::new("Votre code FarmSMS: {code}. Valide 10 minutes. Ne partagez pas ce code.")
                    .variant(Language::Bci, "Aw FarmSMS code: {code}. Minute 10 kpa. Kan man fa sran be.")
                    .variant(Language::Dyu, "Aw ka FarmSMS kode: {code}. Miniti 10 kɔnɔ. Kana a di mɔgɔ ma."),
            )
            .with(
                "sensor_alert",
                Template::new("📊 CAPTEUR: {sensor} sur {parcelle} - {parameter}: {value}{unit} (seuil: {threshold})")
                    .variant(Language::Bci, "📊 CAPTEUR: {sensor} {parcelle} su - {parameter}: {value}{unit}")
                    .variant(Language::Dyu, "📊 FEERE: {sensor} {parcelle} la - {parameter}: {value}{unit}"),
            )
            .with(
                "training_reminder",
                Template::new("📚 FORMATION: '{title}' commence demain à {time}. Lieu: {location}")
                    .variant(Language::Bci, "📚 FORMATION: '{title}' ti siman {time}. Blo: {location}")
                    .variant(Language::Dyu, "📚 KALANKO: '{title}' bɛna daminɛ sini {time}. Yɔrɔ: {location}"),
            )
    }
}

/// Substitute `{name}` tokens in `pattern` from `vars`.
///
/// The token grammar is deliberately small: `{`, ASCII alphanumerics or
/// underscores, `}`. Anything else, including unmatched braces and tokens
/// without a corresponding variable, passes through untouched.
pub fn render_pattern(pattern: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail[1..].find(|c: char| c == '{' || c == '}') {
            Some(pos) if tail.as_bytes()[1 + pos] == b'}' => {
                let name = &tail[1..1 + pos];
                let is_token = !name.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                match vars.get(name) {
                    Some(value) if is_token => out.push_str(value),
                    _ => out.push_str(&tail[..pos + 2]),
                }
                rest = &tail[pos + 2..];
            }
            Some(pos) => {
                // A nested '{' before any '}': the prefix cannot be a token,
                // but the inner brace may still open one.
                out.push_str(&tail[..1 + pos]);
                rest = &tail[1 + pos..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
