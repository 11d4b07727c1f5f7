//! Keyword rules evaluated before similarity search.
//!
//! Rules are checked in list order against a trimmed, lower-cased copy of the
//! input using substring containment. The first rule with any keyword present
//! wins, so the connectivity rule must stay first.

use serde::Serialize;

/// Guided multi-step diagnostic branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidedTopic {
    /// Lost network/internet connection: asks cable vs wifi.
    Connectivity,
}

/// What a rule produces when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    GuidedFlow(GuidedTopic),
    DirectAnswer(String),
}

/// Named keyword rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub name: &'static str,
    pub keywords: Vec<&'static str>,
    pub action: RuleAction,
}

impl KeywordRule {
    /// True when any keyword occurs in `normalized`.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }
}

/// Trimmed, lower-cased copy used for every keyword comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First rule matching `text`, in priority order.
pub fn first_match<'r>(rules: &'r [KeywordRule], text: &str) -> Option<&'r KeywordRule> {
    let normalized = normalize(text);
    rules.iter().find(|r| r.matches(&normalized))
}

/// Network loss, email, printer, device performance; in that order.
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule {
            name: "network",
            keywords: vec!["no tengo red", "sin red", "no hay internet", "internet", "red"],
            action: RuleAction::GuidedFlow(GuidedTopic::Connectivity),
        },
        KeywordRule {
            name: "email",
            keywords: vec!["correo", "outlook", "email", "e-mail"],
            action: RuleAction::DirectAnswer(
                "👉 Verifica que el correo y la contraseña sean correctos.\n\
                 👉 Si no puedes enviar, revisa configuración SMTP.\n\
                 👉 Si no puedes recibir, revisa IMAP/POP3 y el espacio en el buzón."
                    .to_string(),
            ),
        },
        KeywordRule {
            name: "printer",
            keywords: vec!["impresora", "printer"],
            action: RuleAction::DirectAnswer(
                "👉 ¿La impresora está conectada por cable o WiFi?\n\
                 - Cable: revisa el USB/Red y reinstala driver.\n\
                 - WiFi: asegúrate de que esté en la misma red que tu PC."
                    .to_string(),
            ),
        },
        KeywordRule {
            name: "device",
            keywords: vec!["equipo", "computadora", "pc", "lento", "se congela"],
            action: RuleAction::DirectAnswer(
                "👉 ¿El equipo no responde o está lento?\n\
                 - Cierra las ventanas que no estés utilizando.\n\
                 - Prueba reiniciar el equipo."
                    .to_string(),
            ),
        },
    ]
}
