//! Help documents the similarity search runs over.
//!
//! The built-in reference corpus has four topics. A deployment can replace it
//! with a JSON array of `{ "topic": ..., "body": ... }` objects; order is kept
//! because it decides similarity ties.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{KbError, Result};

/// One help document before embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub topic: String,
    pub body: String,
}

impl CorpusEntry {
    pub fn new(topic: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            body: body.into(),
        }
    }
}

/// Ordered, non-empty set of documents with unique topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Validates and wraps `entries`.
    ///
    /// # Errors
    /// `KbError::Config` when empty, when a topic or body is blank, or when
    /// a topic repeats.
    pub fn new(entries: Vec<CorpusEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(KbError::Config("corpus has no documents".into()));
        }
        let mut seen = HashSet::new();
        for e in &entries {
            if e.topic.trim().is_empty() || e.body.trim().is_empty() {
                return Err(KbError::Config("corpus entry with blank topic or body".into()));
            }
            if !seen.insert(e.topic.as_str()) {
                return Err(KbError::Config(format!("duplicate topic: {}", e.topic)));
            }
        }
        Ok(Self { entries })
    }

    /// IT helpdesk manuals shipped with the bot.
    pub fn reference() -> Self {
        Self {
            entries: vec![
                CorpusEntry::new(
                    "correo",
                    "CONFIGURACIÓN DE CORREO ELECTRÓNICO EN OUTLOOK\n\
                     - Abrir Outlook\n\
                     - Ir a Archivo > Agregar cuenta\n\
                     - Ingresar correo y contraseña",
                ),
                CorpusEntry::new(
                    "red",
                    "CONFIGURACIÓN DE RED\n\
                     - Abrir Panel de control > Redes\n\
                     - Configurar adaptador\n\
                     - Verificar dirección IP",
                ),
                CorpusEntry::new(
                    "impresora",
                    "CONFIGURACIÓN DE IMPRESORA\n\
                     - Verificar el cable de red\n\
                     - Probar desconectar y volver a conectar el cable\n\
                     - Comprobar que el driver esté instalado",
                ),
                CorpusEntry::new(
                    "equipo",
                    "CONFIGURACIÓN DE EQUIPO DE CÓMPUTO\n\
                     - Cierra las ventanas que no estés utilizando\n\
                     - Prueba reiniciar el equipo",
                ),
            ],
        }
    }

    /// Loads a corpus from a JSON array file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading corpus");
        let raw = fs::read_to_string(path)?;
        let entries: Vec<CorpusEntry> = serde_json::from_str(&raw)?;
        let corpus = Self::new(entries)?;
        info!(path = %path.display(), documents = corpus.len(), "corpus loaded");
        Ok(corpus)
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reference_has_four_topics_in_order() {
        let topics: Vec<_> = Corpus::reference()
            .entries()
            .iter()
            .map(|e| e.topic.clone())
            .collect();
        assert_eq!(topics, ["correo", "red", "impresora", "equipo"]);
    }

    #[test]
    fn reference_bodies_keep_line_breaks() {
        let corpus = Corpus::reference();
        assert!(corpus.entries()[1].body.contains("\n- Verificar dirección IP"));
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert!(Corpus::new(vec![]).is_err());
        let dup = vec![CorpusEntry::new("a", "x"), CorpusEntry::new("a", "y")];
        assert!(Corpus::new(dup).is_err());
    }

    #[test]
    fn loads_json_file_preserving_order() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[{{"topic":"vpn","body":"Reinstala el cliente VPN"}},{{"topic":"audio","body":"Revisa el volumen"}}]"#
        )
        .unwrap();
        let corpus = Corpus::from_json_file(f.path()).unwrap();
        assert_eq!(corpus.entries()[0].topic, "vpn");
        assert_eq!(corpus.len(), 2);
    }
}
