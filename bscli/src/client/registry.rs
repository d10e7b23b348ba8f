//! Registry endpoints

use super::{segment, BrightSignClient};
use anyhow::Result;
use brightsign_core::{Method, RecoveryUrl, RegistryValue, RequestBody};
use serde::Serialize;
use serde_json::Value;

fn key_path(section: &str, key: &str) -> String {
    format!("/registry/{}/{}/", segment(section), segment(key))
}

/// One registry value found by [`BrightSignClient::registry_search`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryMatch {
    pub section: String,
    pub key: String,
    pub value: String,
}

/// Entries of a registry dump whose section, key or value contains `term`,
/// ignoring case. Non-object sections are skipped.
pub(crate) fn search_registry(dump: &Value, term: &str) -> Vec<RegistryMatch> {
    let term = term.to_lowercase();
    let Some(sections) = dump.as_object() else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    for (section, entries) in sections {
        let Some(entries) = entries.as_object() else {
            continue;
        };
        let section_hit = section.to_lowercase().contains(&term);
        for (key, value) in entries {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if section_hit
                || key.to_lowercase().contains(&term)
                || value.to_lowercase().contains(&term)
            {
                matches.push(RegistryMatch {
                    section: section.clone(),
                    key: key.clone(),
                    value,
                });
            }
        }
    }
    matches
}

impl BrightSignClient {
    /// Dump every registry section
    pub async fn registry_dump(&self) -> Result<serde_json::Value> {
        self.get_result("/registry/").await
    }

    /// Search every section for `term` in the section name, key or value
    pub async fn registry_search(&self, term: &str) -> Result<Vec<RegistryMatch>> {
        let dump = self.registry_dump().await?;
        Ok(search_registry(&dump, term))
    }

    pub async fn registry_get(&self, section: &str, key: &str) -> Result<String> {
        let value: RegistryValue = self.get_result(&key_path(section, key)).await?;
        Ok(value.value)
    }

    /// Create or update a value
    pub async fn registry_set(&self, section: &str, key: &str, value: &str) -> Result<()> {
        let body = RequestBody::json(&RegistryValue {
            value: value.to_string(),
        })?;
        self.send_unit(Method::Put, &key_path(section, key), body)
            .await
    }

    pub async fn registry_delete(&self, section: &str, key: &str) -> Result<()> {
        self.send_unit(Method::Delete, &key_path(section, key), RequestBody::Empty)
            .await
    }

    pub async fn registry_delete_section(&self, section: &str) -> Result<()> {
        let path = format!("/registry/{}/", segment(section));
        self.send_unit(Method::Delete, &path, RequestBody::Empty)
            .await
    }

    pub async fn get_recovery_url(&self) -> Result<String> {
        let url: RecoveryUrl = self.get_result("/registry/recovery_url/").await?;
        Ok(url.url)
    }

    pub async fn set_recovery_url(&self, url: &str) -> Result<()> {
        let body = RequestBody::json(&RecoveryUrl {
            url: url.to_string(),
        })?;
        self.send_unit(Method::Put, "/registry/recovery_url/", body)
            .await
    }

    /// Write pending registry changes to persistent storage
    pub async fn registry_flush(&self) -> Result<()> {
        self.send_unit(Method::Put, "/registry/flush/", RequestBody::Empty)
            .await
    }
}
