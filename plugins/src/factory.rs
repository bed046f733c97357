use std::sync::Arc;

use anyhow::Result;

use sqlload_core::executor::{DriverRegistry, OutputRendererPlugin};

use crate::driver::SqliteDriver;
use crate::executor::{JsonlRendererPlugin, TextRendererPlugin};

/// Registry holding every driver built into this binary.
pub fn build_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new();
    registry.register(Arc::new(SqliteDriver::new()));
    registry
}

pub fn build_renderer(format: &str) -> Result<Arc<dyn OutputRendererPlugin>> {
    match format {
        "text" => Ok(Arc::new(TextRendererPlugin::new(false))),
        "ascii" => Ok(Arc::new(TextRendererPlugin::new(true))),
        "jsonl" => Ok(Arc::new(JsonlRendererPlugin::new())),
        other => anyhow::bail!("unknown output format '{other}' (expected text, ascii or jsonl)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_sqlite_aliases() {
        let registry = build_registry();
        for id in ["sqlite", "SQLite3", "org.sqlite.JDBC"] {
            assert_eq!(registry.resolve(id).unwrap().name(), "sqlite");
        }
        assert!(registry.resolve("com.ibm.db2.jcc.DB2Driver").is_err());
    }

    #[test]
    fn renderer_formats() {
        assert_eq!(build_renderer("jsonl").unwrap().format(), "jsonl");
        assert_eq!(build_renderer("text").unwrap().format(), "text");
        assert!(build_renderer("xml").is_err());
    }
}
