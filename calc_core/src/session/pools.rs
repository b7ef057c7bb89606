//! Problem pools bundled into the binary from `data/pools/`.

use log::info;
use rust_embed::Embed;

use super::problem::ProblemPool;
use crate::errors::{CalcError, CalcResult};

#[derive(Embed)]
#[folder = "data/pools/"]
struct PoolAssets;

/// Names of every embedded pool, sorted.
pub fn available_pools() -> Vec<String> {
    let mut names: Vec<String> = PoolAssets::iter()
        .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

/// Load and sanitize an embedded pool by name.
pub fn load_pool(name: &str) -> CalcResult<ProblemPool> {
    let file = PoolAssets::get(&format!("{}.toml", name)).ok_or_else(|| CalcError::pool_not_found(name))?;
    let content = std::str::from_utf8(file.data.as_ref())
        .map_err(|e| CalcError::malformed_pool(name, format!("not UTF-8: {}", e)))?;
    parse_pool(name, content)
}

/// Parse pool TOML. `name` overrides any name in the document.
pub fn parse_pool(name: &str, content: &str) -> CalcResult<ProblemPool> {
    let mut pool: ProblemPool = toml::from_str(content).map_err(|e| CalcError::malformed_pool(name, e.to_string()))?;
    pool.name = name.to_string();
    let pool = pool.sanitized();
    info!("loaded pool '{}' ({}, {} questions)", pool.name, pool.locale, pool.len());
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::problem::Locale;

    #[test]
    fn test_every_embedded_pool_loads() {
        let names = available_pools();
        assert!(names.len() >= 4);
        for name in names {
            let pool = load_pool(&name).unwrap();
            assert!(!pool.is_empty(), "{} is empty", name);
            assert!(!pool.title.is_empty());
        }
    }

    #[test]
    fn test_locales_covered() {
        let locales: Vec<Locale> = available_pools()
            .iter()
            .map(|n| load_pool(n).unwrap().locale)
            .collect();
        for locale in [Locale::Es, Locale::De, Locale::It, Locale::Pt] {
            assert!(locales.contains(&locale), "no pool for {}", locale);
        }
    }

    #[test]
    fn test_unknown_pool() {
        assert_eq!(load_pool("nope").unwrap_err().error_code(), "POOL_NOT_FOUND");
    }

    #[test]
    fn test_malformed_pool() {
        assert_eq!(parse_pool("bad", "title = ").unwrap_err().error_code(), "MALFORMED_POOL");
        assert_eq!(parse_pool("bad", "questions = []").unwrap_err().error_code(), "MALFORMED_POOL");
    }

    #[test]
    fn test_parse_sets_name_and_sanitizes() {
        let src = r#"
title = "Mini"
locale = "pt"

[[questions]]
id = "a"
prompt = "1 + 1?"
options = ["1", "2"]
correct = 1

[[questions]]
id = "b"
prompt = "broken"
options = ["only"]
correct = 0
"#;
        let pool = parse_pool("mini", src).unwrap();
        assert_eq!(pool.name, "mini");
        assert_eq!(pool.locale, Locale::Pt);
        assert_eq!(pool.len(), 1);
    }
}
