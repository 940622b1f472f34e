use anyhow::{anyhow, Result};
use regex::Regex;
use std::env;

/// Expands `${NAME}` and `${NAME:-default}` references against the process environment.
pub fn expand_env(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-(.*?))?\}")?;
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let whole = caps
            .get(0)
            .ok_or_else(|| anyhow!("envsubst capture error"))?;
        let key = caps
            .get(1)
            .ok_or_else(|| anyhow!("envsubst capture error"))?
            .as_str();
        out.push_str(&input[last..whole.start()]);
        let value = match (env::var(key), caps.get(2)) {
            (Ok(v), _) => v,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => return Err(anyhow!("missing environment variable: {}", key)),
        };
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_yaml_untouched() {
        let raw = "cache:\n  compliance: strict\n";
        assert_eq!(expand_env(raw).unwrap(), raw);
    }

    #[test]
    fn substitutes_set_variable() {
        env::set_var("CPX_TEST_ENVSUBST_MODE", "lenient");
        let result = expand_env("compliance: ${CPX_TEST_ENVSUBST_MODE}").unwrap();
        env::remove_var("CPX_TEST_ENVSUBST_MODE");
        assert_eq!(result, "compliance: lenient");
    }

    #[test]
    fn falls_back_to_inline_default() {
        env::remove_var("CPX_TEST_ENVSUBST_TTL");
        let result = expand_env("default_ttl_secs: ${CPX_TEST_ENVSUBST_TTL:-300}").unwrap();
        assert_eq!(result, "default_ttl_secs: 300");
    }

    #[test]
    fn empty_default_is_allowed() {
        env::remove_var("CPX_TEST_ENVSUBST_EMPTY");
        let result = expand_env("[${CPX_TEST_ENVSUBST_EMPTY:-}]").unwrap();
        assert_eq!(result, "[]");
    }

    #[test]
    fn missing_variable_without_default_is_an_error() {
        env::remove_var("CPX_TEST_ENVSUBST_MISSING");
        let err = expand_env("${CPX_TEST_ENVSUBST_MISSING}").unwrap_err();
        assert!(err.to_string().contains("CPX_TEST_ENVSUBST_MISSING"));
    }

    #[test]
    fn expands_several_references_in_order() {
        env::set_var("CPX_TEST_ENVSUBST_LEVEL", "debug");
        env::set_var("CPX_TEST_ENVSUBST_FORMAT", "pretty");
        let result =
            expand_env("level=${CPX_TEST_ENVSUBST_LEVEL} format=${CPX_TEST_ENVSUBST_FORMAT};")
                .unwrap();
        env::remove_var("CPX_TEST_ENVSUBST_LEVEL");
        env::remove_var("CPX_TEST_ENVSUBST_FORMAT");
        assert_eq!(result, "level=debug format=pretty;");
    }
}
