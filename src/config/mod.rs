pub mod credentials;

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

pub fn required_var(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow!("{name} not set"))
}

pub fn optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {name}: {raw}"))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}
