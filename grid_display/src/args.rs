// args.rs - Command line flags

use std::time::Duration;

use anyhow::{Context, bail};
use conway::{EngineConfig, Reporting};

/// Reads `--size N`, `--interval MS`, `--seed N` and `--snapshots` on top of
/// the engine defaults.
pub fn parse_args<I>(args: I) -> anyhow::Result<EngineConfig>
where
    I: IntoIterator<Item = String>,
{
    let mut config = EngineConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--size" => {
                let size: usize = value(&mut args, "--size")?;
                if !config.bounds.contains(size) {
                    bail!("--size must be between {} and {}", config.bounds.min, config.bounds.max);
                }
                config.default_size = size;
            }
            "--interval" => {
                let ms: u64 = value(&mut args, "--interval")?;
                config.default_interval = Duration::from_millis(ms.max(1));
            }
            "--seed" => config.seed = Some(value(&mut args, "--seed")?),
            "--snapshots" => config.reporting = Reporting::Snapshot,
            other => bail!("unknown argument {other}"),
        }
    }

    Ok(config)
}

fn value<T, I>(args: &mut I, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    I: Iterator<Item = String>,
{
    let raw = args.next().with_context(|| format!("{flag} needs a value"))?;
    raw.parse().with_context(|| format!("invalid value for {flag}: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<EngineConfig> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.default_size, 25);
        assert_eq!(config.reporting, Reporting::Delta);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&["--size", "40", "--interval", "0", "--seed", "9", "--SNAPSHOTS"]).unwrap();
        assert_eq!(config.default_size, 40);
        assert_eq!(config.default_interval, Duration::from_millis(1));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.reporting, Reporting::Snapshot);
    }

    #[test]
    fn bad_flags_are_reported() {
        assert!(parse(&["--size"]).is_err());
        assert!(parse(&["--size", "4"]).is_err());
        assert!(parse(&["--interval", "soon"]).is_err());
        assert!(parse(&["--fullscreen"]).is_err());
    }
}
