//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail gives each test its own working directory and a scrubbed
//! environment, so settings files and `ROUTE_LOCALES_*` variables created by
//! one test never leak into another.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// Jail failures, including errors returned by `f`, become
/// `anyhow::Error` values.
///
/// # Errors
///
/// Returns an error if the jail cannot be set up or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Writes a settings file named `name` into the jail's directory and returns
/// its path relative to that directory.
///
/// # Errors
///
/// Returns the jail's I/O error when the file cannot be written.
pub fn write_settings(
    jail: &mut figment::Jail,
    name: &str,
    contents: &str,
) -> figment::error::Result<PathBuf> {
    jail.create_file(name, contents)?;
    Ok(PathBuf::from(name))
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
///
/// Lets closures passed to [`with_jail`] propagate crate errors with `?`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "used as a map_err adapter, which hands over the error by value"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
