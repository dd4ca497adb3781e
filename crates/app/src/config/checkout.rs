//! Checkout Config

use std::path::PathBuf;

use clap::Args;
use posy::prelude::*;
use rust_decimal::Decimal;
use tokio::fs;

use crate::config::ConfigError;

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Delivery fee in roubles, waived by free-delivery promo codes
    #[arg(long, env = "POSY_DELIVERY_FEE", default_value_t = DEFAULT_DELIVERY_FEE)]
    pub delivery_fee: Decimal,

    /// Directory the checkout contact is remembered in
    #[arg(long, env = "POSY_STORAGE_DIR", default_value = ".posy")]
    pub storage_dir: PathBuf,

    /// YAML file replacing the built-in city alias table
    #[arg(long, env = "POSY_CITY_ALIASES")]
    pub city_aliases: Option<PathBuf>,
}

impl CheckoutArgs {
    /// The configured delivery fee.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NegativeFee`] for a negative fee.
    pub fn delivery_fee(&self) -> Result<Decimal, ConfigError> {
        if self.delivery_fee < Decimal::ZERO {
            return Err(ConfigError::NegativeFee(self.delivery_fee));
        }

        Ok(self.delivery_fee)
    }

    /// The alias table: the configured file when given, the built-in one
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub async fn load_aliases(&self) -> Result<CityAliases, ConfigError> {
        let Some(path) = &self.city_aliases else {
            return Ok(CityAliases::builtin());
        };

        let yaml = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::AliasFile {
                path: path.clone(),
                source,
            })?;

        Ok(CityAliases::from_yaml(&yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn args(city_aliases: Option<PathBuf>) -> CheckoutArgs {
        CheckoutArgs {
            delivery_fee: DEFAULT_DELIVERY_FEE,
            storage_dir: PathBuf::from(".posy"),
            city_aliases,
        }
    }

    #[tokio::test]
    async fn builtin_table_without_file() -> TestResult {
        let aliases = args(None).load_aliases().await?;

        assert!(aliases.matches("СПб, Невский 1", "Санкт-Петербург"));

        Ok(())
    }

    #[tokio::test]
    async fn table_loads_from_yaml_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cities.yaml");

        fs::write(&path, "Казань: [Kazan]\n").await?;

        let aliases = args(Some(path)).load_aliases().await?;

        assert!(aliases.matches("Kazan, Baumana 5", "Казань"));
        assert!(!aliases.matches("СПб, Невский 1", "Санкт-Петербург"));

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_its_path() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("absent.yaml");

        let error = args(Some(path.clone()))
            .load_aliases()
            .await
            .err()
            .ok_or("load should fail")?;

        assert!(matches!(error, ConfigError::AliasFile { path: p, .. } if p == path));

        Ok(())
    }

    #[test]
    fn negative_fee_is_rejected() {
        let mut args = args(None);
        args.delivery_fee = Decimal::from(-1);

        assert!(matches!(
            args.delivery_fee(),
            Err(ConfigError::NegativeFee(_))
        ));
    }
}
