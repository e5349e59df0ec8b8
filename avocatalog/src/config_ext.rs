//! Extension pour intégrer le catalogue dans avoconfig
//!
//! Ce module fournit le trait `CatalogConfigExt` qui ajoute à
//! `avoconfig::Config` la lecture de la section `catalog` sous forme d'un
//! [`CatalogSettings`] explicite, transmis ensuite à chaque composant.
//!
//! # Exemple
//!
//! ```no_run
//! use avoconfig::get_config;
//! use avocatalog::CatalogConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//!
//! if !config.get_catalog_enabled()? {
//!     println!("Catalog is disabled");
//!     return Ok(());
//! }
//!
//! let settings = config.get_catalog_settings()?;
//! println!("{} recordings per page", settings.api.items_per_page);
//! # Ok(())
//! # }
//! ```

use crate::settings::CatalogSettings;
use anyhow::Result;
use avoconfig::Config;
use serde_yaml::Value;

/// Trait d'extension pour gérer la configuration du catalogue dans avoconfig
///
/// # Auto-persist des valeurs par défaut
///
/// Les getters persistent automatiquement les valeurs par défaut dans la
/// configuration si elles n'existent pas encore.
pub trait CatalogConfigExt {
    /// Vérifie si le catalogue est activé (défaut : `true`)
    fn get_catalog_enabled(&self) -> Result<bool>;

    /// Active ou désactive le catalogue
    fn set_catalog_enabled(&self, enabled: bool) -> Result<()>;

    /// Lit la section `catalog` complète
    ///
    /// Les clés absentes prennent leur valeur par défaut.
    fn get_catalog_settings(&self) -> Result<CatalogSettings>;

    /// Remplace la section `catalog` (hors `enabled`)
    fn set_catalog_settings(&self, settings: &CatalogSettings) -> Result<()>;

    /// Récupère le nombre d'enregistrements par page
    fn get_catalog_items_per_page(&self) -> Result<u32>;

    /// Définit le nombre d'enregistrements par page
    fn set_catalog_items_per_page(&self, per_page: u32) -> Result<()>;
}

impl CatalogConfigExt for Config {
    fn get_catalog_enabled(&self) -> Result<bool> {
        match self.get_value(&["catalog", "enabled"]) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_catalog_enabled(true)?;
                Ok(true)
            }
        }
    }

    fn set_catalog_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(&["catalog", "enabled"], Value::Bool(enabled))
    }

    fn get_catalog_settings(&self) -> Result<CatalogSettings> {
        let value = match self.get_value(&["catalog"]) {
            Ok(value) => value,
            Err(_) => {
                let defaults = CatalogSettings::default();
                self.set_catalog_settings(&defaults)?;
                return Ok(defaults);
            }
        };

        // `enabled` vit à côté des sous-sections, serde l'ignore
        let settings: CatalogSettings = serde_yaml::from_value(value)?;
        Ok(settings)
    }

    fn set_catalog_settings(&self, settings: &CatalogSettings) -> Result<()> {
        let Value::Mapping(sections) = serde_yaml::to_value(settings)? else {
            anyhow::bail!("catalog settings did not serialize to a mapping");
        };

        for (key, value) in sections {
            if let Value::String(name) = key {
                self.set_value(&["catalog", name.as_str()], value)?;
            }
        }
        Ok(())
    }

    fn get_catalog_items_per_page(&self) -> Result<u32> {
        let configured = match self.get_value(&["catalog", "api", "items_per_page"]) {
            Ok(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0),
            _ => None,
        };

        match configured {
            Some(per_page) => Ok(per_page),
            None => {
                let default = crate::settings::DEFAULT_ITEMS_PER_PAGE;
                self.set_catalog_items_per_page(default)?;
                Ok(default)
            }
        }
    }

    fn set_catalog_items_per_page(&self, per_page: u32) -> Result<()> {
        self.set_value(
            &["catalog", "api", "items_per_page"],
            Value::Number(per_page.into()),
        )
    }
}
