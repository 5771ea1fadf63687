//! Template and font asset loading
//!
//! Templates resolve by `{productId}_{monthly|yearly}.pdf` with a fallback
//! to the generic `{monthly|yearly}_template.pdf`. A lookup miss on the
//! product-specific file is expected and only logged; a miss on the fallback
//! (or the font) is a deployment problem and fails the request. Loaded bytes
//! are immutable, so they are cached process-wide.

use crate::model::{PaymentMethod, Product};
use crate::{FormError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, warn};

/// Supplies template and font bytes for one generation request
pub trait AssetSource {
    fn template_bytes(&self, product: Product, cadence: PaymentMethod) -> Result<Arc<Vec<u8>>>;
    fn font_bytes(&self) -> Result<Arc<Vec<u8>>>;
}

/// Disk-backed asset source with a process-wide byte cache
pub struct DirAssets {
    template_dir: PathBuf,
    font_path: PathBuf,
    template_cache: Mutex<HashMap<(Product, bool), Arc<Vec<u8>>>>,
    font_cache: OnceLock<Arc<Vec<u8>>>,
}

impl DirAssets {
    pub fn new(template_dir: impl Into<PathBuf>, font_path: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            font_path: font_path.into(),
            template_cache: Mutex::new(HashMap::new()),
            font_cache: OnceLock::new(),
        }
    }

    fn cadence_suffix(cadence: PaymentMethod) -> &'static str {
        if cadence.is_yearly() {
            "yearly"
        } else {
            "monthly"
        }
    }

    fn load_template(&self, product: Product, cadence: PaymentMethod) -> Result<Vec<u8>> {
        let suffix = Self::cadence_suffix(cadence);

        let specific = self
            .template_dir
            .join(format!("{}_{suffix}.pdf", product.id()));
        match std::fs::read(&specific) {
            Ok(bytes) => {
                debug!(template = %specific.display(), "loaded product template");
                return Ok(bytes);
            }
            Err(e) => {
                warn!(
                    template = %specific.display(),
                    error = %e,
                    "product template missing, using generic template"
                );
            }
        }

        let fallback = self.template_dir.join(format!("{suffix}_template.pdf"));
        std::fs::read(&fallback).map_err(|e| {
            FormError::Configuration(format!(
                "no template for {} ({suffix}): {} ({e})",
                product.id(),
                fallback.display()
            ))
        })
    }
}

impl AssetSource for DirAssets {
    fn template_bytes(&self, product: Product, cadence: PaymentMethod) -> Result<Arc<Vec<u8>>> {
        let key = (product, cadence.is_yearly());

        if let Ok(cache) = self.template_cache.lock() {
            if let Some(bytes) = cache.get(&key) {
                return Ok(Arc::clone(bytes));
            }
        }

        let bytes = Arc::new(self.load_template(product, cadence)?);

        if let Ok(mut cache) = self.template_cache.lock() {
            cache.insert(key, Arc::clone(&bytes));
        }

        Ok(bytes)
    }

    fn font_bytes(&self) -> Result<Arc<Vec<u8>>> {
        if let Some(bytes) = self.font_cache.get() {
            return Ok(Arc::clone(bytes));
        }

        let bytes = Arc::new(std::fs::read(&self.font_path).map_err(|e| {
            FormError::Configuration(format!(
                "font not readable: {} ({e})",
                self.font_path.display()
            ))
        })?);

        Ok(Arc::clone(self.font_cache.get_or_init(|| bytes)))
    }
}
