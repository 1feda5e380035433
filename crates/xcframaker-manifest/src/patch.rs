//! Pure product rewrites.
//!
//! Patching never mutates its input: it returns a new manifest whose product
//! list differs from the original in exactly one entry.

use crate::error::{ManifestError, Result};
use crate::model::{LibraryLinkage, Manifest, Product, ProductType};

impl Product {
    /// A copy of this product with the given library linkage.
    ///
    /// Returns `None` when the product is not a library.
    pub fn with_linkage(&self, linkage: LibraryLinkage) -> Option<Product> {
        self.kind.linkage()?;
        Some(Product {
            name: self.name.clone(),
            kind: ProductType::library(linkage),
            targets: self.targets.clone(),
        })
    }
}

impl Manifest {
    /// A copy of this manifest where the library product `name` links
    /// dynamically. Every other product and every other field is unchanged.
    pub fn with_dynamic_library(&self, name: &str) -> Result<Manifest> {
        let found = self
            .product(name)
            .ok_or_else(|| ManifestError::ProductNotFound {
                name: name.to_string(),
                available: self.product_names().join(", "),
            })?;

        let replacement =
            found
                .with_linkage(LibraryLinkage::Dynamic)
                .ok_or_else(|| ManifestError::NotALibrary {
                    name: name.to_string(),
                    kind: found.kind.describe().to_string(),
                })?;

        let products = self
            .products
            .iter()
            .map(|p| {
                if p.name == name {
                    replacement.clone()
                } else {
                    p.clone()
                }
            })
            .collect();

        Ok(Manifest {
            products,
            ..self.clone()
        })
    }
}
