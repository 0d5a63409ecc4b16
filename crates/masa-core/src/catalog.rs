//! # Catalog
//!
//! Product metadata and the step that turns a product-page selection into
//! an [`ItemSpec`].
//!
//! ## Add-to-Cart Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product page                                                           │
//! │   color swatch ──┐                                                      │
//! │   size button ───┼──► Selection ──► Catalog::resolve ──► ItemSpec ──►   │
//! │                  │                      │                 CartStore     │
//! │                  │                      ├─ product exists?              │
//! │                  │                      ├─ color exists & in stock?     │
//! │                  │                      └─ sized? size chosen &         │
//! │                  │                         available? freeze dimensions │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ItemSpec;

/// Hex used when a selection has no resolvable color swatch.
pub const FALLBACK_COLOR_HEX: &str = "#000";

// =============================================================================
// Catalog Types
// =============================================================================

/// A color a product comes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
    pub image: String,
    #[serde(default, rename = "outofstock")]
    pub out_of_stock: bool,
}

/// A size label with its fitting guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SizeOption {
    /// Label shown on the size button, e.g. `"2"`.
    pub number: String,
    /// Free-text guidance, e.g. weight range.
    pub dimensions: String,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

/// Catalog entry for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub name: String,
    #[serde(rename = "nameItemInStorage")]
    pub internal_name: String,
    #[serde(default)]
    pub description: String,
    /// Display price, e.g. `"15.00 د.أ"`.
    pub price: String,
    #[serde(default)]
    pub category: String,
    pub colors: Vec<ColorOption>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
}

impl Product {
    /// Price through the single price parser.
    pub fn price_money(&self) -> Money {
        Money::parse_display(&self.price)
    }

    /// Whether a size must be picked before adding to cart.
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Looks up a size by its label.
    pub fn size(&self, number: &str) -> Option<&SizeOption> {
        self.sizes.iter().find(|s| s.number == number)
    }
}

/// Catalog file row: `{ "id": "product1", ...product }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(flatten)]
    pub product: Product,
}

// =============================================================================
// Selection
// =============================================================================

/// How the product page identifies the chosen color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorChoice {
    /// Position in `Product::colors` (the swatch index).
    Index(usize),
    /// Color label.
    Name(String),
}

impl ColorChoice {
    /// Parses CLI-style input: a number is an index, anything else a name.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<usize>() {
            Ok(index) => ColorChoice::Index(index),
            Err(_) => ColorChoice::Name(input.trim().to_string()),
        }
    }
}

/// The state of a product page when the shopper taps "add to cart".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub product_id: String,
    pub color: ColorChoice,
    pub size: Option<String>,
    /// Optimized image the page already rendered for this color.
    pub image_override: Option<String>,
}

impl Selection {
    /// Selection of the given color with no size picked yet.
    pub fn new(product_id: impl Into<String>, color: ColorChoice) -> Self {
        Selection {
            product_id: product_id.into(),
            color,
            size: None,
            image_override: None,
        }
    }

    /// Picks a size.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Products keyed by id, in listing order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from entries. Later duplicates of an id are ignored.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Catalog::default();
        for entry in entries {
            if catalog.get(&entry.id).is_none() {
                catalog.entries.push(entry);
            }
        }
        catalog
    }

    /// Parses a catalog from a JSON array of [`CatalogEntry`].
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        Ok(Catalog::new(entries))
    }

    /// Looks up a product by id.
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.entries
            .iter()
            .find(|e| e.id == product_id)
            .map(|e| &e.product)
    }

    /// Iterates `(id, product)` in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Product)> {
        self.entries.iter().map(|e| (e.id.as_str(), &e.product))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a product-page selection into the spec handed to the cart.
    ///
    /// ## Rules
    /// - Product must exist
    /// - Color must exist and be in stock
    /// - Sized product: a size must be chosen, exist and be available; its
    ///   guidance text is frozen into the spec
    /// - Unsized product: any chosen size is ignored, spec size is empty
    /// - Image: page override, else color image, else first color image
    pub fn resolve(&self, selection: &Selection) -> CoreResult<ItemSpec> {
        let product_id = selection.product_id.as_str();
        let product = self
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let color = match &selection.color {
            ColorChoice::Index(index) => product.colors.get(*index),
            ColorChoice::Name(name) => product.colors.iter().find(|c| &c.name == name),
        }
        .ok_or_else(|| CoreError::ColorNotFound {
            product_id: product_id.to_string(),
            color: match &selection.color {
                ColorChoice::Index(index) => index.to_string(),
                ColorChoice::Name(name) => name.clone(),
            },
        })?;

        if color.out_of_stock {
            return Err(CoreError::ColorUnavailable {
                product_id: product_id.to_string(),
                color: color.name.clone(),
            });
        }

        let (size, size_dimensions) = if product.requires_size() {
            let chosen = selection
                .size
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| CoreError::SizeRequired {
                    product_id: product_id.to_string(),
                })?;
            let option = product.size(chosen).ok_or_else(|| CoreError::SizeNotFound {
                product_id: product_id.to_string(),
                size: chosen.to_string(),
            })?;
            if !option.available {
                return Err(CoreError::SizeUnavailable {
                    product_id: product_id.to_string(),
                    size: chosen.to_string(),
                });
            }
            (option.number.clone(), Some(option.dimensions.clone()))
        } else {
            (String::new(), None)
        };

        let image = selection
            .image_override
            .clone()
            .filter(|i| !i.is_empty())
            .or_else(|| Some(color.image.clone()).filter(|i| !i.is_empty()))
            .or_else(|| product.colors.first().map(|c| c.image.clone()))
            .unwrap_or_default();

        let color_hex = if color.hex.is_empty() {
            FALLBACK_COLOR_HEX.to_string()
        } else {
            color.hex.clone()
        };

        Ok(ItemSpec {
            product_id: product_id.to_string(),
            product_name: product.name.clone(),
            internal_name: product.internal_name.clone(),
            color_name: color.name.clone(),
            color_hex,
            size,
            size_dimensions,
            unit_price: product.price.clone(),
            image,
        })
    }

    /// The storefront's built-in product list.
    pub fn builtin() -> Self {
        let entry = |id: &str, product: Product| CatalogEntry {
            id: id.to_string(),
            product,
        };
        let winter = "قسم العبايات الشتوية";
        let warranty = "نوفر ضمان ما بعد البيع لراحتك، مع خدمة توصيل سريعة إلى جميع المحافظات، لتصلك العباية بكل أمان وسهولة.";

        Catalog::new(vec![
            entry(
                "product1",
                Product {
                    name: "عباية مخمل شتوي".to_string(),
                    internal_name: "عباية مخمل ابو خط القديم".to_string(),
                    description: "عباية مخمل شتوي ثقيل، ناعمة وراقية، تعطيك إحساس بالدفء مع إطلالة أنيقة تناسب الشتاء والمناسبات اليومية.".to_string(),
                    price: "15.00 د.أ".to_string(),
                    category: winter.to_string(),
                    colors: vec![
                        color("زيتي", "#949A84", "/products/product_1/1.png"),
                        color("كحلي", "#34364B", "/products/product_1/2.png"),
                        color("زهري", "#B47169", "/products/product_1/3.png"),
                        color("أسود", "#000000", "/products/product_1/4.jpg"),
                        color("تركواز", "#5788A8", "/products/product_1/5.jpg"),
                    ],
                    sizes: weight_sizes(),
                },
            ),
            entry(
                "product3",
                Product {
                    name: "عباية مخمل شتوي فاخر".to_string(),
                    internal_name: "عباية مخمل ابو الحط الجديد".to_string(),
                    description: warranty.to_string(),
                    price: "15.00 د.أ".to_string(),
                    category: winter.to_string(),
                    colors: vec![
                        color("كحلي", "#13253F", "/products/product_3/1oneline.jpg"),
                        color("أسود", "#000000", "/products/product_3/2oneline.jpg"),
                        color("زيتي", "#949A84", "/products/product_3/3oneline.jpg"),
                    ],
                    sizes: weight_sizes(),
                },
            ),
            entry(
                "product4",
                Product {
                    name: "عباية مخمل شتوي فاخر".to_string(),
                    internal_name: "عباية مخمل التطريز من فوق".to_string(),
                    description: warranty.to_string(),
                    price: "15.00 د.أ".to_string(),
                    category: winter.to_string(),
                    colors: vec![
                        color("موفي", "#2F1D3A", "/products/product_4/3.png"),
                        color("سكري", "#F8F0EB", "/products/product_4/4.png"),
                        color("أسود", "#000000", "/products/product_4/5.png"),
                        color("كحلي", "#1D2951", "/products/product_4/2.png"),
                        color("تركواز", "#004C74", "/products/product_4/1.png"),
                    ],
                    sizes: weight_sizes(),
                },
            ),
            entry(
                "product5",
                Product {
                    name: "مطرزات شتوي فاخر".to_string(),
                    internal_name: "مطرزات شتوي فاخر جيب".to_string(),
                    description: warranty.to_string(),
                    price: "21.99 د.أ".to_string(),
                    category: winter.to_string(),
                    colors: vec![
                        color("الوان مخلطة", "#F54025", "/products/product_5/1.png"),
                        color("الوان مخلطة", "#FA36A1", "/products/product_5/2.png"),
                        color("أبيض", "#E9E9F8", "/products/product_5/3.png"),
                        color("زيتي", "#7E8021", "/products/product_5/4.png"),
                        color("أسود", "#000000", "/products/product_5/5.png"),
                    ],
                    sizes: weight_sizes(),
                },
            ),
            entry(
                "product6",
                Product {
                    name: "عباية مخمل شتوي فاخر جيب".to_string(),
                    internal_name: "عباية مخمل شتوي جيب".to_string(),
                    description: warranty.to_string(),
                    price: "15 د.أ".to_string(),
                    category: winter.to_string(),
                    colors: vec![
                        color("أسود", "#000000", "/products/product_6/1.jpg"),
                        color("كحلي", "#434966", "/products/product_6/2.jpg"),
                        color("تركواز", "#103A4A", "/products/product_6/3.jpg"),
                        color("توتي", "#4A3149", "/products/product_6/4.jpg"),
                    ],
                    sizes: weight_sizes(),
                },
            ),
            entry(
                "product2",
                Product {
                    name: "فستان صوف شتوي فاخرة تصميم".to_string(),
                    internal_name: "فستان صوف تايغر".to_string(),
                    description: "مصنوعة من صوف تريكو عالي الجودة، تمنحك راحة تامة أثناء اللبس، مع قصّة مريحة تناسب مختلف الأذواق.".to_string(),
                    price: "17.00 د.أ".to_string(),
                    category: "قسم فساتين الصوف الشتوية".to_string(),
                    colors: vec![
                        color("بيج", "#DABFAC", "/products/product_2/1.png"),
                        color("رمادي", "#656569", "/products/product_2/2.png"),
                        color("بيج غامق", "#7B5750", "/products/product_2/3.png"),
                    ],
                    sizes: Vec::new(),
                },
            ),
        ])
    }
}

fn color(name: &str, hex: &str, image: &str) -> ColorOption {
    ColorOption {
        name: name.to_string(),
        hex: hex.to_string(),
        image: image.to_string(),
        out_of_stock: false,
    }
}

/// The three weight-based sizes every abaya ships in.
fn weight_sizes() -> Vec<SizeOption> {
    [
        ("1", "بيلبس من وزن 60 كيلو الى وزن 80"),
        ("2", "بيلبس من وزن 80 كيلو الى وزن 100"),
        ("3", "بيلبس من وزن 100 كيلو الى وزن 120"),
    ]
    .into_iter()
    .map(|(number, dimensions)| SizeOption {
        number: number.to_string(),
        dimensions: dimensions.to_string(),
        available: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.iter().next().map(|(id, _)| id), Some("product1"));
        assert_eq!(
            catalog.get("product5").map(|p| p.price_money().cents()),
            Some(2199)
        );
        assert!(!catalog.get("product2").map(Product::requires_size).unwrap_or(true));
    }

    #[test]
    fn test_resolve_sized_product_freezes_dimensions() {
        let catalog = Catalog::builtin();
        let spec = catalog
            .resolve(&Selection::new("product1", ColorChoice::Index(1)).with_size("2"))
            .unwrap();

        assert_eq!(spec.color_name, "كحلي");
        assert_eq!(spec.color_hex, "#34364B");
        assert_eq!(spec.size, "2");
        assert_eq!(
            spec.size_dimensions.as_deref(),
            Some("بيلبس من وزن 80 كيلو الى وزن 100")
        );
        assert_eq!(spec.internal_name, "عباية مخمل ابو خط القديم");
        assert_eq!(spec.image, "/products/product_1/2.png");
        assert_eq!(spec.unit_price, "15.00 د.أ");
    }

    #[test]
    fn test_resolve_requires_size() {
        let catalog = Catalog::builtin();
        let err = catalog
            .resolve(&Selection::new("product1", ColorChoice::Index(0)))
            .unwrap_err();
        assert!(matches!(err, CoreError::SizeRequired { .. }));

        let err = catalog
            .resolve(&Selection::new("product1", ColorChoice::Index(0)).with_size("  "))
            .unwrap_err();
        assert!(matches!(err, CoreError::SizeRequired { .. }));
    }

    #[test]
    fn test_resolve_unsized_product_ignores_size() {
        let catalog = Catalog::builtin();
        let spec = catalog
            .resolve(
                &Selection::new("product2", ColorChoice::Name("رمادي".to_string()))
                    .with_size("9"),
            )
            .unwrap();
        assert_eq!(spec.size, "");
        assert_eq!(spec.size_dimensions, None);
    }

    #[test]
    fn test_resolve_errors() {
        let catalog = Catalog::builtin();
        assert!(matches!(
            catalog.resolve(&Selection::new("nope", ColorChoice::Index(0))),
            Err(CoreError::ProductNotFound(_))
        ));
        assert!(matches!(
            catalog.resolve(&Selection::new("product2", ColorChoice::Index(7))),
            Err(CoreError::ColorNotFound { .. })
        ));
        assert!(matches!(
            catalog.resolve(&Selection::new("product1", ColorChoice::Index(0)).with_size("4")),
            Err(CoreError::SizeNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_respects_stock_flags() {
        let json = r##"[{
            "id": "p",
            "name": "Test",
            "nameItemInStorage": "Test stock",
            "price": "5.00",
            "colors": [
                {"name": "red", "hex": "", "image": "", "outofstock": true},
                {"name": "blue", "hex": "", "image": ""}
            ],
            "sizes": [{"number": "1", "dimensions": "S", "available": false}]
        }]"##;
        let catalog = Catalog::from_json(json).unwrap();

        assert!(matches!(
            catalog.resolve(&Selection::new("p", ColorChoice::Index(0)).with_size("1")),
            Err(CoreError::ColorUnavailable { .. })
        ));
        assert!(matches!(
            catalog.resolve(&Selection::new("p", ColorChoice::Index(1)).with_size("1")),
            Err(CoreError::SizeUnavailable { .. })
        ));
    }

    #[test]
    fn test_resolve_fallbacks() {
        let json = r##"[{
            "id": "p",
            "name": "Test",
            "nameItemInStorage": "Test stock",
            "price": "5.00",
            "colors": [
                {"name": "red", "hex": "#f00", "image": "/red.png"},
                {"name": "plain", "hex": "", "image": ""}
            ]
        }]"##;
        let catalog = Catalog::from_json(json).unwrap();
        let spec = catalog
            .resolve(&Selection::new("p", ColorChoice::Index(1)))
            .unwrap();
        assert_eq!(spec.color_hex, FALLBACK_COLOR_HEX);
        assert_eq!(spec.image, "/red.png");

        let mut selection = Selection::new("p", ColorChoice::Index(0));
        selection.image_override = Some("/optimized/red.webp".to_string());
        assert_eq!(catalog.resolve(&selection).unwrap().image, "/optimized/red.webp");
    }

    #[test]
    fn test_color_choice_parse() {
        assert_eq!(ColorChoice::parse("2"), ColorChoice::Index(2));
        assert_eq!(
            ColorChoice::parse(" أسود "),
            ColorChoice::Name("أسود".to_string())
        );
    }

    #[test]
    fn test_invalid_catalog_json() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CoreError::InvalidCatalog(_))
        ));
    }
}
