//! # Order Outbox
//!
//! The shell's order channel. Instead of opening a chat app, each
//! handed-off order is recorded as a JSON file under `orders/`, named so
//! that a directory listing sorts by time.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use masa_core::CheckoutSnapshot;
use masa_storage::OrderHandoff;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// A recorded order as written to disk.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord<'a> {
    order_id: Uuid,
    created_at: DateTime<Utc>,
    /// Chat number the order is meant for, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    whatsapp_phone: Option<&'a str>,
    order: &'a CheckoutSnapshot,
}

/// Writes handed-off orders into a directory.
#[derive(Debug)]
pub struct OrderOutbox {
    dir: PathBuf,
    whatsapp_phone: Option<String>,
    last_written: RefCell<Option<PathBuf>>,
}

impl OrderOutbox {
    pub fn new(dir: impl Into<PathBuf>, whatsapp_phone: Option<String>) -> Self {
        OrderOutbox {
            dir: dir.into(),
            whatsapp_phone,
            last_written: RefCell::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File written by the most recent successful handoff.
    pub fn last_written(&self) -> Option<PathBuf> {
        self.last_written.borrow().clone()
    }

    fn write(&self, order: &CheckoutSnapshot) -> std::io::Result<PathBuf> {
        let record = OrderRecord {
            order_id: Uuid::new_v4(),
            created_at: Utc::now(),
            whatsapp_phone: self.whatsapp_phone.as_deref(),
            order,
        };
        let json = serde_json::to_string_pretty(&record)?;

        fs::create_dir_all(&self.dir)?;
        let name = format!(
            "{}-{}.json",
            record.created_at.format("%Y%m%dT%H%M%S"),
            record.order_id.simple()
        );
        let path = self.dir.join(name);
        fs::write(&path, json)?;
        Ok(path)
    }
}

impl OrderHandoff for OrderOutbox {
    fn hand_off(&self, order: &CheckoutSnapshot) -> Result<(), String> {
        let path = self.write(order).map_err(|e| e.to_string())?;
        info!(path = %path.display(), "Order recorded");
        *self.last_written.borrow_mut() = Some(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masa_core::{Cart, CustomerDetails, ItemSpec, PricingPolicy};
    use tempfile::TempDir;

    fn snapshot() -> CheckoutSnapshot {
        let mut cart = Cart::new();
        cart.add_item(ItemSpec {
            product_id: "product2".into(),
            color_name: "بيج".into(),
            unit_price: "17.00 د.أ".into(),
            ..Default::default()
        });
        CheckoutSnapshot::build(&cart, &PricingPolicy::default(), CustomerDetails::default())
    }

    #[test]
    fn test_writes_order_file() {
        let tmp = TempDir::new().unwrap();
        let outbox = OrderOutbox::new(tmp.path().join("orders"), Some("962790000000".into()));
        assert_eq!(outbox.last_written(), None);

        outbox.hand_off(&snapshot()).unwrap();

        let path = outbox.last_written().unwrap();
        assert!(path.starts_with(outbox.dir()));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["whatsappPhone"], "962790000000");
        assert_eq!(json["order"]["lines"][0]["item"]["productId"], "product2");
    }

    #[test]
    fn test_unwritable_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("orders");
        fs::write(&blocker, "not a directory").unwrap();

        let outbox = OrderOutbox::new(&blocker, None);
        assert!(outbox.hand_off(&snapshot()).is_err());
        assert_eq!(outbox.last_written(), None);
    }
}
