//! 库存业务服务

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use super::model::{CreatePurchaseRequest, CreateSaleRequest, Purchase, Sale, StockEntry};
use crate::app::category::resolver::resolve_categories;
use crate::app::product::model::Product;
use crate::core::error::CoreError;
use crate::infrastructure::store::MemoryTable;

/// 进货与销售都先锁商品表再锁记录表，库存变化和记录增删一起生效
#[derive(Clone)]
pub struct StockService {
    products: MemoryTable<Product>,
    purchases: MemoryTable<Purchase>,
    sales: MemoryTable<Sale>,
}

impl StockService {
    pub fn new(
        products: MemoryTable<Product>,
        purchases: MemoryTable<Purchase>,
        sales: MemoryTable<Sale>,
    ) -> Self {
        Self {
            products,
            purchases,
            sales,
        }
    }

    /// 登记进货并增加商品库存
    pub fn record_purchase(&self, req: CreatePurchaseRequest) -> Result<Purchase, CoreError> {
        req.validate()?;

        let (product, purchase) = self.products.transaction(|products| {
            let product = products
                .get_mut(req.product_id)
                .ok_or_else(|| product_not_found(req.product_id))?;
            let purchase = self.purchases.insert_with(|id| Purchase {
                id,
                product_id: product.id,
                quantity: req.quantity,
                total_cost: req.unit_cost * f64::from(req.quantity),
                purchase_date: Utc::now(),
            })?;
            product.stock += f64::from(req.quantity);
            Ok::<_, CoreError>((product.clone(), purchase))
        })??;

        info!(
            "🛒 进货: '{}' x {}，合计 {:.2}，当前库存 {}",
            product.name, purchase.quantity, purchase.total_cost, product.stock
        );
        Ok(purchase)
    }

    /// 撤销进货，从库存中扣回数量；库存不足时拒绝
    pub fn delete_purchase(&self, id: u64) -> Result<Purchase, CoreError> {
        let purchase = self.products.transaction(|products| {
            let purchase = self
                .purchases
                .get(id)?
                .ok_or_else(|| CoreError::NotFound(format!("进货记录 {} 不存在", id)))?;
            let product = products
                .get_mut(purchase.product_id)
                .ok_or_else(|| product_not_found(purchase.product_id))?;

            let quantity = f64::from(purchase.quantity);
            if product.stock < quantity {
                return Err(CoreError::BadRequest(format!(
                    "库存不足，无法撤销进货: '{}' 当前库存 {}，进货数量 {}",
                    product.name, product.stock, purchase.quantity
                )));
            }

            self.purchases.remove(id)?;
            product.stock -= quantity;
            Ok(purchase)
        })??;

        info!(
            "↩️ 撤销进货: ID {}，商品 {} x {}",
            purchase.id, purchase.product_id, purchase.quantity
        );
        Ok(purchase)
    }

    /// 登记销售并扣减库存，金额按当前售价计算
    pub fn record_sale(&self, req: CreateSaleRequest) -> Result<Sale, CoreError> {
        req.validate()?;

        let (product, sale) = self.products.transaction(|products| {
            let product = products
                .get_mut(req.product_id)
                .ok_or_else(|| product_not_found(req.product_id))?;

            let quantity = f64::from(req.quantity);
            if product.stock < quantity {
                return Err(CoreError::BadRequest(format!(
                    "库存不足: '{}' 当前库存 {}，需要 {}",
                    product.name, product.stock, req.quantity
                )));
            }

            let sale = self.sales.insert_with(|id| Sale {
                id,
                product_id: product.id,
                quantity: req.quantity,
                total_amount: product.selling_price * quantity,
                sale_date: Utc::now(),
            })?;
            product.stock -= quantity;
            Ok((product.clone(), sale))
        })??;

        info!(
            "💰 销售: '{}' x {}，金额 {:.2}，剩余库存 {}",
            product.name, sale.quantity, sale.total_amount, product.stock
        );
        Ok(sale)
    }

    /// 撤销销售，数量退回库存
    pub fn delete_sale(&self, id: u64) -> Result<Sale, CoreError> {
        let sale = self.products.transaction(|products| {
            let sale = self
                .sales
                .get(id)?
                .ok_or_else(|| CoreError::NotFound(format!("销售记录 {} 不存在", id)))?;
            let product = products
                .get_mut(sale.product_id)
                .ok_or_else(|| product_not_found(sale.product_id))?;

            self.sales.remove(id)?;
            product.stock += f64::from(sale.quantity);
            Ok::<_, CoreError>(sale)
        })??;

        info!(
            "↩️ 撤销销售: ID {}，商品 {} x {}",
            sale.id, sale.product_id, sale.quantity
        );
        Ok(sale)
    }

    /// 期初库存登记
    ///
    /// 每个商品一行，数量取其全部进货数量之和。分类按商品名解析，
    /// `category` 非空时只保留分类完全相同的行。
    pub fn opening_stock_register(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<StockEntry>, CoreError> {
        let products = self.products.all()?;
        let totals = self.purchase_totals()?;

        let entries: Vec<StockEntry> = products
            .iter()
            .map(|product| {
                let quantity = totals.get(&product.id).copied().unwrap_or(0);
                StockEntry {
                    id: product.id,
                    name: product.name.clone(),
                    quantity,
                    purchase_price: product.purchase_price,
                    stock_value: quantity as f64 * product.purchase_price,
                    created_at: product.created_at,
                    category_name: None,
                }
            })
            .collect();

        let requested = category.filter(|c| !c.is_empty());
        let register = resolve_categories(&products, &entries, requested);

        debug!(
            "📊 期初库存登记: {} 个商品，过滤条件 {:?}，返回 {} 行",
            products.len(),
            requested,
            register.len()
        );
        Ok(register)
    }

    fn purchase_totals(&self) -> Result<HashMap<u64, u64>, CoreError> {
        let mut totals = HashMap::new();
        for purchase in self.purchases.all()? {
            *totals.entry(purchase.product_id).or_insert(0) += u64::from(purchase.quantity);
        }
        Ok(totals)
    }
}

fn product_not_found(id: u64) -> CoreError {
    CoreError::NotFound(format!("商品 {} 不存在", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::UnitType;

    fn service_with(products: &[(&str, f64, Option<&str>)]) -> StockService {
        let table = MemoryTable::new("products");
        for (name, purchase_price, category) in products {
            table
                .insert_with(|id| Product {
                    id,
                    name: name.to_string(),
                    purchase_price: *purchase_price,
                    selling_price: purchase_price * 1.2,
                    unit_type: UnitType::Kgs,
                    category: category.map(str::to_string),
                    stock: 0.0,
                    initial_stock: 0.0,
                    created_at: Utc::now(),
                })
                .unwrap();
        }
        StockService::new(table, MemoryTable::new("purchases"), MemoryTable::new("sales"))
    }

    fn stock_of(service: &StockService, product_id: u64) -> f64 {
        service.products.get(product_id).unwrap().unwrap().stock
    }

    fn sell(service: &StockService, product_id: u64, quantity: u32) -> Result<Sale, CoreError> {
        service.record_sale(CreateSaleRequest {
            product_id,
            quantity,
        })
    }

    fn buy(service: &StockService, product_id: u64, quantity: u32) -> Purchase {
        service
            .record_purchase(CreatePurchaseRequest {
                product_id,
                quantity,
                unit_cost: 10.0,
            })
            .unwrap()
    }

    #[test]
    fn test_record_purchase_updates_stock() {
        let service = service_with(&[("Rice", 100.0, Some("Groceries"))]);
        let purchase = buy(&service, 1, 4);

        assert_eq!(purchase.total_cost, 40.0);
        assert_eq!(service.products.get(1).unwrap().unwrap().stock, 4.0);
    }

    #[test]
    fn test_record_purchase_errors() {
        let service = service_with(&[("Rice", 100.0, None)]);
        let missing = service.record_purchase(CreatePurchaseRequest {
            product_id: 42,
            quantity: 1,
            unit_cost: 1.0,
        });
        assert!(matches!(missing, Err(CoreError::NotFound(_))));

        let zero = service.record_purchase(CreatePurchaseRequest {
            product_id: 1,
            quantity: 0,
            unit_cost: 1.0,
        });
        assert!(matches!(zero, Err(CoreError::BadRequest(_))));
        assert!(service.purchases.is_empty().unwrap());
    }

    #[test]
    fn test_register_sums_purchases() {
        let service = service_with(&[
            ("Apple", 80.0, Some("Fruits")),
            ("Rice", 100.0, Some("Groceries")),
            ("Milk", 50.0, None),
        ]);
        buy(&service, 1, 30);
        buy(&service, 1, 20);
        buy(&service, 2, 10);

        let register = service.opening_stock_register(None).unwrap();
        let rows: Vec<_> = register
            .iter()
            .map(|e| (e.name.as_str(), e.quantity, e.stock_value, e.category_name.as_deref()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Apple", 50, 4000.0, Some("Fruits")),
                ("Rice", 10, 1000.0, Some("Groceries")),
                ("Milk", 0, 0.0, None),
            ]
        );
    }

    #[test]
    fn test_register_category_filter() {
        let service = service_with(&[
            ("Apple", 80.0, Some("Fruits")),
            ("Rice", 100.0, Some("Groceries")),
            ("Milk", 50.0, None),
        ]);
        buy(&service, 2, 10);

        let groceries = service.opening_stock_register(Some("Groceries")).unwrap();
        assert_eq!(groceries.len(), 1);
        assert_eq!(groceries[0].name, "Rice");
        assert_eq!(groceries[0].quantity, 10);

        assert_eq!(service.opening_stock_register(Some("")).unwrap().len(), 3);
        assert!(service.opening_stock_register(Some("Dairy")).unwrap().is_empty());
    }

    #[test]
    fn test_record_sale_uses_selling_price() {
        let service = service_with(&[("Rice", 100.0, Some("Groceries"))]);
        buy(&service, 1, 10);

        let selling_price = service.products.get(1).unwrap().unwrap().selling_price;
        let sale = sell(&service, 1, 3).unwrap();
        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.total_amount, selling_price * 3.0);
        assert_eq!(stock_of(&service, 1), 7.0);
    }

    #[test]
    fn test_record_sale_errors() {
        let service = service_with(&[("Rice", 100.0, None)]);
        buy(&service, 1, 2);

        assert!(matches!(sell(&service, 9, 1), Err(CoreError::NotFound(_))));
        assert!(matches!(sell(&service, 1, 0), Err(CoreError::BadRequest(_))));
        assert!(matches!(sell(&service, 1, 3), Err(CoreError::BadRequest(_))));
        assert!(service.sales.is_empty().unwrap());
        assert_eq!(stock_of(&service, 1), 2.0);

        sell(&service, 1, 2).unwrap();
        assert_eq!(stock_of(&service, 1), 0.0);
    }

    #[test]
    fn test_delete_sale_restores_stock() {
        let service = service_with(&[("Rice", 100.0, None)]);
        buy(&service, 1, 5);
        let sale = sell(&service, 1, 4).unwrap();

        let deleted = service.delete_sale(sale.id).unwrap();
        assert_eq!(deleted, sale);
        assert_eq!(stock_of(&service, 1), 5.0);
        assert!(service.sales.is_empty().unwrap());
        assert!(matches!(service.delete_sale(sale.id), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_purchase_deducts_stock() {
        let service = service_with(&[("Rice", 100.0, None)]);
        let first = buy(&service, 1, 6);
        let second = buy(&service, 1, 4);
        sell(&service, 1, 5).unwrap();

        assert!(matches!(
            service.delete_purchase(first.id),
            Err(CoreError::BadRequest(_))
        ));
        assert_eq!(stock_of(&service, 1), 5.0);
        assert_eq!(service.purchases.len().unwrap(), 2);

        service.delete_purchase(second.id).unwrap();
        assert_eq!(stock_of(&service, 1), 1.0);
        assert_eq!(service.opening_stock_register(None).unwrap()[0].quantity, 6);
        assert!(matches!(
            service.delete_purchase(second.id),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_sales_never_oversell() {
        let service = service_with(&[("Rice", 100.0, None)]);
        buy(&service, 1, 10);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || sell(&service, 1, 3).is_ok())
            })
            .collect();
        let sold = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(sold, 3);
        assert_eq!(stock_of(&service, 1), 1.0);
        assert_eq!(service.sales.len().unwrap(), 3);
    }
}
