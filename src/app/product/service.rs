//! 商品业务服务

use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use super::model::{CreateProductRequest, Product, UnitType, UpdateProductRequest};
use crate::app::category::service::CategoryService;
use crate::app::stock::model::{Purchase, Sale};
use crate::core::error::CoreError;
use crate::infrastructure::store::MemoryTable;

#[derive(Clone)]
pub struct ProductService {
    products: MemoryTable<Product>,
    purchases: MemoryTable<Purchase>,
    sales: MemoryTable<Sale>,
    categories: CategoryService,
}

/// 删除商品的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRemoval {
    pub product: Product,
    /// 一并删除的进货记录数
    pub purchases: usize,
    /// 一并删除的销售记录数
    pub sales: usize,
}

impl ProductService {
    pub fn new(
        products: MemoryTable<Product>,
        purchases: MemoryTable<Purchase>,
        sales: MemoryTable<Sale>,
        categories: CategoryService,
    ) -> Self {
        Self {
            products,
            purchases,
            sales,
            categories,
        }
    }

    /// 列出商品，指定分类时按分类名忽略大小写精确匹配
    pub fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, CoreError> {
        let products = self.products.all()?;
        let Some(category) = category.filter(|c| !c.is_empty()) else {
            return Ok(products);
        };

        debug!("🔍 按分类过滤商品: {}", category);
        let wanted = category.to_lowercase();
        Ok(products
            .into_iter()
            .filter(|product| {
                product
                    .category
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == wanted)
            })
            .collect())
    }

    pub fn get_product(&self, id: u64) -> Result<Product, CoreError> {
        self.products.get(id)?.ok_or_else(|| not_found(id))
    }

    /// 创建商品
    ///
    /// 名称查重、写入分类目录和插入商品在商品表的同一把锁内完成，
    /// 名称冲突时不会留下新建的分类。
    pub fn create_product(&self, req: CreateProductRequest) -> Result<Product, CoreError> {
        req.validate()?;
        let name = required_name(&req.name)?;

        let product = self.products.transaction(|products| {
            if let Some(existing) = products.find(|p| same_name(&p.name, &name)) {
                return Err(name_taken(existing));
            }

            let category = self.attach_category(req.category.as_deref())?;
            Ok(products.insert_with(|id| Product {
                id,
                name,
                purchase_price: req.purchase_price,
                selling_price: req.selling_price,
                unit_type: req.unit_type,
                category,
                stock: req.stock,
                initial_stock: req.stock,
                created_at: Utc::now(),
            }))
        })??;

        info!("📦 创建商品: '{}' (ID: {})", product.name, product.id);
        Ok(product)
    }

    /// 部分更新；`category` 为空字符串时清除分类
    pub fn update_product(&self, id: u64, req: UpdateProductRequest) -> Result<Product, CoreError> {
        req.validate()?;
        let name = req.name.as_deref().map(required_name).transpose()?;

        self.products.transaction(|products| {
            if products.get(id).is_none() {
                return Err(not_found(id));
            }
            if let Some(name) = &name {
                let taken = products.find(|other| other.id != id && same_name(&other.name, name));
                if let Some(other) = taken {
                    return Err(name_taken(other));
                }
            }

            let category = match req.category.as_deref() {
                Some(category) => Some(self.attach_category(Some(category))?),
                None => None,
            };

            let product = products.get_mut(id).ok_or_else(|| not_found(id))?;
            if let Some(name) = name {
                product.name = name;
            }
            if let Some(price) = req.purchase_price {
                product.purchase_price = price;
            }
            if let Some(price) = req.selling_price {
                product.selling_price = price;
            }
            if let Some(unit_type) = req.unit_type {
                product.unit_type = unit_type;
            }
            if let Some(category) = category {
                product.category = category;
            }
            if let Some(stock) = req.stock {
                product.stock = stock;
            }
            Ok(product.clone())
        })?
    }

    /// 删除商品及其进货、销售记录
    pub fn delete_product(&self, id: u64) -> Result<ProductRemoval, CoreError> {
        let removal = self.products.transaction(|products| {
            let product = products.remove(id).ok_or_else(|| not_found(id))?;
            let purchases = self.purchases.remove_where(|p| p.product_id == id)?;
            let sales = self.sales.remove_where(|s| s.product_id == id)?;
            Ok::<_, CoreError>(ProductRemoval {
                product,
                purchases,
                sales,
            })
        })??;

        info!(
            "🗑️ 删除商品: '{}' (ID: {})，同时删除 {} 条进货记录、{} 条销售记录",
            removal.product.name, id, removal.purchases, removal.sales
        );
        Ok(removal)
    }

    /// 商品表为空时写入示例商品
    pub fn seed_sample_products(&self) -> Result<usize, CoreError> {
        if !self.products.is_empty()? {
            debug!("商品表已有数据，跳过示例数据");
            return Ok(0);
        }

        let samples = [
            ("Apple", 80.0, 100.0, UnitType::Kgs, "Fruits", 50.0),
            ("Banana", 40.0, 50.0, UnitType::Kgs, "Fruits", 30.0),
            ("Orange", 60.0, 80.0, UnitType::Kgs, "Fruits", 25.0),
            ("Milk", 50.0, 65.0, UnitType::Ltr, "Dairy", 20.0),
            ("Bread", 30.0, 40.0, UnitType::Pcs, "Bakery", 15.0),
            ("Eggs", 70.0, 90.0, UnitType::Pcs, "Meat & Fish", 40.0),
            ("Rice", 100.0, 120.0, UnitType::Kgs, "Groceries", 60.0),
            ("Sugar", 45.0, 55.0, UnitType::Kgs, "Groceries", 35.0),
        ];

        for (name, purchase_price, selling_price, unit_type, category, stock) in samples {
            self.create_product(CreateProductRequest {
                name: name.to_string(),
                purchase_price,
                selling_price,
                unit_type,
                category: Some(category.to_string()),
                stock,
            })?;
        }

        info!("✅ 已初始化 {} 个示例商品", samples.len());
        Ok(samples.len())
    }

    /// 非空分类名写入分类目录，返回商品上保存的分类
    fn attach_category(&self, category: Option<&str>) -> Result<Option<String>, CoreError> {
        match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(category) => {
                self.categories.ensure_category(category)?;
                Ok(Some(category.to_string()))
            }
            None => Ok(None),
        }
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn not_found(id: u64) -> CoreError {
    CoreError::NotFound(format!("商品 {} 不存在", id))
}

fn name_taken(existing: &Product) -> CoreError {
    CoreError::Conflict(format!(
        "商品 '{}' 已存在 (ID: {})",
        existing.name, existing.id
    ))
}

fn required_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::BadRequest("商品名称不能为空".to_string()));
    }
    Ok(trimmed.to_string())
}
