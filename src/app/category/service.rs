//! 分类业务服务

use chrono::Utc;
use tracing::info;

use super::model::Category;
use crate::app::product::model::Product;
use crate::core::error::CoreError;
use crate::infrastructure::store::MemoryTable;

#[derive(Clone)]
pub struct CategoryService {
    categories: MemoryTable<Category>,
    products: MemoryTable<Product>,
}

impl CategoryService {
    pub fn new(categories: MemoryTable<Category>, products: MemoryTable<Product>) -> Self {
        Self {
            categories,
            products,
        }
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, CoreError> {
        Ok(self.categories.all()?)
    }

    /// 创建分类，同名（忽略大小写）时报错
    pub fn create_category(&self, name: &str) -> Result<Category, CoreError> {
        let name = normalize_name(name)?;
        let created = self.categories.insert_unless(
            |existing| same_name(&existing.name, &name),
            |id| new_category(id, &name),
        )?;

        match created {
            Ok(category) => {
                info!("🆕 创建分类: '{}' (ID: {})", category.name, category.id);
                Ok(category)
            }
            Err(existing) => Err(CoreError::BadRequest(format!(
                "分类 '{}' 已存在",
                existing.name
            ))),
        }
    }

    /// 返回同名分类，不存在时自动创建
    pub fn ensure_category(&self, name: &str) -> Result<Category, CoreError> {
        let name = normalize_name(name)?;
        let created = self.categories.insert_unless(
            |existing| same_name(&existing.name, &name),
            |id| new_category(id, &name),
        )?;

        Ok(match created {
            Ok(category) => {
                info!("🆕 自动创建分类: '{}' (ID: {})", category.name, category.id);
                category
            }
            Err(existing) => existing,
        })
    }

    /// 删除分类；仍有商品使用时拒绝
    ///
    /// 检查与删除期间持有商品表的锁，其间不会有商品改用该分类。
    pub fn delete_category(&self, id: u64) -> Result<Category, CoreError> {
        let category = self.products.transaction(|products| {
            self.categories.transaction(|categories| {
                let category = categories
                    .get(id)
                    .cloned()
                    .ok_or_else(|| CoreError::NotFound(format!("分类 {} 不存在", id)))?;

                let in_use = products.count_where(|product| {
                    product
                        .category
                        .as_deref()
                        .is_some_and(|c| same_name(c, &category.name))
                });
                if in_use > 0 {
                    return Err(CoreError::BadRequest(format!(
                        "分类 '{}' 仍被 {} 个商品使用，无法删除",
                        category.name, in_use
                    )));
                }

                categories.remove(id);
                Ok(category)
            })?
        })??;

        info!("🗑️ 删除分类: '{}' (ID: {})", category.name, id);
        Ok(category)
    }
}

fn normalize_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::BadRequest("分类名称不能为空".to_string()));
    }
    Ok(trimmed.to_string())
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn new_category(id: u64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        created_at: Utc::now(),
    }
}
