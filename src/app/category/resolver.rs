//! 分类解析与过滤
//!
//! 期初库存记录与商品之间没有外键，只能按名称（忽略大小写）关联。
//! 处理流程：构建分类映射 -> 标注库存记录 -> 按分类过滤。
//! 每次调用都重新构建映射，不保留任何共享状态。

use std::collections::HashMap;

use crate::app::product::model::Product;
use crate::app::stock::model::StockEntry;

/// 小写商品名 -> 分类名
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    entries: HashMap<String, Option<String>>,
}

impl CategoryMap {
    /// 按名称查找分类；未匹配与分类为空都返回 `None`
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_lowercase())
            .and_then(|category| category.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 由全部商品构建分类映射
///
/// 名称只差大小写的商品会互相覆盖，后出现的生效。
pub fn build_category_map(products: &[Product]) -> CategoryMap {
    let mut entries = HashMap::with_capacity(products.len());
    for product in products {
        entries.insert(product.name.to_lowercase(), product.category.clone());
    }
    CategoryMap { entries }
}

/// 返回带 `category_name` 的新记录，不修改输入
pub fn annotate_with_category(entries: &[StockEntry], map: &CategoryMap) -> Vec<StockEntry> {
    entries
        .iter()
        .map(|entry| StockEntry {
            category_name: map.resolve(&entry.name).map(str::to_string),
            ..entry.clone()
        })
        .collect()
}

/// 保留 `category_name` 与 `requested` 完全相等的记录，保持原有顺序
///
/// 比较区分大小写；没有分类的记录不会匹配任何值（包括字符串 `"null"`）。
pub fn filter_by_category(entries: Vec<StockEntry>, requested: &str) -> Vec<StockEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.category_name.as_deref() == Some(requested))
        .collect()
}

/// 完整流程：构建映射、标注，`requested` 非空时再过滤
pub fn resolve_categories(
    products: &[Product],
    entries: &[StockEntry],
    requested: Option<&str>,
) -> Vec<StockEntry> {
    let map = build_category_map(products);
    let annotated = annotate_with_category(entries, &map);
    match requested {
        Some(category) => filter_by_category(annotated, category),
        None => annotated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::UnitType;
    use chrono::Utc;

    fn product(id: u64, name: &str, category: Option<&str>) -> Product {
        Product {
            id,
            name: name.to_string(),
            purchase_price: 10.0,
            selling_price: 12.0,
            unit_type: UnitType::Pcs,
            category: category.map(str::to_string),
            stock: 0.0,
            initial_stock: 0.0,
            created_at: Utc::now(),
        }
    }

    fn entry(id: u64, name: &str, quantity: u64) -> StockEntry {
        StockEntry {
            id,
            name: name.to_string(),
            quantity,
            purchase_price: 10.0,
            stock_value: quantity as f64 * 10.0,
            created_at: Utc::now(),
            category_name: None,
        }
    }

    fn store_products() -> Vec<Product> {
        vec![
            product(1, "Apple", Some("Fruits")),
            product(2, "Rice", Some("Groceries")),
            product(3, "Milk", None),
            product(4, "Banana", Some("Fruits")),
        ]
    }

    fn store_entries() -> Vec<StockEntry> {
        vec![entry(1, "Apple", 50), entry(2, "Rice", 10), entry(3, "Milk", 0)]
    }

    #[test]
    fn test_build_is_idempotent() {
        let products = store_products();
        assert_eq!(build_category_map(&products), build_category_map(&products));
        assert_eq!(build_category_map(&products).len(), 4);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let map = build_category_map(&store_products());
        assert_eq!(map.resolve("rice"), Some("Groceries"));
        assert_eq!(map.resolve("RICE"), Some("Groceries"));
        assert_eq!(map.resolve("Rice"), Some("Groceries"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let products = vec![
            product(1, "Sugar", Some("Groceries")),
            product(2, "SUGAR", Some("Baking")),
        ];
        let map = build_category_map(&products);
        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve("sugar"), Some("Baking"));
    }

    #[test]
    fn test_empty_name_is_a_valid_key() {
        let products = vec![product(1, "", Some("Misc"))];
        let map = build_category_map(&products);
        assert!(map.contains(""));

        let annotated = annotate_with_category(&[entry(9, "", 1)], &map);
        assert_eq!(annotated[0].category_name.as_deref(), Some("Misc"));
    }

    #[test]
    fn test_null_category_matches_unmatched_entry() {
        let map = build_category_map(&store_products());
        let annotated = annotate_with_category(&[entry(3, "Milk", 0), entry(7, "Bread", 2)], &map);

        assert!(map.contains("milk"));
        assert!(!map.contains("bread"));
        assert_eq!(annotated[0].category_name, None);
        assert_eq!(annotated[1].category_name, None);
    }

    #[test]
    fn test_annotate_leaves_input_untouched() {
        let entries = store_entries();
        let map = build_category_map(&store_products());
        let annotated = annotate_with_category(&entries, &map);

        assert!(entries.iter().all(|e| e.category_name.is_none()));
        assert_eq!(annotated.len(), entries.len());
        assert_eq!(annotated[0].quantity, 50);
    }

    #[test]
    fn test_store_scenario() {
        let map = build_category_map(&store_products());
        let annotated = annotate_with_category(&store_entries(), &map);

        let categories: Vec<_> = annotated.iter().map(|e| e.category_name.as_deref()).collect();
        assert_eq!(categories, vec![Some("Fruits"), Some("Groceries"), None]);

        let groceries = filter_by_category(annotated, "Groceries");
        assert_eq!(groceries.len(), 1);
        assert_eq!(groceries[0].name, "Rice");
        assert_eq!(groceries[0].quantity, 10);
    }

    #[test]
    fn test_filter_preserves_order() {
        let products = store_products();
        let entries = vec![
            entry(1, "Banana", 3),
            entry(2, "Rice", 1),
            entry(3, "apple", 7),
            entry(4, "BANANA", 9),
        ];
        let fruits = resolve_categories(&products, &entries, Some("Fruits"));
        let ids: Vec<u64> = fruits.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_filter_without_match_is_empty() {
        let result = resolve_categories(&store_products(), &store_entries(), Some("Dairy"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_is_strict() {
        let annotated = resolve_categories(&store_products(), &store_entries(), None);
        assert!(filter_by_category(annotated.clone(), "null").is_empty());
        assert!(filter_by_category(annotated.clone(), "").is_empty());
        assert!(filter_by_category(annotated, "groceries").is_empty());
    }

    #[test]
    fn test_literal_null_label_only_matches_itself() {
        let products = vec![product(1, "Mystery", Some("null")), product(2, "Milk", None)];
        let entries = vec![entry(1, "Mystery", 1), entry(2, "Milk", 1)];
        let result = resolve_categories(&products, &entries, Some("null"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Mystery");
    }
}
