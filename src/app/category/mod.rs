//! 分类：分类目录与库存记录的分类解析

pub mod handler;
pub mod model;
pub mod resolver;
pub mod service;

pub use resolver::{
    annotate_with_category, build_category_map, filter_by_category, resolve_categories,
    CategoryMap,
};
