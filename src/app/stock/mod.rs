//! 进货登记与期初库存

pub mod handler;
pub mod model;
pub mod service;
