pub mod compare;
pub mod domain;
pub mod matcher;
pub mod normalize;
pub mod ports;

pub use compare::ComparisonEngine;
pub use domain::{
    Comparison, GroceryList, ItemComparison, ListItem, MatchResult, Price, Product, Store,
    StorePrice, StoreTotal,
};
pub use matcher::{ProductMatcher, DEFAULT_MIN_SCORE};
pub use ports::{CatalogSource, ListSource, PortError, PortResult, PriceSource, StoreSource};
