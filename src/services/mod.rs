pub mod aggregator;
pub mod annotations;
pub mod authorizer;
pub mod catalog;
pub mod providers;

pub use annotations::AnnotationStore;
pub use catalog::Catalog;
