// Internal types shared by stores and services
pub mod page;

pub use page::{PageRequest, SortDir};
