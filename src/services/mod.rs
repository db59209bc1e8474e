pub mod page_store;

pub use page_store::{is_valid_title, PageStore, PAGE_EXTENSION};
