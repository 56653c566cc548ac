//! 模拟商城数据模型

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{Cart, CartInput, CartLine, CartLineInput, CartProductsInput, NewCartInput};
pub use product::{Product, ProductInput};
pub use user::{LoginInput, NewUserInput, User, UserInput, UserName};
